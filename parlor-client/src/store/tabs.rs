/// The dashboard tabs a room's data is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Feed,
    Chat,
    Files,
    Meetings,
    Payments,
    Members,
}

/// Fetch flags for a single tab.
#[derive(Debug, Default, Clone, Copy)]
pub struct TabState {
    /// A page request for this tab is in flight
    pub loading: bool,
    /// The last page for this tab came back empty
    pub reached_end: bool,
}

/// Fetch flags for every tab of the selected room.
#[derive(Debug, Default, Clone)]
pub struct TabStates {
    feed: TabState,
    chat: TabState,
    files: TabState,
    meetings: TabState,
    payments: TabState,
    members: TabState,
}

impl TabState {
    /// Starts a page fetch unless one is in flight or the tab is exhausted.
    /// A reset bypasses exhaustion and clears it.
    pub(crate) fn try_begin(&mut self, reset: bool) -> bool {
        if self.loading || (self.reached_end && !reset) {
            return false;
        }

        if reset {
            self.reached_end = false;
        }

        self.loading = true;
        true
    }

    /// Records a committed page. An empty page exhausts the tab.
    pub(crate) fn finish(&mut self, appended: usize) {
        self.loading = false;
        self.reached_end = appended == 0;
    }

    /// Clears the loading flag without touching exhaustion.
    pub(crate) fn abort(&mut self) {
        self.loading = false;
    }
}

impl TabStates {
    pub fn get(&self, tab: Tab) -> TabState {
        match tab {
            Tab::Feed => self.feed,
            Tab::Chat => self.chat,
            Tab::Files => self.files,
            Tab::Meetings => self.meetings,
            Tab::Payments => self.payments,
            Tab::Members => self.members,
        }
    }

    pub(crate) fn get_mut(&mut self, tab: Tab) -> &mut TabState {
        match tab {
            Tab::Feed => &mut self.feed,
            Tab::Chat => &mut self.chat,
            Tab::Files => &mut self.files,
            Tab::Meetings => &mut self.meetings,
            Tab::Payments => &mut self.payments,
            Tab::Members => &mut self.members,
        }
    }
}
