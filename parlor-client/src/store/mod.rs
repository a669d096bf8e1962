use log::info;
use parking_lot::Mutex;
use thiserror::Error;

use crate::{
    ChatMessage, ClientContext, ClientEvent, FeedItem, FileEntry, Gateway, GatewayError, Meeting,
    PaymentSplit, PrimaryKey, Room, RoomMember,
};

mod tabs;
pub use tabs::*;

mod chat;
mod feed;
mod files;
mod meetings;
mod members;
mod payments;

pub use files::*;

/// The dashboard state of the selected room.
///
/// All of a room's tab data lives here, together with the flags that gate
/// fetching. Switching rooms resets everything.
pub struct RoomStore<G> {
    context: ClientContext<G>,
    state: Mutex<RoomState>,
}

#[derive(Default)]
struct RoomState {
    /// Bumped on every room switch. Pages resolving under an older epoch are stale.
    epoch: u64,
    selected: Option<Room>,
    /// Set when an unknown room was opened and should be previewed instead
    preview: Option<PrimaryKey>,

    feed: Vec<FeedItem>,
    messages: Vec<ChatMessage>,
    files: Vec<FileEntry>,
    meetings: Vec<Meeting>,
    payments: Vec<PaymentSplit>,
    members: Vec<RoomMember>,

    tabs: TabStates,
}

/// The result of a fetch action that the tab guards may have skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was committed, with this many new rows
    Fetched { appended: usize },
    /// The guards rejected the fetch and no request was made
    Skipped,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// An action that needs a selected room ran without one
    #[error("no room is selected")]
    NoRoomSelected,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl<G> RoomStore<G>
where
    G: Gateway,
{
    pub fn new(context: &ClientContext<G>) -> Self {
        Self {
            context: context.clone(),
            state: Default::default(),
        }
    }

    /// Makes a room the selected one, clearing every tab of the previous room.
    /// Passing None deselects without selecting a replacement.
    pub fn select_room(&self, room: Option<Room>) {
        let selected_id = {
            let mut state = self.state.lock();

            state.epoch += 1;
            state.preview = None;
            state.feed.clear();
            state.messages.clear();
            state.files.clear();
            state.meetings.clear();
            state.payments.clear();
            state.members.clear();
            state.tabs = Default::default();
            state.selected = room;

            state.selected.as_ref().map(|room| room.id)
        };

        if let Some(room_id) = selected_id {
            info!("Selected room {}", room_id);
            self.context.emit(ClientEvent::RoomSelected { room_id });
        }
    }

    /// Records that an unknown room should be shown as a preview.
    pub fn show_preview(&self, room_id: PrimaryKey) {
        self.state.lock().preview = Some(room_id);
        self.context.emit(ClientEvent::RoomPreviewRequested { room_id });
    }

    /// Dismisses the preview without selecting anything.
    pub fn clear_preview(&self) {
        self.state.lock().preview = None;
    }

    pub fn selected_room(&self) -> Option<Room> {
        self.state.lock().selected.clone()
    }

    pub fn preview(&self) -> Option<PrimaryKey> {
        self.state.lock().preview
    }

    pub fn tab(&self, tab: Tab) -> TabState {
        self.state.lock().tabs.get(tab)
    }

    pub fn feed(&self) -> Vec<FeedItem> {
        self.state.lock().feed.clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().messages.clone()
    }

    pub fn files(&self) -> Vec<FileEntry> {
        self.state.lock().files.clone()
    }

    pub fn meetings(&self) -> Vec<Meeting> {
        self.state.lock().meetings.clone()
    }

    pub fn payments(&self) -> Vec<PaymentSplit> {
        self.state.lock().payments.clone()
    }

    pub fn members(&self) -> Vec<RoomMember> {
        self.state.lock().members.clone()
    }

    /// The id of the selected room, for actions that require one.
    fn selected_id(state: &RoomState) -> Result<PrimaryKey, StoreError> {
        state
            .selected
            .as_ref()
            .map(|room| room.id)
            .ok_or(StoreError::NoRoomSelected)
    }

    /// Clears a tab's loading flag after a failed fetch, unless the room
    /// changed while the request was out.
    fn abort_fetch(&self, tab: Tab, epoch: u64) {
        let mut state = self.state.lock();

        if state.epoch == epoch {
            state.tabs.get_mut(tab).abort();
        }
    }
}
