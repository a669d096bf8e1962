use log::{debug, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ClientEvent, Gateway};

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// Reloads the selected room's meetings. Meetings are not paged, every
    /// refresh replaces the whole list.
    pub async fn refresh_meetings(&self) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            let tab = state.tabs.get_mut(Tab::Meetings);
            if tab.loading {
                return Ok(FetchOutcome::Skipped);
            }
            tab.loading = true;

            state.meetings.clear();

            (state.epoch, room_id)
        };

        let result = self.context.gateway.room_meetings(room_id).await;

        let meetings = match result {
            Ok(meetings) => meetings,
            Err(e) => {
                self.abort_fetch(Tab::Meetings, epoch);
                return Err(e.into());
            }
        };

        let appended = meetings.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale meeting list for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            state.meetings = meetings;
            state.tabs.get_mut(Tab::Meetings).loading = false;
        }

        debug!("Loaded {} meetings for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Meetings,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }
}
