use log::{debug, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ClientEvent, Gateway};

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// How many members are requested per page.
    pub const MEMBERS_PAGE_SIZE: usize = 30;

    /// Loads the next page of the selected room's member list.
    pub async fn members_page(&self, reset: bool) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id, cursor) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            if !state.tabs.get_mut(Tab::Members).try_begin(reset) {
                return Ok(FetchOutcome::Skipped);
            }

            if reset {
                state.members.clear();
            }

            (
                state.epoch,
                room_id,
                state.members.last().map(|member| member.id),
            )
        };

        let result = self
            .context
            .gateway
            .room_members(room_id, cursor, Self::MEMBERS_PAGE_SIZE)
            .await;

        let members = match result {
            Ok(members) => members,
            Err(e) => {
                self.abort_fetch(Tab::Members, epoch);
                return Err(e.into());
            }
        };

        let appended = members.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale member page for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            state.members.extend(members);
            state.tabs.get_mut(Tab::Members).finish(appended);
        }

        debug!("Loaded {} members for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Members,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }
}
