use log::{debug, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ClientEvent, Gateway};

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// How many payment splits are requested per page.
    pub const PAYMENTS_PAGE_SIZE: usize = 10;

    /// Loads the next page of the account's payment splits in the selected
    /// room, from the last loaded split onwards.
    pub async fn payments_page(&self, reset: bool) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id, cursor) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            if !state.tabs.get_mut(Tab::Payments).try_begin(reset) {
                return Ok(FetchOutcome::Skipped);
            }

            if reset {
                state.payments.clear();
            }

            (
                state.epoch,
                room_id,
                state.payments.last().map(|split| split.id),
            )
        };

        let result = self
            .context
            .gateway
            .room_payments(room_id, cursor, Self::PAYMENTS_PAGE_SIZE)
            .await;

        let splits = match result {
            Ok(splits) => splits,
            Err(e) => {
                self.abort_fetch(Tab::Payments, epoch);
                return Err(e.into());
            }
        };

        let appended = splits.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale payments page for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            state.payments.extend(splits);
            state.tabs.get_mut(Tab::Payments).finish(appended);
        }

        debug!("Loaded {} payment splits for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Payments,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }
}
