use log::{debug, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ClientEvent, Gateway, PrimaryKey};

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// How many feed items are requested per page.
    pub const FEED_PAGE_SIZE: usize = 10;

    /// Loads the next page of the selected room's feed, from the last loaded
    /// item onwards. A reset starts over from the top.
    pub async fn feed_page(&self, reset: bool) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id, cursor) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            if !state.tabs.get_mut(Tab::Feed).try_begin(reset) {
                return Ok(FetchOutcome::Skipped);
            }

            if reset {
                state.feed.clear();
            }

            (state.epoch, room_id, state.feed.last().map(|item| item.id))
        };

        let result = self
            .context
            .gateway
            .room_feed(room_id, cursor, Self::FEED_PAGE_SIZE)
            .await;

        let items = match result {
            Ok(items) => items,
            Err(e) => {
                self.abort_fetch(Tab::Feed, epoch);
                return Err(e.into());
            }
        };

        let appended = items.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale feed page for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            state.feed.extend(items);
            state.tabs.get_mut(Tab::Feed).finish(appended);
        }

        debug!("Loaded {} feed items for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Feed,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }

    /// Toggles the account's like on a feed item. The backend confirms the
    /// toggle first, then the loaded item is updated in place.
    pub async fn toggle_feed_like(&self, feed_id: PrimaryKey) -> Result<(), StoreError> {
        self.context.gateway.toggle_like(feed_id).await?;

        let applied = {
            let mut state = self.state.lock();

            state
                .feed
                .iter_mut()
                .find(|item| item.id == feed_id)
                .map(|item| {
                    if item.user_liked {
                        item.likes = item.likes.saturating_sub(1);
                    } else {
                        item.likes += 1;
                    }
                    item.user_liked = !item.user_liked;

                    (item.likes, item.user_liked)
                })
        };

        match applied {
            Some((likes, user_liked)) => self.context.emit(ClientEvent::FeedLikeToggled {
                feed_id,
                likes,
                user_liked,
            }),
            // The item scrolled out of the loaded window or the room changed
            None => debug!("Confirmed like toggle for unloaded feed item {}", feed_id),
        }

        Ok(())
    }
}
