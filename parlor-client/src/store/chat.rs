use log::{debug, warn};

use super::{FetchOutcome, RoomStore, StoreError, Tab};
use crate::{ChatMessage, ClientEvent, Gateway, NewMessage, PrimaryKey};

impl<G> RoomStore<G>
where
    G: Gateway,
{
    /// How many chat messages are requested per page.
    pub const CHAT_PAGE_SIZE: usize = 20;

    /// Loads the page of messages older than the oldest loaded one and
    /// prepends it, oldest first. Pass a feed id to page a post's thread
    /// instead of the room chat.
    ///
    /// Scrolling past the start of history keeps answering with empty pages,
    /// so this is guarded by the loading flag alone.
    pub async fn chat_page(
        &self,
        feed_id: Option<PrimaryKey>,
        reset: bool,
    ) -> Result<FetchOutcome, StoreError> {
        let (epoch, room_id, cursor) = {
            let mut state = self.state.lock();
            let room_id = Self::selected_id(&state)?;

            {
                let tab = state.tabs.get_mut(Tab::Chat);
                if tab.loading {
                    return Ok(FetchOutcome::Skipped);
                }

                if reset {
                    tab.reached_end = false;
                }

                tab.loading = true;
            }

            if reset {
                state.messages.clear();
            }

            (
                state.epoch,
                room_id,
                state.messages.first().map(|message| message.id),
            )
        };

        let result = self
            .context
            .gateway
            .room_messages(room_id, feed_id, cursor, Self::CHAT_PAGE_SIZE)
            .await;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                self.abort_fetch(Tab::Chat, epoch);
                return Err(e.into());
            }
        };

        let appended = page.len();
        {
            let mut state = self.state.lock();

            if state.epoch != epoch {
                warn!("Discarding stale chat page for room {}", room_id);
                return Ok(FetchOutcome::Skipped);
            }

            // The backend serves newest first, the chat reads oldest first
            let mut page = page;
            page.reverse();
            page.append(&mut state.messages);
            state.messages = page;

            state.tabs.get_mut(Tab::Chat).finish(appended);
        }

        debug!("Loaded {} chat messages for room {}", appended, room_id);
        self.context.emit(ClientEvent::TabUpdated {
            room_id,
            tab: Tab::Chat,
            appended,
        });

        Ok(FetchOutcome::Fetched { appended })
    }

    /// Sends a message to the room chat, or to a post's thread when a feed id
    /// is given. The confirmed message is appended to the loaded history.
    pub async fn send_message(
        &self,
        message: &str,
        feed_id: Option<PrimaryKey>,
    ) -> Result<ChatMessage, StoreError> {
        let (epoch, room_id) = {
            let state = self.state.lock();
            (state.epoch, Self::selected_id(&state)?)
        };

        let sent = self
            .context
            .gateway
            .send_message(NewMessage {
                room_id,
                feed_id,
                message: message.to_string(),
            })
            .await?;

        {
            let mut state = self.state.lock();

            if state.epoch == epoch {
                state.messages.push(sent.clone());
            } else {
                warn!("Message {} sent to room {} after it was left", sent.id, room_id);
            }
        }

        self.context.emit(ClientEvent::MessageSent {
            room_id,
            message_id: sent.id,
        });

        Ok(sent)
    }
}
