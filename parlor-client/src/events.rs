use crossbeam::channel::{Receiver, Sender};

use crate::{PrimaryKey, Tab};

pub type EventSender = Sender<ClientEvent>;
pub type EventReceiver = Receiver<ClientEvent>;

/// Events emitted as the client's state changes
#[derive(Debug)]
pub enum ClientEvent {
    /// The account bootstrap finished
    SessionLoaded {
        user_id: PrimaryKey,
        /// How many rooms the account is a member of
        rooms: usize,
    },
    /// A room from the account's list became the selected room
    RoomSelected { room_id: PrimaryKey },
    /// A room outside the account's list was opened and should be previewed
    RoomPreviewRequested { room_id: PrimaryKey },
    /// A tab of the selected room committed a page
    TabUpdated {
        room_id: PrimaryKey,
        tab: Tab,
        /// How many rows the page added
        appended: usize,
    },
    /// A sent chat message was confirmed by the backend
    MessageSent {
        room_id: PrimaryKey,
        message_id: PrimaryKey,
    },
    /// A like toggle was confirmed and applied to a loaded feed item
    FeedLikeToggled {
        feed_id: PrimaryKey,
        likes: u32,
        user_liked: bool,
    },
}
