//! Scripted gateway and record builders used across the test modules.

use std::collections::VecDeque;
use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use crossbeam::channel::unbounded;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    ChatMessage, ClientContext, EventReceiver, FeedItem, FileEntry, FileId, FileKind, FileQuery,
    Gateway, GatewayError, Meeting, NewFile, NewMessage, Payment, PaymentSplit, PrimaryKey,
    Result, Room, RoomMember, RoomStore, Session, User,
};

/// A call the mock gateway received, for asserting on request shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CurrentUser,
    UserRooms,
    Feed {
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    },
    Payments {
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    },
    Messages {
        room_id: PrimaryKey,
        feed_id: Option<PrimaryKey>,
        cursor: Option<PrimaryKey>,
        take: usize,
    },
    SendMessage {
        room_id: PrimaryKey,
        feed_id: Option<PrimaryKey>,
        message: String,
    },
    Files {
        room_id: PrimaryKey,
        parent_id: Option<FileId>,
        search: Option<String>,
        skip: usize,
        take: usize,
    },
    CreateFile {
        room_id: PrimaryKey,
        parent_id: Option<FileId>,
        file_name: String,
    },
    Members {
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    },
    Meetings {
        room_id: PrimaryKey,
    },
    ToggleLike {
        feed_id: PrimaryKey,
    },
}

/// A stand-in backend serving scripted pages.
///
/// Pages are served in the order they were pushed, and an exhausted script
/// serves empty pages, which is how a real backend signals the end.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,

    user: Mutex<Option<User>>,
    rooms: Mutex<Vec<Room>>,
    feed_pages: Mutex<VecDeque<Vec<FeedItem>>>,
    payment_pages: Mutex<VecDeque<Vec<PaymentSplit>>>,
    message_pages: Mutex<VecDeque<Vec<ChatMessage>>>,
    file_pages: Mutex<VecDeque<Vec<FileEntry>>>,
    member_pages: Mutex<VecDeque<Vec<RoomMember>>>,
    meetings: Mutex<Vec<Meeting>>,

    failure: Mutex<Option<GatewayError>>,
    sent: Mutex<PrimaryKey>,

    held: Mutex<bool>,
    gate: Notify,
}

impl MockGateway {
    pub fn set_user(&self, user: User) {
        *self.user.lock() = Some(user);
    }

    pub fn set_rooms(&self, rooms: Vec<Room>) {
        *self.rooms.lock() = rooms;
    }

    pub fn set_meetings(&self, meetings: Vec<Meeting>) {
        *self.meetings.lock() = meetings;
    }

    pub fn push_feed_page(&self, page: Vec<FeedItem>) {
        self.feed_pages.lock().push_back(page);
    }

    pub fn push_payment_page(&self, page: Vec<PaymentSplit>) {
        self.payment_pages.lock().push_back(page);
    }

    pub fn push_message_page(&self, page: Vec<ChatMessage>) {
        self.message_pages.lock().push_back(page);
    }

    pub fn push_file_page(&self, page: Vec<FileEntry>) {
        self.file_pages.lock().push_back(page);
    }

    pub fn push_member_page(&self, page: Vec<RoomMember>) {
        self.member_pages.lock().push_back(page);
    }

    /// Makes the next call fail with the given error.
    pub fn fail_next(&self, error: GatewayError) {
        *self.failure.lock() = Some(error);
    }

    /// Parks the next call until release is called, to get a request
    /// reliably in flight.
    pub fn hold_next(&self) {
        *self.held.lock() = true;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }

    async fn checkpoint(&self) -> Result<()> {
        let held = mem::take(&mut *self.held.lock());
        if held {
            self.gate.notified().await;
        }

        match self.failure.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn current_user(&self) -> Result<User> {
        self.record(GatewayCall::CurrentUser);
        self.checkpoint().await?;

        Ok(self.user.lock().clone().unwrap_or_else(|| User::mock(1)))
    }

    async fn user_rooms(&self) -> Result<Vec<Room>> {
        self.record(GatewayCall::UserRooms);
        self.checkpoint().await?;

        Ok(self.rooms.lock().clone())
    }

    async fn room_feed(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<FeedItem>> {
        self.record(GatewayCall::Feed {
            room_id,
            cursor,
            take,
        });
        self.checkpoint().await?;

        Ok(self.feed_pages.lock().pop_front().unwrap_or_default())
    }

    async fn room_payments(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<PaymentSplit>> {
        self.record(GatewayCall::Payments {
            room_id,
            cursor,
            take,
        });
        self.checkpoint().await?;

        Ok(self.payment_pages.lock().pop_front().unwrap_or_default())
    }

    async fn room_messages(
        &self,
        room_id: PrimaryKey,
        feed_id: Option<PrimaryKey>,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<ChatMessage>> {
        self.record(GatewayCall::Messages {
            room_id,
            feed_id,
            cursor,
            take,
        });
        self.checkpoint().await?;

        Ok(self.message_pages.lock().pop_front().unwrap_or_default())
    }

    async fn send_message(&self, new_message: NewMessage) -> Result<ChatMessage> {
        self.record(GatewayCall::SendMessage {
            room_id: new_message.room_id,
            feed_id: new_message.feed_id,
            message: new_message.message.clone(),
        });
        self.checkpoint().await?;

        let id = {
            let mut sent = self.sent.lock();
            *sent += 1;
            900 + *sent
        };

        Ok(ChatMessage {
            id,
            message: new_message.message,
            user: User::mock(1),
            files: Vec::new(),
            created_at: mock_time(),
            feed_id: new_message.feed_id,
        })
    }

    async fn room_files(&self, room_id: PrimaryKey, query: FileQuery) -> Result<Vec<FileEntry>> {
        self.record(GatewayCall::Files {
            room_id,
            parent_id: query.parent_id,
            search: query.search,
            skip: query.skip,
            take: query.take,
        });
        self.checkpoint().await?;

        Ok(self.file_pages.lock().pop_front().unwrap_or_default())
    }

    async fn create_file(&self, new_file: NewFile) -> Result<FileEntry> {
        self.record(GatewayCall::CreateFile {
            room_id: new_file.room_id,
            parent_id: new_file.parent_id.clone(),
            file_name: new_file.file_name.clone(),
        });
        self.checkpoint().await?;

        Ok(FileEntry {
            id: format!("created-{}", new_file.file_name),
            file_name: new_file.file_name,
            file_type: new_file.file_type,
            file_extension: new_file.file_extension,
            file_url: None,
            compressed_file_url: None,
            parent_id: new_file.parent_id,
        })
    }

    async fn room_members(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<RoomMember>> {
        self.record(GatewayCall::Members {
            room_id,
            cursor,
            take,
        });
        self.checkpoint().await?;

        Ok(self.member_pages.lock().pop_front().unwrap_or_default())
    }

    async fn room_meetings(&self, room_id: PrimaryKey) -> Result<Vec<Meeting>> {
        self.record(GatewayCall::Meetings { room_id });
        self.checkpoint().await?;

        Ok(self.meetings.lock().clone())
    }

    async fn toggle_like(&self, feed_id: PrimaryKey) -> Result<()> {
        self.record(GatewayCall::ToggleLike { feed_id });
        self.checkpoint().await?;

        Ok(())
    }
}

// Realistically, the context is created by the client facade. The tests want
// a handle on the gateway and the event stream as well.
pub fn mock_store() -> (RoomStore<MockGateway>, Arc<MockGateway>, EventReceiver) {
    let gateway = Arc::new(MockGateway::default());
    let (event_sender, event_receiver) = unbounded();

    let context = ClientContext {
        gateway: gateway.clone(),
        event_sender,
    };
    let store = RoomStore::new(&context);

    (store, gateway, event_receiver)
}

pub fn mock_session() -> (Session<MockGateway>, Arc<MockGateway>, EventReceiver) {
    let gateway = Arc::new(MockGateway::default());
    let (event_sender, event_receiver) = unbounded();

    let context = ClientContext {
        gateway: gateway.clone(),
        event_sender,
    };
    let session = Session::new(&context);

    (session, gateway, event_receiver)
}

pub fn drain_events(events: &EventReceiver) -> Vec<crate::ClientEvent> {
    events.try_iter().collect()
}

pub fn status_error(status: u16) -> GatewayError {
    GatewayError::Status {
        status,
        message: "scripted failure".to_string(),
    }
}

fn mock_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

impl User {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            name: format!("user-{}", id),
            email: format!("user-{}@example.com", id),
            phone: None,
            photo_url: None,
        }
    }
}

impl Room {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            name: format!("room-{}", id),
            description: None,
            photo_url: None,
        }
    }
}

impl RoomMember {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            room_id: 1,
            user: User::mock(id),
        }
    }
}

impl FeedItem {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            author: User::mock(1),
            message: Some(format!("post {}", id)),
            created_at: mock_time(),
            files: Vec::new(),
            likes: 0,
            comments: 0,
            views: 0,
            user_liked: false,
            payment_split: None,
        }
    }
}

impl ChatMessage {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            message: format!("message {}", id),
            user: User::mock(1),
            files: Vec::new(),
            created_at: mock_time(),
            feed_id: None,
        }
    }
}

impl FileEntry {
    pub fn mock(id: &str) -> Self {
        Self {
            id: id.to_string(),
            file_name: format!("{}.pdf", id),
            file_type: FileKind::Document,
            file_extension: "pdf".to_string(),
            file_url: None,
            compressed_file_url: None,
            parent_id: None,
        }
    }

    pub fn mock_folder(id: &str) -> Self {
        Self {
            id: id.to_string(),
            file_name: id.to_string(),
            file_type: FileKind::Folder,
            file_extension: "folder".to_string(),
            file_url: None,
            compressed_file_url: None,
            parent_id: None,
        }
    }
}

impl Meeting {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            room_id: 1,
            name: format!("meeting-{}", id),
            description: None,
            scheduled_at: mock_time(),
        }
    }
}

impl PaymentSplit {
    pub fn mock(id: PrimaryKey) -> Self {
        Self {
            id,
            amount: 500.0,
            paid_at: None,
            payment: Payment {
                id,
                name: format!("payment-{}", id),
                description: None,
                total_amount: 1500.0,
            },
        }
    }
}
