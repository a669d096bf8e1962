use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

mod http;
pub use http::*;

use crate::{
    ChatMessage, FeedItem, FileEntry, FileId, FileKind, Meeting, PaymentSplit, PrimaryKey, Room,
    RoomMember, User,
};

pub type Result<T> = std::result::Result<T, GatewayError>;
pub type BoxedGateway = Box<dyn Gateway>;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The request never reached the backend or the connection dropped
    #[error("request failed: {0}")]
    Network(String),
    /// The backend answered with a non-success status
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Represents a type that can reach the parlor backend
#[async_trait]
pub trait Gateway {
    async fn current_user(&self) -> Result<User>;
    async fn user_rooms(&self) -> Result<Vec<Room>>;

    /// Feed items after the cursor, newest first
    async fn room_feed(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<FeedItem>>;

    async fn room_payments(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<PaymentSplit>>;

    /// Messages older than the cursor, newest first. A feed id scopes the
    /// page to that post's thread.
    async fn room_messages(
        &self,
        room_id: PrimaryKey,
        feed_id: Option<PrimaryKey>,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<ChatMessage>>;

    async fn send_message(&self, new_message: NewMessage) -> Result<ChatMessage>;

    async fn room_files(&self, room_id: PrimaryKey, query: FileQuery) -> Result<Vec<FileEntry>>;
    async fn create_file(&self, new_file: NewFile) -> Result<FileEntry>;

    async fn room_members(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<RoomMember>>;

    async fn room_meetings(&self, room_id: PrimaryKey) -> Result<Vec<Meeting>>;

    /// Flips the account's like on a feed item
    async fn toggle_like(&self, feed_id: PrimaryKey) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub room_id: PrimaryKey,
    /// Targets a post's thread instead of the room chat
    pub feed_id: Option<PrimaryKey>,
    pub message: String,
}

/// Offset-paged listing of a folder in a room's file area
#[derive(Debug, Clone)]
pub struct FileQuery {
    /// The folder to list, or the file root when None
    pub parent_id: Option<FileId>,
    /// Matches file names when set
    pub search: Option<String>,
    pub skip: usize,
    pub take: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFile {
    pub room_id: PrimaryKey,
    pub parent_id: Option<FileId>,
    pub file_name: String,
    pub file_extension: String,
    pub file_type: FileKind,
}
