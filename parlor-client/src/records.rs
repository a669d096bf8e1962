use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type used for primary keys in the backend.
pub type PrimaryKey = u64;

/// Files are keyed by an opaque string id, unlike every other resource.
pub type FileId = String;

/// A parlor account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: PrimaryKey,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

/// A room the user is a member of
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Room {
    pub id: PrimaryKey,
    pub name: String,
    pub description: Option<String>,
    pub photo_url: Option<String>,
}

/// A member of a room
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoomMember {
    pub id: PrimaryKey,
    pub room_id: PrimaryKey,
    pub user: User,
}

/// A post on a room's feed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedItem {
    pub id: PrimaryKey,
    pub author: User,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Attachments rendered inline with the post
    #[serde(default)]
    pub files: Vec<FileEntry>,
    pub likes: u32,
    pub comments: u32,
    pub views: u32,
    /// Whether the current account has liked this post
    pub user_liked: bool,
    /// Present when the post announces a payment request
    #[serde(rename = "payment_splits")]
    pub payment_split: Option<PaymentSplit>,
}

/// A message in a room's chat, or in a feed item's comment thread
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub id: PrimaryKey,
    pub message: String,
    pub user: User,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    pub created_at: DateTime<Utc>,
    /// Set when the message belongs to a feed item's thread rather than the room chat
    pub feed_id: Option<PrimaryKey>,
}

/// A file or folder in a room's file area
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileEntry {
    pub id: FileId,
    pub file_name: String,
    pub file_type: FileKind,
    pub file_extension: String,
    pub file_url: Option<String>,
    /// Downscaled variant served for image previews
    pub compressed_file_url: Option<String>,
    /// None when the entry sits at the room's file root
    pub parent_id: Option<FileId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileKind {
    Folder,
    Document,
    Image,
    #[serde(other)]
    Other,
}

/// A scheduled meeting in a room
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Meeting {
    pub id: PrimaryKey,
    pub room_id: PrimaryKey,
    pub name: String,
    pub description: Option<String>,
    pub scheduled_at: DateTime<Utc>,
}

/// The current account's share of a payment request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentSplit {
    pub id: PrimaryKey,
    pub amount: f64,
    /// None until the split has been settled
    pub paid_at: Option<DateTime<Utc>>,
    pub payment: Payment,
}

/// The payment request a split belongs to
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Payment {
    pub id: PrimaryKey,
    pub name: String,
    pub description: Option<String>,
    /// What the request adds up to across every member's split
    pub total_amount: f64,
}

impl FileEntry {
    pub fn is_folder(&self) -> bool {
        self.file_type == FileKind::Folder
    }
}
