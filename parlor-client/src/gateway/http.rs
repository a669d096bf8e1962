use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{FileQuery, Gateway, GatewayError, NewFile, NewMessage, Result};
use crate::{
    ApiConfig, ChatMessage, FeedItem, FileEntry, Meeting, PaymentSplit, PrimaryKey, Room,
    RoomMember, User,
};

/// Talks to the parlor backend over http.
pub struct HttpGateway {
    client: Client,
    config: ApiConfig,
}

/// Most collection endpoints wrap their rows in a data envelope.
/// The feed and the account endpoints answer bare.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

impl HttpGateway {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.config.endpoint(path))
    }

    async fn send<T>(&self, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_unsuccessful_request(response, status).await);
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// Like send, for endpoints whose response body is irrelevant.
    async fn send_discarding(&self, request: RequestBuilder) -> Result<()> {
        let response = request
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_unsuccessful_request(response, status).await);
        }

        Ok(())
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn current_user(&self) -> Result<User> {
        self.send(self.get("/users/me")).await
    }

    async fn user_rooms(&self) -> Result<Vec<Room>> {
        self.send(self.get("/users/rooms")).await
    }

    async fn room_feed(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<FeedItem>> {
        let request = self
            .get("/rooms/feed")
            .query(&page_query(room_id, cursor, take));

        self.send(request).await
    }

    async fn room_payments(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<PaymentSplit>> {
        let request = self
            .get("/rooms/payments")
            .query(&page_query(room_id, cursor, take));

        let page: Envelope<Vec<PaymentSplit>> = self.send(request).await?;
        Ok(page.data)
    }

    async fn room_messages(
        &self,
        room_id: PrimaryKey,
        feed_id: Option<PrimaryKey>,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<ChatMessage>> {
        let mut query = page_query(room_id, cursor, take);
        if let Some(feed_id) = feed_id {
            query.push(("feed_id", feed_id.to_string()));
        }

        let page: Envelope<Vec<ChatMessage>> =
            self.send(self.get("/rooms/chat").query(&query)).await?;
        Ok(page.data)
    }

    async fn send_message(&self, new_message: NewMessage) -> Result<ChatMessage> {
        let mut query = vec![("room_id", new_message.room_id.to_string())];
        if let Some(feed_id) = new_message.feed_id {
            query.push(("feed_id", feed_id.to_string()));
        }

        let request = self
            .client
            .post(self.config.endpoint("/rooms/chat"))
            .query(&query)
            .json(&serde_json::json!({ "message": new_message.message }));

        let sent: Envelope<ChatMessage> = self.send(request).await?;
        Ok(sent.data)
    }

    async fn room_files(&self, room_id: PrimaryKey, query: FileQuery) -> Result<Vec<FileEntry>> {
        let mut params = vec![
            ("room_id", room_id.to_string()),
            ("skip", query.skip.to_string()),
            ("take", query.take.to_string()),
        ];

        if let Some(parent_id) = &query.parent_id {
            params.push(("parent_id", parent_id.clone()));
        }
        if let Some(search) = &query.search {
            params.push(("search_file_name", search.clone()));
        }

        let page: Envelope<Vec<FileEntry>> =
            self.send(self.get("/rooms/files").query(&params)).await?;
        Ok(page.data)
    }

    async fn create_file(&self, new_file: NewFile) -> Result<FileEntry> {
        let request = self
            .client
            .post(self.config.endpoint("/rooms/files"))
            .json(&new_file);

        let created: Envelope<FileEntry> = self.send(request).await?;
        Ok(created.data)
    }

    async fn room_members(
        &self,
        room_id: PrimaryKey,
        cursor: Option<PrimaryKey>,
        take: usize,
    ) -> Result<Vec<RoomMember>> {
        let request = self
            .get("/rooms/members")
            .query(&page_query(room_id, cursor, take));

        let page: Envelope<Vec<RoomMember>> = self.send(request).await?;
        Ok(page.data)
    }

    async fn room_meetings(&self, room_id: PrimaryKey) -> Result<Vec<Meeting>> {
        let request = self
            .get("/rooms/meetings")
            .query(&[("room_id", room_id.to_string())]);

        let page: Envelope<Vec<Meeting>> = self.send(request).await?;
        Ok(page.data)
    }

    async fn toggle_like(&self, feed_id: PrimaryKey) -> Result<()> {
        let request = self
            .client
            .put(self.config.endpoint("/rooms/feed/like"))
            .query(&[("feed_id", feed_id.to_string())]);

        self.send_discarding(request).await
    }
}

fn page_query(
    room_id: PrimaryKey,
    cursor: Option<PrimaryKey>,
    take: usize,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("room_id", room_id.to_string()), ("take", take.to_string())];

    if let Some(cursor) = cursor {
        query.push(("cursor", cursor.to_string()));
    }

    query
}

async fn handle_unsuccessful_request(response: Response, status: StatusCode) -> GatewayError {
    let message = match response.text().await {
        Ok(text) => extract_error_message(&text).unwrap_or(text),
        Err(e) => e.to_string(),
    };

    GatewayError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Pulls the message out of a json error body, if there is one
fn extract_error_message(text: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(text)
        .ok()
        .map(|body| body.message)
}
