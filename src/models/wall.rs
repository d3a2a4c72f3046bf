use crate::{models::photo::SavedPhoto, result::Result, Client};
use serde::{Deserialize, Serialize};

/// A created wall post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WallPost {
    post_id: i64,
}

impl WallPost {
    /// Publishes `message` with `photo` attached on the wall of `group_id`, as the group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::error::Error::Api) if the platform answers
    /// with an `error` payload, or a network error if the request fails.
    pub async fn publish(
        client: &Client,
        access_token: &str,
        group_id: u64,
        message: &str,
        photo: &SavedPhoto,
    ) -> Result<Self> {
        let params = [
            ("owner_id", format!("-{group_id}")),
            ("from_group", "1".to_string()),
            ("message", message.to_string()),
            ("attachments", photo.attachment()),
        ];
        client.call_method("wall.post", access_token, &params).await
    }

    /// Returns the id of the post.
    pub fn post_id(&self) -> i64 {
        self.post_id
    }
}
