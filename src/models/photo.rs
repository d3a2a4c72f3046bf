use crate::{error::Error, models::upload::UploadedPhoto, result::Result, Client};
use serde::{Deserialize, Serialize};

/// A photo persisted in the group's media store by `photos.saveWallPhoto`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SavedPhoto {
    /// Photo id.
    id: i64,
    /// Owner of the photo (negative for groups).
    owner_id: i64,
}

impl SavedPhoto {
    /// Exchanges an upload descriptor for a saved photo in `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the platform answers with an `error` payload,
    /// [`Error::Data`] if the result list is empty, or a network error if the
    /// request fails.
    pub async fn save(
        client: &Client,
        access_token: &str,
        uploaded: &UploadedPhoto,
        group_id: u64,
    ) -> Result<Self> {
        let params = [
            ("photo", uploaded.photo().to_string()),
            ("server", uploaded.server().to_string()),
            ("hash", uploaded.hash().to_string()),
            ("group_id", group_id.to_string()),
        ];
        let saved: Vec<SavedPhoto> = client
            .call_method("photos.saveWallPhoto", access_token, &params)
            .await?;
        saved
            .into_iter()
            .next()
            .ok_or_else(|| Error::Data("photos.saveWallPhoto: empty result list".into()))
    }

    /// Returns the photo id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the owner id.
    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    /// Attachment reference for `wall.post`: `photo{owner_id}_{id}`.
    pub fn attachment(&self) -> String {
        format!("photo{}_{}", self.owner_id, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_format() {
        let photo: SavedPhoto = serde_json::from_str(r#"{"id":42,"owner_id":7}"#).unwrap();
        assert_eq!(photo.attachment(), "photo7_42");

        let photo: SavedPhoto =
            serde_json::from_str(r#"{"id":457239017,"owner_id":-218375442,"album_id":-14,"sizes":[]}"#)
                .unwrap();
        assert_eq!(photo.attachment(), "photo-218375442_457239017");
    }
}
