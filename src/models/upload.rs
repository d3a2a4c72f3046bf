use crate::{
    error::Error, image::ImageFile, models::de_opaque, result::Result, Client,
};
use serde::{Deserialize, Serialize};

/// One-time upload endpoint returned by `photos.getWallUploadServer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadServer {
    /// Where the image bytes are posted.
    upload_url: String,

    /// Album the photo lands in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    album_id: Option<i64>,
}

impl UploadServer {
    /// Requests an upload endpoint scoped to `group_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the platform answers with an `error` payload
    /// (even under HTTP 200), or a network error if the request fails.
    pub async fn get(client: &Client, access_token: &str, group_id: u64) -> Result<Self> {
        let params = [("group_id", group_id.to_string())];
        let server: UploadServer = client
            .call_method("photos.getWallUploadServer", access_token, &params)
            .await?;
        if server.upload_url.is_empty() {
            return Err(Error::Data("photos.getWallUploadServer: empty upload_url".into()));
        }
        Ok(server)
    }

    /// Returns the upload URL.
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Returns the album id, if the platform reported one.
    pub fn album_id(&self) -> Option<i64> {
        self.album_id
    }
}

/// Upload descriptor: what the upload endpoint hands back for a posted image.
///
/// Only valid for `photos.saveWallPhoto` against the group whose upload
/// endpoint produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedPhoto {
    /// Opaque photo token (a JSON-encoded list, `"[]"` when nothing was stored).
    photo: String,

    /// Id of the storage server that took the upload.
    #[serde(deserialize_with = "de_opaque")]
    server: String,

    /// Integrity hash for the save call.
    hash: String,
}

impl UploadedPhoto {
    /// Posts `image` to `server`'s upload URL as multipart field `photo`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] if the endpoint reports an error or stores no
    /// photo, a network error if the request fails, or an I/O error if the
    /// image cannot be read.
    pub async fn upload(client: &Client, server: &UploadServer, image: &ImageFile) -> Result<Self> {
        let bytes = image.read().await?;
        let reply = client
            .upload(
                server.upload_url(),
                "photo",
                image.upload_name().to_string(),
                bytes,
            )
            .await?;
        Self::from_reply(reply)
    }

    fn from_reply(reply: serde_json::Value) -> Result<Self> {
        if let Some(error) = reply.get("error") {
            let message = match error {
                serde_json::Value::String(s) => s.clone(),
                other => other
                    .get("error_msg")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| other.to_string(), ToString::to_string),
            };
            let code = error
                .get("error_code")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or_default();
            return Err(Error::Api {
                method: "upload".into(),
                code,
                message,
            });
        }

        let uploaded: UploadedPhoto =
            serde_json::from_value(reply).map_err(|e| Error::Data(format!("upload: {e}")))?;
        if uploaded.photo.trim().is_empty() || uploaded.photo.trim() == "[]" {
            return Err(Error::Api {
                method: "upload".into(),
                code: 0,
                message: "upload endpoint stored no photo".into(),
            });
        }
        Ok(uploaded)
    }

    /// Returns the photo token.
    pub fn photo(&self) -> &str {
        &self.photo
    }

    /// Returns the server id.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Returns the upload hash.
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn numeric_server_is_kept_as_text() {
        let uploaded = UploadedPhoto::from_reply(json!({
            "server": 851_236,
            "photo": "[{\"markers_restarted\":true,\"photo\":\"4d2c:x\"}]",
            "hash": "8c1f0b"
        }))
        .unwrap();
        assert_eq!(uploaded.server(), "851236");
        assert_eq!(uploaded.hash(), "8c1f0b");
        assert!(uploaded.photo().starts_with("[{"));
    }

    #[test]
    fn error_string_from_upload_endpoint() {
        let err = UploadedPhoto::from_reply(json!({"error": "ERR_UPLOAD_BAD_IMAGE_SIZE"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert!(err.to_string().contains("ERR_UPLOAD_BAD_IMAGE_SIZE"));
    }

    #[test]
    fn error_object_from_upload_endpoint() {
        let err = UploadedPhoto::from_reply(json!({
            "error": {"error_code": 100, "error_msg": "One of the parameters specified was missing or invalid"}
        }))
        .unwrap_err();
        match err {
            Error::Api { code, message, .. } => {
                assert_eq!(code, 100);
                assert!(message.starts_with("One of the parameters"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_photo_list_is_a_failure() {
        let err = UploadedPhoto::from_reply(json!({"server": 1, "photo": "[]", "hash": "h"}))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn missing_hash_is_a_data_error() {
        let err = UploadedPhoto::from_reply(json!({"server": 1, "photo": "[{}]"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }
}
