/// Comic metadata, random selection and image download.
pub mod comic;
/// Saving an upload as a group photo.
pub mod photo;
/// Upload endpoint resolution and the image upload itself.
pub mod upload;
/// Wall posts.
pub mod wall;

/// Accepts a JSON string or number and keeps it as text.
///
/// The upload endpoint reports `server` as a number today, but the value is
/// only ever echoed back to the platform.
pub(crate) fn de_opaque<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected string or number, found {other}"
        ))),
    }
}
