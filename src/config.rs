use std::{fmt, path::PathBuf, time::Duration};

use crate::{error::Error, result::Result};

/// API version sent with every platform method call.
pub const DEFAULT_API_VERSION: &str = "5.131";
/// Platform API root; method calls go to `{root}/method/{name}`.
pub const DEFAULT_API_URL: &str = "https://api.vk.com";
/// Comic service root.
pub const DEFAULT_COMIC_URL: &str = "https://xkcd.com";
/// Per-request timeout unless `HTTP_TIMEOUT_SECS` says otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for a single publishing run.
///
/// Built once at start-up and handed to [`Publisher`](crate::Publisher);
/// nothing below it reads the environment.
#[derive(Clone)]
pub struct Config {
    access_token: String,
    group_id: u64,
    api_version: String,
    api_url: String,
    comic_url: String,
    timeout: Duration,
    work_dir: PathBuf,
}

impl Config {
    /// Creates a configuration with default endpoints for the given token and group.
    pub fn new(access_token: impl Into<String>, group_id: u64) -> Self {
        Self {
            access_token: access_token.into(),
            group_id,
            api_version: DEFAULT_API_VERSION.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            comic_url: DEFAULT_COMIC_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            work_dir: std::env::temp_dir(),
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingVar`] if `VK_API_KEY` or `VK_GROUP_ID` is unset,
    /// or [`Error::InvalidVar`] if a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let access_token = get("VK_API_KEY").ok_or(Error::MissingVar("VK_API_KEY"))?;
        let group_id = get("VK_GROUP_ID").ok_or(Error::MissingVar("VK_GROUP_ID"))?;
        let mut config = Self::new(access_token.trim(), parse_group_id(&group_id)?);

        if let Some(version) = get("VK_API_VERSION") {
            config.api_version = version.trim().to_string();
        }
        if let Some(url) = get("VK_API_URL") {
            config.api_url = parse_base_url("VK_API_URL", &url)?;
        }
        if let Some(url) = get("XKCD_URL") {
            config.comic_url = parse_base_url("XKCD_URL", &url)?;
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e| Error::InvalidVar {
                name: "HTTP_TIMEOUT_SECS",
                reason: format!("{e}"),
            })?;
            if secs == 0 {
                return Err(Error::InvalidVar {
                    name: "HTTP_TIMEOUT_SECS",
                    reason: "timeout must be at least one second".into(),
                });
            }
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = get("COMIC_WORK_DIR") {
            config.work_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Overrides the platform API root.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = trim_base(&url.into());
        self
    }

    /// Overrides the comic service root.
    #[must_use]
    pub fn with_comic_url(mut self, url: impl Into<String>) -> Self {
        self.comic_url = trim_base(&url.into());
        self
    }

    /// Overrides the API version string.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides where the downloaded image is stored while it is uploaded.
    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    /// Returns the platform access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the destination group id (positive).
    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    /// Returns the API version string.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Returns the platform API root, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the comic service root, without a trailing slash.
    pub fn comic_url(&self) -> &str {
        &self.comic_url
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the directory the image is downloaded into.
    pub fn work_dir(&self) -> &std::path::Path {
        &self.work_dir
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("group_id", &self.group_id)
            .field("api_version", &self.api_version)
            .field("api_url", &self.api_url)
            .field("comic_url", &self.comic_url)
            .field("timeout", &self.timeout)
            .field("work_dir", &self.work_dir)
            .finish()
    }
}

fn parse_group_id(raw: &str) -> Result<u64> {
    // group ids are often copied in their negative wall-owner form
    let digits = raw.trim().trim_start_matches('-');
    match digits.parse::<u64>() {
        Ok(0) => Err(Error::InvalidVar {
            name: "VK_GROUP_ID",
            reason: "group id must be positive".into(),
        }),
        Ok(id) => Ok(id),
        Err(e) => Err(Error::InvalidVar {
            name: "VK_GROUP_ID",
            reason: format!("{raw:?} is not a group id: {e}"),
        }),
    }
}

fn parse_base_url(name: &'static str, raw: &str) -> Result<String> {
    let url = url::Url::parse(raw.trim()).map_err(|e| Error::InvalidVar {
        name,
        reason: format!("{e}"),
    })?;
    Ok(trim_base(url.as_str()))
}

fn trim_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn required_values_only() {
        let config =
            Config::from_lookup(lookup(&[("VK_API_KEY", "secret"), ("VK_GROUP_ID", "12345")]))
                .unwrap();
        assert_eq!(config.access_token(), "secret");
        assert_eq!(config.group_id(), 12345);
        assert_eq!(config.api_version(), "5.131");
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.comic_url(), DEFAULT_COMIC_URL);
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_token_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&[("VK_GROUP_ID", "1")])).unwrap_err();
        assert!(matches!(err, Error::MissingVar("VK_API_KEY")));

        let err = Config::from_lookup(lookup(&[("VK_API_KEY", "x"), ("VK_GROUP_ID", "  ")]))
            .unwrap_err();
        assert!(matches!(err, Error::MissingVar("VK_GROUP_ID")));
    }

    #[test]
    fn group_id_accepts_wall_owner_form() {
        let config =
            Config::from_lookup(lookup(&[("VK_API_KEY", "x"), ("VK_GROUP_ID", "-777")])).unwrap();
        assert_eq!(config.group_id(), 777);

        for bad in ["0", "club777", "-"] {
            let err = Config::from_lookup(lookup(&[("VK_API_KEY", "x"), ("VK_GROUP_ID", bad)]))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidVar { name: "VK_GROUP_ID", .. }), "{bad}");
        }
    }

    #[test]
    fn optional_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("VK_API_KEY", "x"),
            ("VK_GROUP_ID", "1"),
            ("VK_API_VERSION", "5.199"),
            ("VK_API_URL", "http://127.0.0.1:8080/"),
            ("XKCD_URL", "http://127.0.0.1:9090"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("COMIC_WORK_DIR", "/var/tmp/comics"),
        ]))
        .unwrap();
        assert_eq!(config.api_version(), "5.199");
        assert_eq!(config.api_url(), "http://127.0.0.1:8080");
        assert_eq!(config.comic_url(), "http://127.0.0.1:9090");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.work_dir(), std::path::Path::new("/var/tmp/comics"));

        let err = Config::from_lookup(lookup(&[
            ("VK_API_KEY", "x"),
            ("VK_GROUP_ID", "1"),
            ("HTTP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidVar { name: "HTTP_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn debug_hides_token() {
        let config = Config::new("very-secret-token", 1);
        let shown = format!("{config:?}");
        assert!(!shown.contains("very-secret-token"));
        assert!(shown.contains("<redacted>"));
    }
}
