use crate::{config::Config, error::Error, result::Result};
use reqwest::{multipart, Client as ReqwestClient, Response};
use serde::{de::DeserializeOwned, Deserialize};

const AGENT: &str = concat!("XkcdVkPoster/", env!("CARGO_PKG_VERSION"));

/// HTTP client shared by every step of a run.
///
/// Holds the endpoint roots and API version from [`Config`]; the access
/// token is passed per call.
#[derive(Debug, Clone)]
pub struct Client {
    http: ReqwestClient,
    comic_url: String,
    api_url: String,
    api_version: String,
}

impl Client {
    /// Builds a client with the timeout and endpoints from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClientFormation`] if the TLS backend cannot be initialised.
    pub fn new(config: &Config) -> Result<Client> {
        let http = ReqwestClient::builder()
            .user_agent(AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(Error::ClientFormation)?;

        Ok(Client {
            http,
            comic_url: config.comic_url().to_string(),
            api_url: config.api_url().to_string(),
            api_version: config.api_version().to_string(),
        })
    }

    /// Metadata URL of comic `index`, or of the latest comic for `None`.
    pub(crate) fn comic_info_url(&self, index: Option<u32>) -> String {
        match index {
            Some(index) => format!("{}/{index}/info.0.json", self.comic_url),
            None => format!("{}/info.0.json", self.comic_url),
        }
    }

    pub(crate) async fn fetch_json<T>(&self, url: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let body = self.fetch_bytes(url).await?;
        serde_json::from_slice(&body).map_err(|e| Error::Data(format!("{url}: {e}")))
    }

    pub(crate) async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        log::info!("request for {} dispatched", url);
        let response = self.http.get(url).send().await?;
        let response = check_status(response)?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Calls platform method `method` with `params` on top of the token and version.
    ///
    /// A 2xx response carrying an `error` object is turned into [`Error::Api`].
    pub(crate) async fn call_method<T>(
        &self,
        method: &str,
        access_token: &str,
        params: &[(&str, String)],
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/method/{method}", self.api_url);
        let mut form: Vec<(&str, &str)> =
            vec![("access_token", access_token), ("v", self.api_version.as_str())];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        log::info!("request for {} dispatched", method);
        let response = self.http.post(&url).form(&form).send().await?;
        let body = check_status(response)?.bytes().await?;

        let envelope: Envelope<T> = serde_json::from_slice(&body)
            .map_err(|e| Error::Data(format!("{method}: {e}")))?;
        envelope.into_result(method)
    }

    /// Posts `bytes` as multipart field `field` to a one-time upload URL.
    pub(crate) async fn upload(
        &self,
        url: &str,
        field: &'static str,
        file_name: String,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value> {
        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part(field, part);

        log::info!("upload to {} dispatched", strip_query(url));
        let response = self.http.post(url).multipart(form).send().await?;
        let body = check_status(response)?.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::Data(format!("upload: {e}")))
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    log::debug!("response status: {}", status);
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus {
            status,
            url: strip_query(response.url().as_str()).to_string(),
        })
    }
}

// upload URLs carry signed query strings
fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Platform response: either `{"response": ...}` or `{"error": {...}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    response: Option<T>,
    error: Option<ApiFault>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiFault {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_msg: String,
}

impl<T> Envelope<T> {
    pub(crate) fn into_result(self, method: &str) -> Result<T> {
        match (self.error, self.response) {
            (Some(fault), _) => Err(Error::Api {
                method: method.to_string(),
                code: fault.error_code,
                message: fault.error_msg,
            }),
            (None, Some(response)) => Ok(response),
            (None, None) => Err(Error::Data(format!("{method}: no `response` field"))),
        }
    }
}
