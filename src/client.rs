use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::Session;

/// REST client bound to one backend and, once logged in, one bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config, session: &Session) -> Result<Self> {
        Self::build(config, Some(session.token().to_string()))
    }

    /// Client that authenticates with a token before a [`Session`] exists.
    pub fn with_token(config: &Config, token: &str) -> Result<Self> {
        Self::build(config, Some(token.to_string()))
    }

    pub fn anonymous(config: &Config) -> Result<Self> {
        Self::build(config, None)
    }

    fn build(config: &Config, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base().to_string(),
            token,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `/api/<resource>` and decode a JSON array.
    pub async fn list<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        self.get(&format!("/api/{}", resource)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!("GET {}", path);
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        let body = check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        tracing::debug!("GET {} (blob)", path);
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        let body = check(response).await?.bytes().await?;
        Ok(body.to_vec())
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        let body = check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        tracing::debug!("POST {} (multipart)", path);
        let response = self
            .authorize(self.client.post(self.url(path)))
            .multipart(form)
            .send()
            .await?;
        let body = check(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = extract_detail(&text);
    tracing::debug!("Backend error {}: {:?}", status, detail);

    Err(Error::Backend {
        status: status.as_u16(),
        detail,
    })
}

/// The `detail` string of a JSON error body, if there is one.
pub fn extract_detail(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("detail")?
        .as_str()
        .map(str::to_string)
}
