//! `reqwest` implementation of [`NotificationTransport`].

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::{debug, instrument};

use gymhub_core::config::api::ApiConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::id::{NotificationId, UserId};
use gymhub_entity::notification::{NewNotification, Notification};

use crate::body;
use crate::transport::NotificationTransport;

/// HTTP client for the notification endpoints.
///
/// - `GET  {base}/notifications/{user_id}`
/// - `POST {base}/notifications/{user_id}/{id}/read`
/// - `POST {base}/notifications/create`
#[derive(Debug, Clone)]
pub struct HttpNotificationClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpNotificationClient {
    /// Build a client from the `[api]` config section.
    pub fn new(config: &ApiConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid api.base_url '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "api.base_url '{base_url}' cannot carry a path"
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Send `Authorization: Bearer {token}` on every request.
    pub fn with_bearer_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Build `{base}/notifications/{segments...}` with each segment escaped.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::configuration("api.base_url cannot carry a path"))?
            .pop_if_empty()
            .push("notifications")
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turn a non-2xx response into a `Server` error and return the body bytes.
async fn success_body(response: Response) -> AppResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let detail = response.text().await.unwrap_or_default();
        let detail = detail.chars().take(200).collect::<String>();
        return Err(AppError::server(
            status.as_u16(),
            format!("Backend returned {status}: {detail}"),
        ));
    }
    Ok(response.bytes().await?.to_vec())
}

#[async_trait]
impl NotificationTransport for HttpNotificationClient {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn fetch_for_user(&self, user_id: &UserId) -> AppResult<Vec<Notification>> {
        let url = self.endpoint(&[user_id.as_str()])?;
        let response = self.authorize(self.client.get(url)).send().await?;
        let bytes = success_body(response).await?;
        let list: Vec<Notification> = body::decode(&bytes)?;
        debug!(count = list.len(), "Fetched notifications");
        Ok(list)
    }

    #[instrument(skip(self), fields(user_id = %user_id, notification_id = %id))]
    async fn mark_read(
        &self,
        user_id: &UserId,
        id: &NotificationId,
    ) -> AppResult<Option<Notification>> {
        let url = self.endpoint(&[user_id.as_str(), id.as_str(), "read"])?;
        let response = self.authorize(self.client.post(url)).send().await?;
        let bytes = success_body(response).await?;
        Ok(body::decode_optional(&bytes))
    }

    #[instrument(skip(self, payload), fields(user_id = %payload.user_id))]
    async fn create(&self, payload: &NewNotification) -> AppResult<Notification> {
        payload.check()?;
        let url = self.endpoint(&["create"])?;
        let response = self
            .authorize(self.client.post(url).json(payload))
            .send()
            .await?;
        let bytes = success_body(response).await?;
        body::decode(&bytes)
    }
}
