//! WebSocket implementation of [`LiveConnector`].

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use gymhub_core::config::realtime::RealtimeConfig;
use gymhub_core::error::AppError;
use gymhub_core::result::AppResult;
use gymhub_core::types::id::UserId;
use gymhub_entity::notification::Notification;

use crate::connection::subscription::LiveSubscription;
use crate::connector::LiveConnector;
use crate::message::codec;
use crate::message::types::{ClientMessage, ServerMessage};
use crate::message::notification_channel;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connects to the backend's WebSocket endpoint and subscribes to the
/// user's notification channel.
#[derive(Debug, Clone)]
pub struct WsLiveConnector {
    url: String,
    token: Option<String>,
    connect_timeout: Duration,
    buffer_size: usize,
}

impl WsLiveConnector {
    /// Build from the `[realtime]` config section.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            url: config.url.clone(),
            token: None,
            connect_timeout: config.connect_timeout(),
            buffer_size: config.channel_buffer_size.max(1),
        }
    }

    /// Pass `token` as a `?token=` query parameter on connect.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn connect_url(&self) -> AppResult<Url> {
        let mut url = Url::parse(&self.url).map_err(|e| {
            AppError::channel_unavailable(format!("Invalid realtime.url '{}': {e}", self.url))
        })?;
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url)
    }

    async fn handshake(&self, url: Url, channel: String) -> AppResult<Socket> {
        let (mut socket, _response) = connect_async(url.as_str()).await.map_err(|e| {
            AppError::with_source(
                gymhub_core::error::ErrorKind::ChannelUnavailable,
                format!("WebSocket connect failed: {e}"),
                e,
            )
        })?;

        socket
            .send(codec::encode(&ClientMessage::Subscribe { channel })?)
            .await
            .map_err(|e| AppError::channel_unavailable(format!("Subscribe failed: {e}")))?;

        Ok(socket)
    }
}

#[async_trait]
impl LiveConnector for WsLiveConnector {
    async fn connect(&self, user_id: &UserId) -> AppResult<LiveSubscription> {
        let url = self.connect_url()?;
        let channel = notification_channel(user_id);

        let socket = tokio::time::timeout(self.connect_timeout, self.handshake(url, channel.clone()))
            .await
            .map_err(|_| {
                AppError::channel_unavailable(format!(
                    "WebSocket handshake timed out after {:?}",
                    self.connect_timeout
                ))
            })??;

        info!(user_id = %user_id, channel = %channel, "Live channel established");

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump(socket, tx, cancel.clone(), user_id.clone()));

        Ok(LiveSubscription::new(user_id.clone(), rx, cancel, Some(task)))
    }
}

/// Read frames until cancelled, closed by the server, or the receiver goes
/// away. Notifications are forwarded; pings are answered; everything else is
/// logged and dropped.
async fn pump(
    mut socket: Socket,
    events: mpsc::Sender<Notification>,
    cancel: CancellationToken,
    user_id: UserId,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                if let Err(e) = socket.close(None).await {
                    debug!(user_id = %user_id, error = %e, "Close handshake failed");
                }
                break;
            }
            frame = socket.next() => match frame {
                Some(Ok(Message::Text(text))) => match codec::decode(text.as_str()) {
                    Ok(ServerMessage::NewNotification { notification }) => {
                        trace!(user_id = %user_id, notification_id = %notification.id, "Live event");
                        if events.send(notification).await.is_err() {
                            break;
                        }
                    }
                    Ok(ServerMessage::Ping { timestamp }) => {
                        let pong = match codec::encode(&ClientMessage::Pong { timestamp }) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!(error = %e, "Failed to encode pong");
                                continue;
                            }
                        };
                        if let Err(e) = socket.send(pong).await {
                            warn!(user_id = %user_id, error = %e, "Pong send failed");
                            break;
                        }
                    }
                    Ok(ServerMessage::Subscribed { channel }) => {
                        debug!(user_id = %user_id, channel = %channel, "Subscription confirmed");
                    }
                    Ok(ServerMessage::Error { code, message }) => {
                        warn!(user_id = %user_id, code = %code, message = %message, "Live channel error");
                    }
                    Ok(ServerMessage::Unknown) => {
                        trace!(user_id = %user_id, "Ignoring unhandled message type");
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Malformed live message");
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    info!(user_id = %user_id, "Live channel closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(user_id = %user_id, error = %e, "Live channel error, giving up");
                    break;
                }
            }
        }
    }
}
