//! JSON text-frame encoding for channel messages.

use tokio_tungstenite::tungstenite::Message;

use gymhub_core::error::AppError;

use super::types::{ClientMessage, ServerMessage};

/// Maximum accepted frame size in bytes.
const MAX_MESSAGE_SIZE: usize = 65_536;

/// Encode a client message as a text frame.
pub fn encode(msg: &ClientMessage) -> Result<Message, AppError> {
    let text = serde_json::to_string(msg)?;
    Ok(Message::text(text))
}

/// Decode a server text frame.
pub fn decode(raw: &str) -> Result<ServerMessage, AppError> {
    if raw.len() > MAX_MESSAGE_SIZE {
        return Err(AppError::validation(format!(
            "Message exceeds maximum size of {MAX_MESSAGE_SIZE} bytes"
        )));
    }
    if raw.trim().is_empty() {
        return Err(AppError::validation("Empty message"));
    }
    Ok(serde_json::from_str(raw)?)
}
