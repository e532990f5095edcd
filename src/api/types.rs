//! Wire types for the dietitian service.

use serde::{Deserialize, Serialize};

/// Body of `POST /init-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSessionRequest {
    /// Client-generated session identifier.
    pub session_id: String,
}

/// Response of `POST /init-session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitSessionResponse {
    /// Identifier the service will track the session under.
    pub session_id: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message, as typed.
    pub message: String,
    /// Active session identifier.
    pub session_id: String,
}

/// Response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant reply text.
    pub response: String,
}
