//! Client-side contract of the remote dietitian service.
//!
//! The service exposes three operations:
//!
//! | Operation          | Method & path                    |
//! |--------------------|----------------------------------|
//! | Initialize session | `POST /init-session`             |
//! | Send message       | `POST /chat`                     |
//! | Clear session      | `DELETE /clear-session/{id}`     |
//!
//! [`DietitianApi`] is the seam between the session client and the network;
//! [`Client`] is the HTTP implementation used by the binary.

pub mod client;
pub mod types;

pub use client::{Client, DEFAULT_BASE_URL};
pub use types::{ChatRequest, ChatResponse, InitSessionRequest, InitSessionResponse};

use async_trait::async_trait;

use crate::error::Result;

/// Remote dietitian service.
///
/// Each call performs exactly one attempt; implementations must not retry.
#[async_trait]
pub trait DietitianApi: Send + Sync {
    /// Register a client-generated session id with the service.
    async fn init_session(&self, req: InitSessionRequest) -> Result<InitSessionResponse>;

    /// Send a user message and wait for the assistant reply.
    async fn chat(&self, req: ChatRequest) -> Result<ChatResponse>;

    /// Ask the service to forget a session. The response body is ignored.
    async fn clear_session(&self, session_id: &str) -> Result<()>;
}
