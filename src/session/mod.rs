//! Chat session lifecycle.
//!
//! The session client owns a single client-held session id and the ordered
//! transcript of messages exchanged under it. Nothing is persisted; a new
//! client starts with no session.
//!
//! # Architecture
//!
//! - [`SessionClient`]: start/reset, send and clear against a [`DietitianApi`]
//! - [`Transcript`]: append-only list of [`Message`]s for the active session
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use dietitian_chat::api::Client;
//! use dietitian_chat::session::SessionClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(Client::new("http://localhost:8080")?);
//! let mut chat = SessionClient::new(api);
//!
//! chat.start_session().await?;
//! chat.send("How much protein do I need?").await?;
//! for message in chat.transcript() {
//!     println!("{}: {}", message.role.as_str(), message.text);
//! }
//! chat.clear_session().await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`DietitianApi`]: crate::api::DietitianApi

mod client;
mod transcript;

pub use client::{PendingSend, SendOutcome, SessionClient};
pub use transcript::{Message, Role, Transcript};
