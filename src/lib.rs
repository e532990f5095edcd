//! Dietitian Chat
//!
//! A session client for the remote "AI Dietitian" service, with a terminal
//! chat front end.
//!
//! # Architecture
//!
//! - **API**: wire types, the [`api::DietitianApi`] seam and its `reqwest` client
//! - **Session**: session id, transcript and the start/send/clear lifecycle
//! - **UI**: line-oriented REPL that drives the session client
//!
//! # Modules
//!
//! - [`api`]: client-side contract of the remote service
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`error`]: transport errors and the user-facing failure type
//! - [`session`]: chat session lifecycle
//! - [`telemetry`]: tracing subscriber setup
//! - [`ui`]: terminal front end

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod ui;

pub use error::{Error, Operation, RemoteFailure};
pub use session::SessionClient;
