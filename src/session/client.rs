//! Session client: session id, transcript and the three remote operations.

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::transcript::{Message, Transcript};
use crate::api::{ChatRequest, ChatResponse, DietitianApi, InitSessionRequest};
use crate::error::{Error, Operation, RemoteFailure, Result};

/// A chat request that has been accepted locally but not yet answered.
///
/// Produced by [`SessionClient::begin_send`]; the user entry is already in
/// the transcript at this point.
#[derive(Debug, Clone)]
pub struct PendingSend {
    request: ChatRequest,
    generation: u64,
}

impl PendingSend {
    /// The request that will be sent.
    #[must_use]
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }

    /// Perform the network call. Owns everything it needs so it can be
    /// spawned onto a runtime.
    pub async fn submit(self, api: Arc<dyn DietitianApi>) -> SendOutcome {
        let result = api.chat(self.request).await;
        SendOutcome {
            generation: self.generation,
            result,
        }
    }

    /// Start the network call on the tokio runtime right away.
    ///
    /// The request makes progress whether or not the returned future is
    /// polled; awaiting it only collects the outcome.
    pub fn spawn(self, api: Arc<dyn DietitianApi>) -> BoxFuture<'static, SendOutcome> {
        let generation = self.generation;
        let handle = tokio::spawn(self.submit(api));
        async move {
            handle.await.unwrap_or_else(|e| SendOutcome {
                generation,
                result: Err(Error::Task(e.to_string())),
            })
        }
        .boxed()
    }
}

/// Result of a submitted [`PendingSend`], to be applied with
/// [`SessionClient::complete_send`].
#[derive(Debug)]
pub struct SendOutcome {
    generation: u64,
    result: Result<ChatResponse>,
}

/// Client-side state of one chat with the dietitian service.
///
/// Holds the active session id, the transcript, the input buffer, the
/// awaiting-response flag and the error display text. Every operation makes
/// at most one network attempt and never retries.
pub struct SessionClient {
    api: Arc<dyn DietitianApi>,
    session_id: Option<String>,
    transcript: Transcript,
    input: String,
    awaiting: bool,
    error: Option<String>,
    /// Bumped whenever the active session is replaced or dropped.
    generation: u64,
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("session_id", &self.session_id)
            .field("transcript", &self.transcript)
            .field("input", &self.input)
            .field("awaiting", &self.awaiting)
            .field("error", &self.error)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl SessionClient {
    /// Create a client with no active session.
    #[must_use]
    pub fn new(api: Arc<dyn DietitianApi>) -> Self {
        Self {
            api,
            session_id: None,
            transcript: Transcript::new(),
            input: String::new(),
            awaiting: false,
            error: None,
            generation: 0,
        }
    }

    /// The API this client talks to.
    #[must_use]
    pub fn api(&self) -> Arc<dyn DietitianApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session_id.is_some()
    }

    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a chat reply is outstanding.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Text for the error display area, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the send control should be enabled.
    ///
    /// This is the guard front ends use against overlapping sends;
    /// [`begin_send`](Self::begin_send) itself does not check `awaiting`.
    #[must_use]
    pub fn can_send(&self) -> bool {
        self.has_session() && !self.awaiting && !self.input.trim().is_empty()
    }

    /// Start a fresh session, replacing the current one if any.
    ///
    /// The identifier returned by the service becomes the active session and
    /// the transcript is emptied. On failure the previous session and
    /// transcript are left as they were.
    pub async fn start_session(&mut self) -> std::result::Result<(), RemoteFailure> {
        self.error = None;
        let requested = Uuid::new_v4().to_string();
        debug!(name: "session.start.requested", session_id = %requested, "Starting session");

        let result = self
            .api
            .init_session(InitSessionRequest {
                session_id: requested.clone(),
            })
            .await
            .and_then(|resp| {
                if resp.session_id.trim().is_empty() {
                    Err(Error::EmptySessionId)
                } else {
                    Ok(resp)
                }
            });

        match result {
            Ok(resp) => {
                if resp.session_id != requested {
                    warn!(
                        name: "session.start.id_replaced",
                        requested = %requested,
                        adopted = %resp.session_id,
                        "Service returned a different session id"
                    );
                }
                info!(name: "session.started", session_id = %resp.session_id, "Session started");
                self.session_id = Some(resp.session_id);
                self.reset_conversation();
                Ok(())
            }
            Err(e) => Err(self.fail(Operation::StartSession, e)),
        }
    }

    /// Accept the input buffer as a user message.
    ///
    /// Returns `None` without touching any state if no session is active or
    /// the input is blank. Otherwise appends the user entry, clears the
    /// input, marks the client as awaiting and hands back the request to
    /// submit.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        let session_id = self.session_id.clone()?;
        if self.input.trim().is_empty() {
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(message.clone()));
        self.awaiting = true;
        self.error = None;

        Some(PendingSend {
            request: ChatRequest {
                message,
                session_id,
            },
            generation: self.generation,
        })
    }

    /// Apply the outcome of a submitted request.
    ///
    /// Outcomes from a session that has since been reset or cleared are
    /// dropped silently. A failure keeps the optimistic user entry.
    pub fn complete_send(
        &mut self,
        outcome: SendOutcome,
    ) -> std::result::Result<(), RemoteFailure> {
        if outcome.generation != self.generation {
            debug!(
                name: "session.reply.discarded",
                generation = outcome.generation,
                current = self.generation,
                "Discarding reply for abandoned session"
            );
            return Ok(());
        }

        self.awaiting = false;
        match outcome.result {
            Ok(resp) => {
                self.transcript.push(Message::assistant(resp.response));
                Ok(())
            }
            Err(e) => Err(self.fail(Operation::SendMessage, e)),
        }
    }

    /// Send the input buffer and wait for the reply.
    pub async fn send_message(&mut self) -> std::result::Result<(), RemoteFailure> {
        let Some(pending) = self.begin_send() else {
            return Ok(());
        };
        let outcome = pending.submit(self.api()).await;
        self.complete_send(outcome)
    }

    /// Convenience for `set_input` followed by `send_message`.
    pub async fn send(
        &mut self,
        text: impl Into<String>,
    ) -> std::result::Result<(), RemoteFailure> {
        self.set_input(text);
        self.send_message().await
    }

    /// End the active session.
    ///
    /// Local state is cleared whether or not the service acknowledged the
    /// deletion; a failed deletion only sets the error text.
    pub async fn clear_session(&mut self) -> std::result::Result<(), RemoteFailure> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };
        self.error = None;

        let result = self.api.clear_session(&session_id).await;
        self.reset_conversation();

        match result {
            Ok(()) => {
                info!(name: "session.cleared", session_id = %session_id, "Session cleared");
                Ok(())
            }
            Err(e) => Err(self.fail(Operation::ClearSession, e)),
        }
    }

    fn reset_conversation(&mut self) {
        self.transcript.clear();
        self.awaiting = false;
        self.generation = self.generation.wrapping_add(1);
    }

    fn fail(&mut self, operation: Operation, source: Error) -> RemoteFailure {
        error!(
            name: "session.operation.failed",
            operation = %operation,
            error = %source,
            "Remote operation failed"
        );
        let failure = RemoteFailure::new(operation, source);
        self.error = Some(failure.to_string());
        failure
    }
}
