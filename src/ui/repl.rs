//! Line-oriented chat loop.
//!
//! Reads commands and messages from an async line source and writes the
//! transcript to a blocking writer. Chat requests run as spawned tokio tasks;
//! their outcomes are collected alongside stdin, so `/start`, `/clear` and
//! `/quit` stay usable while waiting.

use std::io::{self, Write};

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

use super::view;
use crate::session::{Role, SendOutcome, SessionClient};

/// A parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Clear,
    Help,
    Quit,
    Unknown(String),
    Text(String),
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Self::Text(line.to_string());
        }
        match trimmed {
            "/start" | "/new" => Self::Start,
            "/clear" => Self::Clear,
            "/help" | "/?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

enum Event {
    Line(Option<String>),
    Reply(SendOutcome),
}

/// Terminal front end over a [`SessionClient`].
pub struct Repl<W> {
    client: SessionClient,
    out: W,
    in_flight: FuturesUnordered<BoxFuture<'static, SendOutcome>>,
}

impl<W> std::fmt::Debug for Repl<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repl")
            .field("client", &self.client)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}

impl<W: Write> Repl<W> {
    pub fn new(client: SessionClient, out: W) -> Self {
        Self {
            client,
            out,
            in_flight: FuturesUnordered::new(),
        }
    }

    #[must_use]
    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    /// Number of chat requests whose replies have not been applied yet.
    #[must_use]
    pub fn pending_replies(&self) -> usize {
        self.in_flight.len()
    }

    /// Consume the loop and hand back the writer.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `/quit` or end of input.
    pub async fn run<R>(&mut self, input: R) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines: Lines<R> = input.lines();
        writeln!(self.out, "{}\n", view::banner())?;
        writeln!(self.out, "{}", view::help(&self.client))?;

        loop {
            let event = if self.in_flight.is_empty() {
                Event::Line(lines.next_line().await?)
            } else {
                tokio::select! {
                    Some(outcome) = self.in_flight.next() => Event::Reply(outcome),
                    line = lines.next_line() => Event::Line(line?),
                }
            };

            match event {
                Event::Reply(outcome) => self.handle_reply(outcome)?,
                Event::Line(None) => break,
                Event::Line(Some(line)) => {
                    if self.handle_line(&line).await? == Flow::Exit {
                        break;
                    }
                }
            }
        }

        if !self.in_flight.is_empty() {
            debug!(
                name: "repl.exit.abandoned",
                pending = self.in_flight.len(),
                "Exiting with replies outstanding"
            );
        }
        self.out.flush()
    }

    /// Apply one line of user input.
    pub async fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        match Command::parse(line) {
            Command::Quit => return Ok(Flow::Exit),
            Command::Help => writeln!(self.out, "{}", view::help(&self.client))?,
            Command::Unknown(cmd) => {
                let notice = format!("Unknown command {cmd}. Type /help.");
                writeln!(self.out, "{}", view::notice(&notice))?;
            }
            Command::Start => match self.client.start_session().await {
                Ok(()) => {
                    let id = self.client.session_id().unwrap_or_default();
                    writeln!(self.out, "{}", view::session_started(id))?;
                    writeln!(self.out, "{}", view::notice(view::EMPTY_TRANSCRIPT_HINT))?;
                }
                Err(failure) => writeln!(self.out, "{}", view::error(&failure.to_string()))?,
            },
            Command::Clear => {
                if !self.client.has_session() {
                    writeln!(self.out, "{}", view::notice(view::NO_SESSION_HINT))?;
                    return Ok(Flow::Continue);
                }
                match self.client.clear_session().await {
                    Ok(()) => writeln!(self.out, "{}", view::session_cleared())?,
                    Err(failure) => {
                        writeln!(self.out, "{}", view::error(&failure.to_string()))?;
                        writeln!(self.out, "{}", view::session_cleared())?;
                    }
                }
            }
            Command::Text(text) => self.submit_text(text)?,
        }
        Ok(Flow::Continue)
    }

    fn submit_text(&mut self, text: String) -> io::Result<()> {
        if self.client.is_awaiting() {
            // Send is disabled; the text stays in the input buffer.
            self.client.set_input(text);
            writeln!(self.out, "{}", view::notice(view::SENDING_NOTICE))?;
            return Ok(());
        }
        if !self.client.has_session() {
            writeln!(self.out, "{}", view::notice(view::NO_SESSION_HINT))?;
            return Ok(());
        }

        self.client.set_input(text);
        if let Some(pending) = self.client.begin_send() {
            let api = self.client.api();
            self.in_flight.push(pending.spawn(api));
            writeln!(
                self.out,
                "{}",
                view::notice(view::send_control_label(self.client.is_awaiting()))
            )?;
        }
        Ok(())
    }

    /// Wait for the next outstanding reply, if any.
    pub async fn next_reply(&mut self) -> Option<SendOutcome> {
        self.in_flight.next().await
    }

    /// Apply a finished chat request and print its result.
    pub fn handle_reply(&mut self, outcome: SendOutcome) -> io::Result<()> {
        let before = self.client.transcript().len();
        match self.client.complete_send(outcome) {
            Ok(()) => {
                let transcript = self.client.transcript();
                if transcript.len() > before {
                    if let Some(reply) = transcript.last().filter(|m| m.role == Role::Assistant) {
                        writeln!(self.out, "{}", view::message(reply))?;
                    }
                }
            }
            Err(failure) => writeln!(self.out, "{}", view::error(&failure.to_string()))?,
        }
        Ok(())
    }
}
