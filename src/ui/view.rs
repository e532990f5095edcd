//! Plain-text rendering of chat state for the terminal.

use console::style;

use crate::session::{Message, Role, SessionClient};

pub const EMPTY_TRANSCRIPT_HINT: &str = "Ask your first question to get started...";
pub const NO_SESSION_HINT: &str = "No active session. Type /start to begin.";
pub const SENDING_NOTICE: &str = "Sending... wait for the reply before sending again.";

/// Label of the session button: "Start Session" or "New Session".
#[must_use]
pub fn session_control_label(has_session: bool) -> &'static str {
    if has_session {
        "New Session"
    } else {
        "Start Session"
    }
}

/// Label of the send button.
#[must_use]
pub fn send_control_label(awaiting: bool) -> &'static str {
    if awaiting { "Sending..." } else { "Send" }
}

#[must_use]
pub fn banner() -> String {
    format!(
        "{}\n{}",
        style("Talk to Your AI Dietitian").bold(),
        "Start a dietitian chat session, ask questions, and get AI-powered nutrition advice."
    )
}

/// Commands available in the current state.
#[must_use]
pub fn help(client: &SessionClient) -> String {
    let mut lines = vec![format!(
        "  /start      {}",
        session_control_label(client.has_session())
    )];
    if client.has_session() {
        lines.push("  /clear      Clear Session".to_string());
        lines.push(format!(
            "  <text>      {}",
            send_control_label(client.is_awaiting())
        ));
    }
    lines.push("  /help       Show this help".to_string());
    lines.push("  /quit       Exit".to_string());
    lines.join("\n")
}

#[must_use]
pub fn message(message: &Message) -> String {
    let time = message.at.format("%H:%M");
    match message.role {
        Role::User => format!(
            "{} {} {}",
            style(time).dim(),
            style("you >").cyan().bold(),
            message.text
        ),
        Role::Assistant => format!(
            "{} {} {}",
            style(time).dim(),
            style("dietitian >").green().bold(),
            message.text
        ),
    }
}

#[must_use]
pub fn session_started(session_id: &str) -> String {
    format!("{} {}", style("Session started:").bold(), session_id)
}

#[must_use]
pub fn session_cleared() -> String {
    style("Session cleared.").bold().to_string()
}

#[must_use]
pub fn error(text: &str) -> String {
    style(text).red().bold().to_string()
}

#[must_use]
pub fn notice(text: &str) -> String {
    style(text).dim().to_string()
}
