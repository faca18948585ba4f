//! User-invocable commands
//!
//! Every command reports failure through `CommandResult` instead of
//! propagating it, so a failed login never takes the shell down.
use serde::{Deserialize, Serialize};
use tas_core::{ControllerState, CoreError, Session};

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    Toggle,
    Status,
    Sessions(Vec<String>),
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `None` for blank lines
    pub fn parse(input: &str) -> Option<std::result::Result<Self, String>> {
        let mut parts = input.split_whitespace();
        let name = parts.next()?.to_lowercase();

        let command = match name.as_str() {
            "login" | "tas.login" => Command::Login,
            "logout" | "tas.logout" => Command::Logout,
            "toggle" | "tas.login-or-logout" => Command::Toggle,
            "status" => Command::Status,
            "sessions" | "ls" => Command::Sessions(parts.map(str::to_string).collect()),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Some(Err(format!("Unknown command: {other}"))),
        };

        Some(Ok(command))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub account_id: String,
    pub account_label: String,
    pub scopes: Vec<String>,
    pub is_current: bool,
}

impl SessionInfo {
    fn from_session(session: Session, is_current: bool) -> Self {
        Self {
            id: session.id,
            account_id: session.account.id,
            account_label: session.account.label,
            scopes: session.scopes.into_iter().collect(),
            is_current,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusInfo {
    pub logged_in: bool,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    fn from_error(command: &str, e: CoreError) -> Self {
        tracing::error!(command, kind = ?e.kind(), error = %e, "Command failed");
        Self::err(e.to_string())
    }
}

pub async fn login(state: &AppState) -> CommandResult<SessionInfo> {
    match state.context().login().await {
        Ok(session) => CommandResult::ok(SessionInfo::from_session(session, true)),
        Err(e) => CommandResult::from_error("login", e),
    }
}

pub async fn logout(state: &AppState) -> CommandResult<SessionInfo> {
    match state.context().logout().await {
        Ok(session) => CommandResult::ok(SessionInfo::from_session(session, false)),
        Err(e) => CommandResult::from_error("logout", e),
    }
}

pub async fn toggle(state: &AppState) -> CommandResult<StatusInfo> {
    match state.context().toggle().await {
        Ok(new_state) => CommandResult::ok(StatusInfo {
            logged_in: new_state.is_logged_in(),
            text: state.context().status().text(),
        }),
        Err(e) => CommandResult::from_error("toggle", e),
    }
}

pub async fn status(state: &AppState) -> CommandResult<StatusInfo> {
    let view = state.context().refresh_status().await;
    CommandResult::ok(StatusInfo {
        logged_in: view != tas_core::StatusView::LoggedOut,
        text: view.text(&state.context().config().provider_label),
    })
}

pub async fn sessions(state: &AppState, scopes: &[String]) -> CommandResult<Vec<SessionInfo>> {
    let current = match state.context().controller().state().await {
        ControllerState::LoggedIn(id) => Some(id),
        ControllerState::LoggedOut => None,
    };

    let sessions = state.context().provider().get_sessions(scopes).await;
    CommandResult::ok(
        sessions
            .into_iter()
            .map(|s| {
                let is_current = current.as_deref() == Some(s.id.as_str());
                SessionInfo::from_session(s, is_current)
            })
            .collect(),
    )
}

/// Run one parsed command and render its result as a JSON line
pub async fn dispatch(state: &AppState, command: &Command) -> serde_json::Result<String> {
    match command {
        Command::Login => serde_json::to_string(&login(state).await),
        Command::Logout => serde_json::to_string(&logout(state).await),
        Command::Toggle => serde_json::to_string(&toggle(state).await),
        Command::Status => serde_json::to_string(&status(state).await),
        Command::Sessions(scopes) => serde_json::to_string(&sessions(state, scopes).await),
        Command::Help => serde_json::to_string(&CommandResult::ok(HELP)),
        Command::Quit => serde_json::to_string(&CommandResult::ok("bye")),
    }
}

const HELP: &str = "login | logout | toggle | status | sessions [scope...] | quit";
