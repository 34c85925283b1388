//! # Station Commands
//!
//! Every line the operator types (or the scanner sends) is one command.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (parsing, responses, dispatch)
//! ├── picking.rs    ◄─── scan, next, prev, bin, filter, confirm, status, abort, quit
//! └── favorites.rs  ◄─── fav, favs
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Station Command Flow                                 │
//! │                                                                         │
//! │  stdin: "scan A-01-03"                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command::parse() ──► Command::Scan("A-01-03")                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  execute(&Station, command)                                             │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  picking::scan(&SessionState, &AutoAdvanceTimer, code)                  │
//! │  -> Result<Response, ApiError>                                          │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: {"type":"scan","outcome":{...},"snapshot":{...}}               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod favorites;
pub mod picking;

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use pickflow_core::{Advance, GateTransition, ScanOutcome, SessionOutcome, SessionSnapshot};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::{PreferencesState, SessionState};
use crate::timer::AutoAdvanceTimer;

// =============================================================================
// Commands
// =============================================================================

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `scan <code>`, or an empty line for an unverified pick.
    Scan(String),
    Next,
    Prev,
    SwitchBin,
    Filter(String),
    Confirm(String),
    Status,
    /// Toggle a favorite; the current article when no key is given.
    Favorite(Option<String>),
    Favorites,
    Abort,
    Quit,
}

impl Command {
    /// Parses one input line. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Result<Command, ApiError> {
        let line = line.trim();
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        let command = match keyword.to_lowercase().as_str() {
            "" => Command::Scan(String::new()),
            "scan" | "s" => Command::Scan(rest.to_string()),
            "next" | "n" => Command::Next,
            "prev" | "p" | "back" => Command::Prev,
            "bin" | "b" => Command::SwitchBin,
            "filter" | "f" => Command::Filter(required(rest, "filter")?),
            "confirm" | "c" => Command::Confirm(required(rest, "confirm")?),
            "status" => Command::Status,
            "fav" => Command::Favorite((!rest.is_empty()).then(|| rest.to_string())),
            "favs" => Command::Favorites,
            "abort" => Command::Abort,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(ApiError::unknown_command(line)),
        };

        Ok(command)
    }
}

fn required(argument: &str, command: &str) -> Result<String, ApiError> {
    if argument.is_empty() {
        return Err(ApiError::validation(format!(
            "{} needs an argument",
            command
        )));
    }
    Ok(argument.to_string())
}

// =============================================================================
// Responses
// =============================================================================

/// One line of output, serialised as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Scan {
        outcome: ScanOutcome,
        snapshot: SessionSnapshot,
    },
    Advanced {
        advance: Advance,
        /// Fired by the auto-advance timer rather than `next`.
        automatic: bool,
        snapshot: SessionSnapshot,
    },
    Snapshot {
        snapshot: SessionSnapshot,
    },
    Storage {
        transition: GateTransition,
        snapshot: SessionSnapshot,
    },
    Favorite {
        key: String,
        favorite: bool,
    },
    Favorites {
        keys: Vec<String>,
    },
    Ended {
        outcome: SessionOutcome,
    },
    Error {
        #[serde(flatten)]
        error: ApiError,
    },
}

impl From<ApiError> for Response {
    fn from(error: ApiError) -> Self {
        Response::Error { error }
    }
}

// =============================================================================
// Dispatch
// =============================================================================

/// Source of the current calendar day.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// The station's local calendar day.
pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().date_naive())
}

/// Everything a command may touch.
#[derive(Clone)]
pub struct Station {
    pub session: SessionState,
    pub preferences: PreferencesState,
    pub timer: AutoAdvanceTimer,
    /// Read on every filter change, so `past` follows the calendar past midnight.
    pub clock: Clock,
}

/// Runs one command against the station.
pub fn execute(station: &Station, command: Command) -> Result<Response, ApiError> {
    match command {
        Command::Scan(code) => picking::scan(&station.session, &station.timer, &code),
        Command::Next => picking::next(&station.session),
        Command::Prev => picking::prev(&station.session),
        Command::SwitchBin => picking::switch_bin(&station.session),
        Command::Filter(value) => {
            picking::set_filter(&station.session, &value, (station.clock)())
        }
        Command::Confirm(slot) => picking::confirm_storage(&station.session, &slot),
        Command::Status => Ok(picking::status(&station.session)),
        Command::Favorite(key) => {
            favorites::toggle(&station.session, &station.preferences, key.as_deref())
        }
        Command::Favorites => favorites::list(&station.preferences),
        Command::Abort => picking::abort(&station.session),
        Command::Quit => picking::quit(&station.session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("scan A-01-03").unwrap(),
            Command::Scan("A-01-03".into())
        );
        assert_eq!(Command::parse("").unwrap(), Command::Scan(String::new()));
        assert_eq!(Command::parse("   ").unwrap(), Command::Scan(String::new()));
        assert_eq!(Command::parse("scan").unwrap(), Command::Scan(String::new()));
        assert_eq!(Command::parse("NEXT").unwrap(), Command::Next);
        assert_eq!(Command::parse("bin").unwrap(), Command::SwitchBin);
        assert_eq!(
            Command::parse("filter 2026-03-02").unwrap(),
            Command::Filter("2026-03-02".into())
        );
        assert_eq!(
            Command::parse("confirm  WA-12 ").unwrap(),
            Command::Confirm("WA-12".into())
        );
        assert_eq!(Command::parse("fav").unwrap(), Command::Favorite(None));
        assert_eq!(
            Command::parse("fav ART-100").unwrap(),
            Command::Favorite(Some("ART-100".into()))
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            Command::parse("jump 3").unwrap_err().code,
            ErrorCode::UnknownCommand
        );
        assert_eq!(
            Command::parse("confirm").unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_error_response_is_flat() {
        let response = Response::from(ApiError::unknown_command("jump"));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "UNKNOWN_COMMAND");
    }
}
