use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::StockTicker;

/// Fetch lifecycle of the search controller.
///
/// Exactly one variant holds at a time, so "loading and errored" or "loading
/// the first page and loading more" cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum FetchState {
    #[default]
    Idle,
    LoadingFirstPage,
    LoadingMore,
    Error(String),
    /// The last page came back empty.
    Exhausted,
}

impl FetchState {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingFirstPage | Self::LoadingMore)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl Display for FetchState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::LoadingFirstPage => f.write_str("loading-first-page"),
            Self::LoadingMore => f.write_str("loading-more"),
            Self::Error(message) => write!(f, "error: {message}"),
            Self::Exhausted => f.write_str("complete-no-more"),
        }
    }
}

/// Point-in-time view of the controller, published after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    /// Latest text typed into the search box.
    pub query: String,
    /// Query the current results belong to.
    pub active_query: String,
    pub page: u32,
    pub results: Vec<StockTicker>,
    pub state: FetchState,
    /// A debounced search is armed and has not fired yet.
    pub debouncing: bool,
}

impl SearchSnapshot {
    /// False once pagination has stopped, either on an empty page or on a
    /// failed fetch.
    pub fn has_more(&self) -> bool {
        !matches!(self.state, FetchState::Exhausted | FetchState::Error(_))
    }

    /// Indicator text shown under the result list, if any.
    pub fn status_line(&self) -> Option<String> {
        match &self.state {
            FetchState::LoadingFirstPage | FetchState::LoadingMore => {
                Some(String::from("Loading..."))
            }
            FetchState::Error(message) => Some(format!("Error: {message}")),
            FetchState::Exhausted => Some(String::from("No more results")),
            FetchState::Idle => None,
        }
    }

    /// No fetch in flight and no debounced search armed.
    pub fn is_settled(&self) -> bool {
        !self.debouncing && !self.state.is_loading()
    }
}
