//! Source traits and request/response types.
//!
//! Two collaborators feed the search controller:
//!
//! | Trait | Request | Response | Description |
//! |-------|---------|----------|-------------|
//! | [`ReferenceSource`] | [`TickerSearchRequest`] | [`TickerPage`] | Paginated ticker search |
//! | [`LogoSource`] | [`Symbol`] | `String` | Logo URL for one ticker |
//!
//! Both return boxed futures so implementations can be stored as
//! `Arc<dyn ...>` and shared with spawned fetch tasks.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{PageNumber, StockTicker, Symbol};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-2xx status.
    Unavailable,
    RateLimited,
    InvalidRequest,
    /// Body could not be decoded.
    Malformed,
    Internal,
}

/// Structured source error.
///
/// `message()` carries the human-readable failure text that the front-end
/// shows after `Error: `.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Malformed,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Malformed => "source.malformed",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for one page of a reference search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerSearchRequest {
    pub query: String,
    pub page: PageNumber,
}

impl TickerSearchRequest {
    pub fn new(query: impl Into<String>, page: PageNumber) -> Result<Self, SourceError> {
        let query = query.into();
        if query.is_empty() {
            return Err(SourceError::invalid_request(
                "search query must not be empty",
            ));
        }
        Ok(Self { query, page })
    }
}

/// One page of reference results, in the order the API returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerPage {
    pub results: Vec<StockTicker>,
}

impl TickerPage {
    pub fn new(results: Vec<StockTicker>) -> Self {
        Self { results }
    }

    /// An empty page marks the end of pagination.
    pub fn has_more(&self) -> bool {
        !self.results.is_empty()
    }
}

/// Paginated ticker reference search.
pub trait ReferenceSource: Send + Sync {
    /// Fetches one page of tickers matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-2xx status, or a body
    /// that is not valid JSON. A body without `results` is an empty page, not
    /// an error.
    fn search<'a>(
        &'a self,
        req: TickerSearchRequest,
    ) -> Pin<Box<dyn Future<Output = Result<TickerPage, SourceError>> + Send + 'a>>;
}

/// Per-ticker logo lookup.
pub trait LogoSource: Send + Sync {
    /// Returns the logo URL, or an empty string when the profile has none.
    fn logo<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_empty_query_is_rejected() {
        let error = TickerSearchRequest::new("", PageNumber::FIRST).expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(!error.retryable());

        let spaces = TickerSearchRequest::new("  ", PageNumber::FIRST).expect("spaces are a query");
        assert_eq!(spaces.query, "  ");
    }

    #[test]
    fn display_includes_code_but_message_is_bare() {
        let error = SourceError::unavailable("Network Error");
        assert_eq!(error.message(), "Network Error");
        assert_eq!(error.to_string(), "Network Error (source.unavailable)");
    }

    #[test]
    fn empty_page_has_no_more() {
        assert!(!TickerPage::default().has_more());
        assert!(TickerPage::new(vec![StockTicker::new("A", "Agilent")]).has_more());
    }
}
