mod mock;
mod polygon;
mod profile;

pub use mock::{MockLogoSource, MockReferenceSource};
pub use polygon::PolygonReferenceAdapter;
pub use profile::ProfileLogoAdapter;

use crate::data_source::SourceError;
use crate::http_client::HttpResponse;

/// Maps a non-2xx response to a source error, preferring the upstream's own
/// `error`/`message` text when the body carries one.
pub(crate) fn status_error(provider: &str, response: &HttpResponse) -> SourceError {
    let upstream = serde_json::from_str::<serde_json::Value>(&response.body)
        .ok()
        .and_then(|body| {
            ["error", "message", "Error Message"]
                .iter()
                .find_map(|field| body.get(*field).and_then(|v| v.as_str()).map(str::to_owned))
        });

    let message = match upstream {
        Some(detail) => format!(
            "{provider} returned status {}: {detail}",
            response.status
        ),
        None => format!("{provider} returned status {}", response.status),
    };

    if response.status == 429 {
        SourceError::rate_limited(message)
    } else if (400..500).contains(&response.status) {
        SourceError::invalid_request(message)
    } else {
        SourceError::unavailable(message)
    }
}
