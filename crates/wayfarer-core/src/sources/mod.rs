pub mod sample;

pub use sample::SampleCatalog;

use time::OffsetDateTime;

use crate::models::{CoreError, Destination};

/// A search as issued by the planner. The timestamp is carried so sources
/// that cache or log can attribute results to the originating submission.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub issued_at: OffsetDateTime,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            issued_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Boundary to whatever produces destination records. The contract is the
/// record shape only; a real search API and the bundled sample catalog are
/// interchangeable behind it.
pub trait DestinationSource: Send + Sync {
    fn search(&self, query: &SearchQuery) -> Result<Vec<Destination>, CoreError>;
}
