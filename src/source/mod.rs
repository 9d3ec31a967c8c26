pub mod live;
pub mod mock;

use thiserror::Error;

use crate::model::PromotionRecord;

pub use live::{LiveOptions, LiveSource};
pub use mock::MockSource;

// what the caller knew about the page at the moment it asked for data
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FetchContext {
    pub viewport_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Decode,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {endpoint} failed: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error from {endpoint}: status {status}")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("failed to decode inventory response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientBuild { .. }
            | Self::ProxySetup { .. }
            | Self::Network { .. }
            | Self::HttpStatus { .. } => ErrorKind::Network,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }
}

/// Produces the full, unordered set of promotion records for one session.
pub trait DataSource {
    async fn fetch_all(&self, ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError>;
}

#[derive(Clone, Debug)]
pub enum Source {
    Mock(MockSource),
    Live(LiveSource),
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mock(_) => "mock",
            Self::Live(_) => "live",
        }
    }
}

impl DataSource for Source {
    async fn fetch_all(&self, ctx: &FetchContext) -> Result<Vec<PromotionRecord>, SourceError> {
        match self {
            Self::Mock(source) => source.fetch_all(ctx).await,
            Self::Live(source) => source.fetch_all(ctx).await,
        }
    }
}
