//! Photo provider seam.
//!
//! The search pipeline never talks HTTP itself; it calls a [`PhotoProvider`]
//! for two things only:
//! - one page of search results for `(query, page, page_size)`
//! - the download URL of a chosen photo
//!
//! Implementations:
//! - [`unsplash::UnsplashProvider`]: the Unsplash REST API over reqwest
//! - [`fixture::FixtureProvider`]: in-memory photos loaded from a JSON file

pub mod fixture;
pub mod unsplash;

use std::future::Future;

use thiserror::Error;

use crate::model::types::Photo;

pub use fixture::FixtureProvider;
pub use unsplash::UnsplashProvider;

/// Errors surfaced by a provider for a single request.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode provider response: {0}")]
    Decode(String),

    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("photo {0} has no download location")]
    MissingDownloadLocation(String),

    #[error("{0}")]
    Other(String),
}

/// Network-facing collaborator of the picker.
///
/// Futures must be `Send` so the runtime can spawn them on tokio.
pub trait PhotoProvider: Send + Sync + 'static {
    /// Display name used in provenance and credit lines (e.g. "Unsplash").
    fn name(&self) -> &str;

    /// Fetch one page (1-based) of results for `query`.
    fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Photo>, ProviderError>> + Send;

    /// Resolve the URL the host should download for `photo`.
    fn resolve_download_url(
        &self,
        photo: &Photo,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

/// Provider chosen at startup: the live API, or a fixture file.
#[derive(Debug)]
pub enum AnyProvider {
    Unsplash(UnsplashProvider),
    Fixture(FixtureProvider),
}

impl PhotoProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::Unsplash(p) => p.name(),
            Self::Fixture(p) => p.name(),
        }
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Photo>, ProviderError> {
        match self {
            Self::Unsplash(p) => p.search(query, page, page_size).await,
            Self::Fixture(p) => p.search(query, page, page_size).await,
        }
    }

    async fn resolve_download_url(&self, photo: &Photo) -> Result<String, ProviderError> {
        match self {
            Self::Unsplash(p) => p.resolve_download_url(photo).await,
            Self::Fixture(p) => p.resolve_download_url(photo).await,
        }
    }
}
