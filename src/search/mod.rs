//! Search pipeline: query/page combiner, page accumulator, pagination,
//! and the keyboard cursor, plus the session that owns them.

pub mod accumulator;
pub mod combiner;
pub mod cursor;
pub mod pagination;
pub mod session;

use thiserror::Error;

use crate::model::types::PhotoId;
use crate::provider::ProviderError;

pub use accumulator::{PageOutcome, ResultAccumulator};
pub use combiner::{FetchRequest, QueryPageCombiner};
pub use cursor::{Arrow, Cursor, NavDirection};
pub use pagination::{PaginationDriver, ScrollTrigger, threshold_reached};
pub use session::{PAGE_SIZE, PageResponse, PhotoSearch, PickerView};

/// Failures the picker reports to its host.
#[derive(Error, Debug)]
pub enum PickerError {
    #[error("search for {query:?} page {page} failed: {source}")]
    SearchFetch {
        query: String,
        page: u32,
        #[source]
        source: ProviderError,
    },

    #[error("could not resolve download for photo {photo_id}: {source}")]
    DownloadResolution {
        photo_id: PhotoId,
        #[source]
        source: ProviderError,
    },
}
