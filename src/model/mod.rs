//! Data model shared by the search pipeline, providers and front-ends.

pub mod types;

pub use types::{Asset, AssetProvenance, AuthorLinks, Photo, PhotoAuthor, PhotoId, PhotoLinks, PhotoUrls};
