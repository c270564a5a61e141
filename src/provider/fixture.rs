//! In-memory provider backed by a JSON file of photos.
//!
//! Accepts either a bare array of photos or `{"photos": [...]}`. Search is a
//! case-insensitive substring match over caption and author; an empty query
//! matches everything. Downloads resolve to the photo's full-size URL.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::{PhotoProvider, ProviderError};
use crate::model::types::Photo;

#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Bare(Vec<Photo>),
    Wrapped { photos: Vec<Photo> },
}

#[derive(Debug, Clone)]
pub struct FixtureProvider {
    name: String,
    photos: Vec<Photo>,
}

impl FixtureProvider {
    pub fn new(name: impl Into<String>, photos: Vec<Photo>) -> Self {
        Self {
            name: name.into(),
            photos,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let photos = match serde_json::from_str::<FixtureFile>(&body)
            .with_context(|| format!("parsing fixture {}", path.display()))?
        {
            FixtureFile::Bare(photos) | FixtureFile::Wrapped { photos } => photos,
        };
        tracing::debug!(count = photos.len(), path = %path.display(), "loaded fixture");
        Ok(Self::new("Fixture", photos))
    }

    fn matches(photo: &Photo, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let hay = [
            photo.description.as_deref(),
            photo.alt_description.as_deref(),
            Some(photo.user.name.as_str()),
            Some(photo.user.username.as_str()),
        ];
        hay.iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl PhotoProvider for FixtureProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Photo>, ProviderError> {
        if page == 0 {
            return Err(ProviderError::Other("pages are 1-based".into()));
        }
        let needle = query.trim().to_lowercase();
        let skip = (page as usize - 1) * page_size as usize;
        Ok(self
            .photos
            .iter()
            .filter(|p| Self::matches(p, &needle))
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect())
    }

    async fn resolve_download_url(&self, photo: &Photo) -> Result<String, ProviderError> {
        if photo.urls.full.is_empty() {
            return Err(ProviderError::MissingDownloadLocation(photo.id.to_string()));
        }
        Ok(photo.urls.full.clone())
    }
}
