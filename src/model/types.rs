//! Normalized photo and asset structs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable provider-assigned photo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoId(pub String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A photo as returned by the provider. Read-only to the picker apart from its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub alt_description: Option<String>,
    /// Dominant color as a hex string (e.g. `#0c2633`).
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub urls: PhotoUrls,
    #[serde(default)]
    pub links: PhotoLinks,
    pub user: PhotoAuthor,
}

impl Photo {
    /// Human-readable caption: description, falling back to alt text.
    pub fn caption(&self) -> Option<&str> {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoUrls {
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub full: String,
    #[serde(default)]
    pub regular: String,
    #[serde(default)]
    pub small: String,
    #[serde(default)]
    pub thumb: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoLinks {
    /// Public permalink of the photo page.
    #[serde(default)]
    pub html: String,
    /// Endpoint that must be hit to obtain (and register) a download.
    #[serde(default)]
    pub download_location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoAuthor {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub links: AuthorLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorLinks {
    #[serde(default)]
    pub html: String,
}

/// Where an asset came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetProvenance {
    pub provider: String,
    pub photo_id: PhotoId,
    pub permalink: String,
}

/// Application-level record handed to the host once a photo is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub provenance: AssetProvenance,
    pub description: Option<String>,
    pub credit: String,
}
