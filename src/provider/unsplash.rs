//! Unsplash REST API provider.
//!
//! - Empty query lists the editorial feed (`GET /photos`)
//! - Non-empty query searches (`GET /search/photos`)
//! - Downloads are resolved through the photo's `download_location`, which
//!   also registers the download with Unsplash as their API guidelines require

use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{PhotoProvider, ProviderError};
use crate::config::ProviderConfig;
use crate::model::types::Photo;

const PROVIDER_NAME: &str = "Unsplash";

/// Error bodies are truncated to this many bytes before being surfaced.
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    url: String,
}

#[derive(Debug, Clone)]
pub struct UnsplashProvider {
    client: Client,
    api_base: String,
    access_key: Option<String>,
    app_name: String,
}

impl UnsplashProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("photo-picker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        if config.access_key.is_none() {
            warn!("no PHOTO_PICKER_ACCESS_KEY configured; Unsplash will reject requests");
        }
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
            app_name: config.app_name.clone(),
        })
    }

    fn search_url(&self, query: &str, page: u32, page_size: u32) -> Result<Url, ProviderError> {
        let page = page.to_string();
        let per_page = page_size.to_string();
        let result = if query.trim().is_empty() {
            Url::parse_with_params(
                &format!("{}/photos", self.api_base),
                &[("page", page.as_str()), ("per_page", per_page.as_str())],
            )
        } else {
            Url::parse_with_params(
                &format!("{}/search/photos", self.api_base),
                &[
                    ("query", query.trim()),
                    ("page", page.as_str()),
                    ("per_page", per_page.as_str()),
                ],
            )
        };
        result.map_err(|e| ProviderError::InvalidUrl(e.to_string()))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Accept-Version", "v1");
        match &self.access_key {
            Some(key) => request.header("Authorization", format!("Client-ID {key}")),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let resp = self.authorized(self.client.get(url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let mut body = resp.text().await.unwrap_or_default();
            truncate_utf8(&mut body, MAX_ERROR_BODY);
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        resp.json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }

    /// Add Unsplash's referral parameters to attribution links.
    fn with_referral(&self, link: &str) -> String {
        match Url::parse(link) {
            Ok(mut url) => {
                url.query_pairs_mut()
                    .append_pair("utm_source", &self.app_name)
                    .append_pair("utm_medium", "referral");
                url.to_string()
            }
            Err(_) => link.to_string(),
        }
    }

    fn decorate(&self, mut photo: Photo) -> Photo {
        if !photo.links.html.is_empty() {
            photo.links.html = self.with_referral(&photo.links.html);
        }
        if !photo.user.links.html.is_empty() {
            photo.user.links.html = self.with_referral(&photo.user.links.html);
        }
        photo
    }
}

impl PhotoProvider for UnsplashProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Photo>, ProviderError> {
        let url = self.search_url(query, page, page_size)?;
        debug!(%url, "unsplash search");
        let photos = if query.trim().is_empty() {
            self.get_json::<Vec<Photo>>(url).await?
        } else {
            self.get_json::<SearchResponse>(url).await?.results
        };
        Ok(photos.into_iter().map(|p| self.decorate(p)).collect())
    }

    async fn resolve_download_url(&self, photo: &Photo) -> Result<String, ProviderError> {
        if photo.links.download_location.is_empty() {
            return Err(ProviderError::MissingDownloadLocation(photo.id.to_string()));
        }
        let url = Url::parse(&photo.links.download_location)
            .map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
        let resp: DownloadResponse = self.get_json(url).await?;
        Ok(resp.url)
    }
}

fn truncate_utf8(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> UnsplashProvider {
        UnsplashProvider::new(&ProviderConfig {
            api_base: "https://api.example.test/".into(),
            access_key: Some("key".into()),
            app_name: "demo app".into(),
            ..ProviderConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn empty_query_lists_feed() {
        let url = provider().search_url("  ", 3, 42).unwrap();
        assert_eq!(url.path(), "/photos");
        assert_eq!(url.query(), Some("page=3&per_page=42"));
    }

    #[test]
    fn query_is_encoded_into_search_endpoint() {
        let url = provider().search_url("red cats", 1, 42).unwrap();
        assert_eq!(url.path(), "/search/photos");
        assert_eq!(url.query(), Some("query=red+cats&page=1&per_page=42"));
    }

    #[test]
    fn referral_params_are_appended() {
        let link = provider().with_referral("https://unsplash.com/photos/abc");
        assert_eq!(
            link,
            "https://unsplash.com/photos/abc?utm_source=demo+app&utm_medium=referral"
        );
        assert_eq!(provider().with_referral("not a url"), "not a url");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let mut s = "héllo".to_string();
        truncate_utf8(&mut s, 2);
        assert_eq!(s, "h");
    }
}
