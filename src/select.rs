//! Turns a chosen photo into an [`Asset`] for the host.
//!
//! While a resolution is in flight the resolver's loading flag is raised.
//! The flag lives behind an `Arc` so the runtime can read it while the
//! resolving future runs on another task, and it is cleared by a drop guard:
//! success, failure and an aborted task all release it.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::model::types::{Asset, AssetProvenance, Photo};
use crate::provider::PhotoProvider;
use crate::search::PickerError;

#[derive(Debug, Clone, Default)]
pub struct SelectionResolver {
    loading: Arc<AtomicBool>,
}

struct LoadingGuard(Arc<AtomicBool>);

impl LoadingGuard {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SelectionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_resolving(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Resolve `photo` through `provider`. The loading flag is raised when
    /// this is called, not when the future is first polled.
    pub fn select<'a, P: PhotoProvider>(
        &self,
        provider: &'a P,
        photo: &'a Photo,
    ) -> impl Future<Output = Result<Asset, PickerError>> + Send + use<'a, P> {
        let guard = LoadingGuard::raise(&self.loading);
        async move {
            let _guard = guard;
            resolve(provider, photo).await
        }
    }

    /// Owned variant of [`select`](Self::select) for spawning onto a task.
    pub fn select_owned<P: PhotoProvider>(
        &self,
        provider: Arc<P>,
        photo: Photo,
    ) -> impl Future<Output = Result<Asset, PickerError>> + Send + use<P> {
        let guard = LoadingGuard::raise(&self.loading);
        async move {
            let _guard = guard;
            resolve(provider.as_ref(), &photo).await
        }
    }
}

async fn resolve<P: PhotoProvider>(provider: &P, photo: &Photo) -> Result<Asset, PickerError> {
    match provider.resolve_download_url(photo).await {
        Ok(url) => {
            info!(photo_id = %photo.id, provider = provider.name(), "download_resolved");
            Ok(build_asset(provider.name(), photo, url))
        }
        Err(source) => {
            warn!(photo_id = %photo.id, error = %source, "download_failed");
            Err(PickerError::DownloadResolution {
                photo_id: photo.id.clone(),
                source,
            })
        }
    }
}

pub fn build_asset(provider: &str, photo: &Photo, url: String) -> Asset {
    Asset {
        url,
        width: photo.width,
        height: photo.height,
        provenance: AssetProvenance {
            provider: provider.to_string(),
            photo_id: photo.id.clone(),
            permalink: photo.links.html.clone(),
        },
        description: photo.caption().map(str::to_string),
        credit: credit_line(&photo.user.name, provider),
    }
}

pub fn credit_line(author: &str, provider: &str) -> String {
    format!("Photo by {author} on {provider}")
}
