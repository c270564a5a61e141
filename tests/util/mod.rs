#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use photo_picker::model::types::{Asset, Photo, PhotoAuthor, PhotoId, PhotoLinks, PhotoUrls};
use photo_picker::provider::{PhotoProvider, ProviderError};
use photo_picker::runtime::PickerHost;
use photo_picker::search::PickerError;
use tokio::sync::oneshot;

type PageResult = Result<Vec<Photo>, ProviderError>;

/// Provider whose search calls block until the test completes them.
///
/// Each `search(query, page)` parks a oneshot keyed by `(query, page)`;
/// [`ScriptedProvider::complete`] releases it with whatever result the test
/// wants, in whatever order it wants.
#[derive(Default)]
pub struct ScriptedProvider {
    calls: Mutex<Vec<(String, u32)>>,
    pending: Mutex<HashMap<(String, u32), oneshot::Sender<PageResult>>>,
    downloads: Mutex<HashMap<PhotoId, Result<String, String>>>,
    download_delay: Mutex<Duration>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every search call so far, in call order.
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    /// Wait (bounded) until `search(query, page)` has been called and is parked.
    pub async fn wait_for(&self, query: &str, page: u32) {
        let key = (query.to_string(), page);
        for _ in 0..200 {
            if self.pending.lock().unwrap().contains_key(&key) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("search({query:?}, {page}) was never issued; calls: {:?}", self.calls());
    }

    pub async fn complete(&self, query: &str, page: u32, result: PageResult) {
        self.wait_for(query, page).await;
        let tx = self
            .pending
            .lock()
            .unwrap()
            .remove(&(query.to_string(), page))
            .expect("parked search");
        let _ = tx.send(result);
    }

    pub fn set_download(&self, id: &str, result: Result<&str, &str>) {
        self.downloads.lock().unwrap().insert(
            PhotoId::new(id),
            result.map(str::to_string).map_err(str::to_string),
        );
    }

    pub fn set_download_delay(&self, delay: Duration) {
        *self.download_delay.lock().unwrap() = delay;
    }
}

impl PhotoProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn search(&self, query: &str, page: u32, _page_size: u32) -> PageResult {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push((query.to_string(), page));
        self.pending
            .lock()
            .unwrap()
            .insert((query.to_string(), page), tx);
        rx.await
            .unwrap_or_else(|_| Err(ProviderError::Other("scripted search dropped".into())))
    }

    async fn resolve_download_url(&self, photo: &Photo) -> Result<String, ProviderError> {
        let delay = *self.download_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.downloads.lock().unwrap().get(&photo.id).cloned();
        match outcome {
            Some(Ok(url)) => Ok(url),
            Some(Err(msg)) => Err(ProviderError::Status {
                status: 404,
                body: msg,
            }),
            None => Err(ProviderError::MissingDownloadLocation(photo.id.to_string())),
        }
    }
}

/// Host that records every callback.
#[derive(Default, Debug)]
pub struct RecordingHost {
    pub selected: Vec<Vec<Asset>>,
    pub errors: Vec<String>,
    pub closed: usize,
}

impl PickerHost for RecordingHost {
    fn on_select(&mut self, assets: Vec<Asset>) {
        self.selected.push(assets);
    }

    fn on_close(&mut self) {
        self.closed += 1;
    }

    fn on_error(&mut self, error: &PickerError) {
        self.errors.push(error.to_string());
    }
}

#[allow(dead_code)]
pub fn photo(id: &str) -> Photo {
    Photo {
        id: PhotoId::new(id),
        width: 3000,
        height: 2000,
        description: Some(format!("photo {id}")),
        alt_description: None,
        color: Some("#336699".into()),
        urls: PhotoUrls {
            full: format!("https://img.test/{id}/full.jpg"),
            ..Default::default()
        },
        links: PhotoLinks {
            html: format!("https://photos.test/{id}"),
            download_location: format!("https://api.test/photos/{id}/download"),
        },
        user: PhotoAuthor {
            name: "Test Author".into(),
            username: "tester".into(),
            links: Default::default(),
        },
    }
}

/// `n` photos with ids `{prefix}0 .. {prefix}{n-1}`.
#[allow(dead_code)]
pub fn page(prefix: &str, n: usize) -> Vec<Photo> {
    (0..n).map(|i| photo(&format!("{prefix}{i}"))).collect()
}

#[allow(dead_code)]
pub fn ids(photos: &[Photo]) -> Vec<String> {
    photos.iter().map(|p| p.id.to_string()).collect()
}

/// Captures tracing output for tests.
#[allow(dead_code)]
pub struct TestTracing {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl TestTracing {
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.buffer.clone();
        let make_writer = move || TestWriter(writer.clone());
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn output(&self) -> String {
        let buf = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buf).to_string()
    }

    pub fn assert_contains(&self, needle: &str) {
        let out = self.output();
        assert!(
            out.contains(needle),
            "expected logs to contain `{needle}`, got:\n{out}"
        );
    }
}

struct TestWriter(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for TestWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard = self.0.lock().unwrap();
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct EnvGuard {
    key: String,
    prev: Option<String>,
}

#[allow(dead_code)]
impl EnvGuard {
    pub fn set(key: &str, val: impl AsRef<str>) -> Self {
        let prev = std::env::var(key).ok();
        unsafe { std::env::set_var(key, val.as_ref()) };
        Self {
            key: key.to_string(),
            prev,
        }
    }

    pub fn unset(key: &str) -> Self {
        let prev = std::env::var(key).ok();
        unsafe { std::env::remove_var(key) };
        Self {
            key: key.to_string(),
            prev,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            Some(v) => unsafe { std::env::set_var(&self.key, v) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}
