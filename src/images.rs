//! Background loading of basemap tiles and flag images.
//!
//! A fixed pool of worker threads pulls URLs from a shared queue, downloads and
//! decodes them to RGBA, and hands the pixels back over a channel. A URL is
//! queued at most once while it is in flight; recent failures are not retried.
//! Decoded images live in a bounded [`ImageCache`].

use crate::config::Config;
use ahash::AHashSet;
use anyhow::{Context, Result, bail};
use quick_cache::unsync::Cache;
use reqwest::blocking::Client as HttpClient;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Decoded image, 8-bit RGBA, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG or JPEG bytes.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage> {
    let img = image::load_from_memory(bytes).context("decode image")?;
    let rgba = img.to_rgba8();
    Ok(DecodedImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Downloads raw image bytes.
pub trait ImageFetch: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

pub struct HttpImageFetch {
    http: HttpClient,
}

impl HttpImageFetch {
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .user_agent(concat!("africa_atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build image HTTP client")?;
        Ok(Self { http })
    }
}

impl ImageFetch for HttpImageFetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        if !resp.status().is_success() {
            bail!("GET {} failed with HTTP {}", url, resp.status());
        }
        let bytes = resp.bytes().with_context(|| format!("read body of {}", url))?;
        Ok(bytes.to_vec())
    }
}

pub type ImageResult = (String, Result<DecodedImage>);

/// Failed URLs remembered so they are not fetched again every frame.
const FAILED_CAPACITY: usize = 256;

pub struct ImageLoader {
    jobs: Sender<String>,
    results: Receiver<ImageResult>,
    /// Queued or downloading; removed once the result is handed out.
    pending: AHashSet<String>,
    failed: Cache<String, ()>,
}

impl ImageLoader {
    pub fn new(fetch: Arc<dyn ImageFetch>, workers: usize) -> Self {
        let (jobs, job_rx) = mpsc::channel::<String>();
        let (result_tx, results) = mpsc::channel();
        let job_rx = Arc::new(Mutex::new(job_rx));
        for _ in 0..workers.max(1) {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            let fetch = Arc::clone(&fetch);
            thread::spawn(move || worker(job_rx, result_tx, fetch));
        }
        Self {
            jobs,
            results,
            pending: AHashSet::new(),
            failed: Cache::new(FAILED_CAPACITY),
        }
    }

    /// Queue `url` unless it is already in flight or recently failed.
    /// Returns true when newly queued.
    pub fn request(&mut self, url: &str) -> bool {
        if self.pending.contains(url) || self.failed.get(url).is_some() {
            return false;
        }
        if self.jobs.send(url.to_string()).is_err() {
            return false;
        }
        self.pending.insert(url.to_string());
        true
    }

    /// Number of URLs queued or downloading.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Everything finished since the last call.
    pub fn poll(&mut self) -> Vec<ImageResult> {
        let done: Vec<ImageResult> = self.results.try_iter().collect();
        for (url, result) in &done {
            self.settle(url, result.is_ok());
        }
        done
    }

    /// Wait up to `timeout` for one finished image.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<ImageResult> {
        let done = self.results.recv_timeout(timeout).ok()?;
        self.settle(&done.0, done.1.is_ok());
        Some(done)
    }

    fn settle(&mut self, url: &str, ok: bool) {
        self.pending.remove(url);
        if !ok {
            self.failed.insert(url.to_string(), ());
        }
    }
}

/// Bounded URL-keyed cache for decoded images (GPU textures in the viewer).
///
/// Evicted entries are simply requested again from the [`ImageLoader`].
pub struct ImageCache<T> {
    entries: Cache<String, T>,
    capacity: usize,
}

impl<T> ImageCache<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Cache::new(capacity),
            capacity,
        }
    }

    pub fn get(&mut self, url: &str) -> Option<&T> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, url: String, value: T) {
        self.entries.insert(url, value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn worker(jobs: Arc<Mutex<Receiver<String>>>, out: Sender<ImageResult>, fetch: Arc<dyn ImageFetch>) {
    loop {
        let url = {
            let Ok(rx) = jobs.lock() else { return };
            match rx.recv() {
                Ok(url) => url,
                Err(_) => return,
            }
        };
        let result = fetch.fetch(&url).and_then(|bytes| decode(&bytes));
        if let Err(e) = &result {
            log::warn!("image {} failed: {:#}", url, e);
        }
        if out.send((url, result)).is_err() {
            return;
        }
    }
}
