//! Fire-and-forget background requests.
//!
//! Every request runs on its own thread and reports back over one channel. The
//! UI loop drains the channel and applies results in arrival order; nothing is
//! cancelled, de-duplicated or re-ordered, so when two profile requests overlap
//! the one that finishes last wins.

use crate::api::Client;
use crate::models::CountryProfile;
use anyhow::Result;
use geojson::FeatureCollection;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

/// Where map data and profiles come from. [`Client`] in production.
pub trait AtlasSource: Send + Sync + 'static {
    fn map_data(&self) -> Result<FeatureCollection>;
    fn country_profile(&self, code: &str) -> Result<CountryProfile>;
}

impl AtlasSource for Client {
    fn map_data(&self) -> Result<FeatureCollection> {
        self.fetch_map_data()
    }

    fn country_profile(&self, code: &str) -> Result<CountryProfile> {
        self.fetch_country_profile(code)
    }
}

#[derive(Debug)]
pub enum FetchEvent {
    MapData(Result<FeatureCollection>),
    Profile {
        code: String,
        /// Sequence number of the request, in issue order.
        request: u64,
        result: Result<CountryProfile>,
    },
}

pub struct Fetcher {
    source: Arc<dyn AtlasSource>,
    sender: Sender<FetchEvent>,
    receiver: Receiver<FetchEvent>,
    issued: u64,
    in_flight: usize,
}

impl Fetcher {
    pub fn new(source: Arc<dyn AtlasSource>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            source,
            sender,
            receiver,
            issued: 0,
            in_flight: 0,
        }
    }

    pub fn request_map_data(&mut self) {
        self.in_flight += 1;
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        thread::spawn(move || {
            let _ = sender.send(FetchEvent::MapData(source.map_data()));
        });
    }

    /// Start fetching a profile; returns the request's sequence number.
    pub fn request_profile(&mut self, code: &str) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        let request = self.issued;
        let code = code.to_string();
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();
        log::debug!("profile request #{} for {}", request, code);
        thread::spawn(move || {
            let result = source.country_profile(&code);
            let _ = sender.send(FetchEvent::Profile {
                code,
                request,
                result,
            });
        });
        request
    }

    /// Next finished request, if any, without blocking.
    pub fn try_next(&mut self) -> Option<FetchEvent> {
        let ev = self.receiver.try_recv().ok()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(ev)
    }

    /// Wait up to `timeout` for the next finished request.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<FetchEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(ev) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(ev)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Requests issued but not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}
