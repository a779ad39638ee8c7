//! Viewer controller: everything the desktop viewer does, minus the drawing.
//!
//! Owns the two lookup tables of the viewer (layers by code, profiles by code),
//! the current sidebar, the dropdown selection and the map view. It lives on the
//! UI thread; background requests reach it only through [`Viewer::poll`].

use crate::directory::{CountryEntry, country_directory};
use crate::fetch::{AtlasSource, FetchEvent, Fetcher};
use crate::geo::LatLng;
use crate::layers::BoundaryLayers;
use crate::map_view::{FIT_PADDING_PX, MapView};
use crate::models::CountryProfile;
use crate::render::Sidebar;
use crate::search::{SearchOutcome, search};
use ahash::AHashMap;
use geojson::FeatureCollection;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

pub struct Viewer {
    layers: BoundaryLayers,
    directory: Vec<CountryEntry>,
    profiles: AHashMap<String, CountryProfile>,
    sidebar: Sidebar,
    /// Code of the profile the sidebar shows.
    shown: Option<String>,
    /// Dropdown value.
    selected: Option<String>,
    hovered: Option<String>,
    view: MapView,
    map_state: LoadState,
    status: Option<String>,
    fetcher: Fetcher,
}

impl Viewer {
    /// Create the viewer and start loading map data in the background.
    pub fn new(source: Arc<dyn AtlasSource>, view: MapView) -> Self {
        let mut fetcher = Fetcher::new(source);
        fetcher.request_map_data();
        Self {
            layers: BoundaryLayers::default(),
            directory: Vec::new(),
            profiles: AHashMap::new(),
            sidebar: Sidebar::Placeholder,
            shown: None,
            selected: None,
            hovered: None,
            view,
            map_state: LoadState::Loading,
            status: None,
            fetcher,
        }
    }

    pub fn layers(&self) -> &BoundaryLayers {
        &self.layers
    }

    /// Dropdown entries, sorted by name.
    pub fn directory(&self) -> &[CountryEntry] {
        &self.directory
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn shown_code(&self) -> Option<&str> {
        self.shown.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn view(&self) -> &MapView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MapView {
        &mut self.view
    }

    pub fn map_state(&self) -> &LoadState {
        &self.map_state
    }

    /// Last user-facing message (search prompt, not found, fetch failure).
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Last profile fetched for `code`.
    pub fn cached_profile(&self, code: &str) -> Option<&CountryProfile> {
        self.profiles.get(&code.trim().to_ascii_uppercase())
    }

    pub fn in_flight(&self) -> usize {
        self.fetcher.in_flight()
    }

    /// Apply every finished request. Returns how many were applied.
    pub fn poll(&mut self) -> usize {
        let mut n = 0;
        while let Some(ev) = self.fetcher.try_next() {
            self.apply(ev);
            n += 1;
        }
        n
    }

    /// Block up to `timeout` for one finished request and apply it.
    pub fn poll_wait(&mut self, timeout: Duration) -> bool {
        match self.fetcher.next_timeout(timeout) {
            Some(ev) => {
                self.apply(ev);
                true
            }
            None => false,
        }
    }

    fn apply(&mut self, ev: FetchEvent) {
        match ev {
            FetchEvent::MapData(Ok(fc)) => self.load_layers(&fc),
            FetchEvent::MapData(Err(e)) => {
                log::error!("error fetching map data: {:#}", e);
                self.map_state = LoadState::Failed(format!("{:#}", e));
            }
            FetchEvent::Profile {
                code,
                request,
                result,
            } => match result {
                Ok(profile) => {
                    log::info!("profile #{} for {} arrived", request, code);
                    self.sidebar = Sidebar::from_profile(Some(&profile));
                    if self.sidebar == Sidebar::Placeholder {
                        log::warn!("profile for {} has no country block", code);
                        self.shown = None;
                    } else {
                        self.layers.highlight(&code);
                        self.shown = Some(code.clone());
                        self.status = None;
                    }
                    self.profiles.insert(code, profile);
                }
                Err(e) => {
                    log::error!("error fetching country profile for {}: {:#}", code, e);
                    self.sidebar = Sidebar::Placeholder;
                    self.shown = None;
                    self.status = Some(format!("Could not load data for {}", code));
                }
            },
        }
    }

    /// Replace the boundary layers and rebuild the dropdown.
    pub fn load_layers(&mut self, fc: &FeatureCollection) {
        self.layers = BoundaryLayers::from_feature_collection(fc);
        self.directory = country_directory(&self.layers);
        self.map_state = LoadState::Ready;
        if let Some(code) = &self.shown {
            self.layers.highlight(code);
        }
    }

    /// Dropdown change. `None` (or a blank code) is the placeholder entry and
    /// clears the sidebar; an unknown code is ignored. Any status message is
    /// cleared.
    pub fn select(&mut self, code: Option<&str>) {
        let code = code.map(|c| c.trim().to_ascii_uppercase()).filter(|c| !c.is_empty());
        let Some(code) = code else {
            self.selected = None;
            self.shown = None;
            self.sidebar = Sidebar::Placeholder;
            self.status = None;
            return;
        };
        let Some(bounds) = self.layers.get(&code).map(|l| l.bounds) else {
            log::debug!("ignoring selection of unknown code {}", code);
            return;
        };
        if let Some(bounds) = bounds {
            self.view.fit_bounds(&bounds, FIT_PADDING_PX);
        }
        self.selected = Some(code.clone());
        self.status = None;
        self.fetcher.request_profile(&code);
    }

    /// Map click: select the country under the pointer. Returns its code.
    pub fn click(&mut self, p: LatLng) -> Option<String> {
        let code = self.layers.layer_at(p)?.code.clone();
        self.select(Some(&code));
        Some(code)
    }

    /// Pointer moved over the map (`None` when it left).
    pub fn hover(&mut self, p: Option<LatLng>) {
        self.hovered = p
            .and_then(|p| self.layers.layer_at(p))
            .map(|l| l.code.clone());
    }

    /// Search by name. A hit selects the country; otherwise only the status
    /// message changes.
    pub fn search(&mut self, query: &str) -> SearchOutcome {
        let outcome = search(&self.layers, query);
        if let Some(code) = outcome.code() {
            let code = code.to_string();
            self.select(Some(&code));
        }
        self.status = Some(outcome.message());
        outcome
    }
}
