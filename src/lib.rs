//! africa_atlas
//!
//! A small Rust library behind an interactive map of African countries. Pairs
//! with the `atlas` CLI and the `atlas-gui` desktop viewer.
//!
//! ### Features
//! - Load country boundaries (GeoJSON) from the backend and wire one layer per country
//! - Sorted country directory and case-insensitive search by name
//! - Fetch per-country profiles (demographics, economy, key sectors)
//! - Render profiles as sidebar/popup fragments (HTML or plain text)
//! - Web Mercator map view bounded to Africa, with basemap tile arithmetic
//! - Static SVG/PNG snapshots of the boundaries
//!
//! ### Example
//! ```no_run
//! use africa_atlas::{BoundaryLayers, Client, Sidebar};
//!
//! let client = Client::default();
//! let layers = BoundaryLayers::from_feature_collection(&client.fetch_map_data()?);
//! if let Some(code) = africa_atlas::search::search(&layers, "kenya").code() {
//!     let profile = client.fetch_country_profile(code)?;
//!     println!("{}", Sidebar::from_profile(Some(&profile)).to_text());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod config;
pub mod directory;
pub mod error;
pub mod fetch;
pub mod format;
pub mod geo;
pub mod images;
pub mod layers;
pub mod map_view;
pub mod models;
pub mod render;
pub mod search;
pub mod snapshot;
pub mod storage;
pub mod viewer;

pub use api::Client;
pub use config::Config;
pub use error::AtlasError;
pub use layers::BoundaryLayers;
pub use models::CountryProfile;
pub use render::Sidebar;
pub use viewer::Viewer;
