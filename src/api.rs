/// Synchronous client for the **atlas backend API**.
///
/// Two resources drive the viewer:
/// - `GET {api}/map-data`: a GeoJSON `FeatureCollection` with `ISO_A2` and `NAME`
///   properties per feature,
/// - `GET {api}/country-profile/{code}`: a [`CountryProfile`] document.
///
/// The service root (API base without `/api/v1`) additionally serves `/health` and
/// `/african-capitals`.
///
/// ### Notes
/// - Requests are single-shot. Failures surface as errors and callers decide
///   whether to log them or fall back to a placeholder.
/// - A 404 on a country-scoped resource becomes [`AtlasError::NotFound`].
///
/// Typical usage:
/// ```no_run
/// # use africa_atlas::Client;
/// let client = Client::default();
/// let profile = client.fetch_country_profile("ke")?;
/// println!("{:?}", profile.name());
/// # Ok::<(), anyhow::Error>(())
/// ```
use crate::config::{self, Config};
use crate::error::AtlasError;
use crate::models::{CapitalsResponse, CountryProfile, HealthStatus, RegionCapitals};
use anyhow::{Context, Result};
use geojson::{FeatureCollection, GeoJson};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::redirect::Policy;
use std::sync::LazyLock;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(&Config::default()).expect("reqwest client build")
    }
}

// ISO2, ISO3, and Natural Earth's "-99" placeholder.
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9-]{2,3}$").expect("valid code regex"));

// Allow `-` unescaped in codes.
const SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-');

/// Trim and uppercase a country code and reject anything that is not code-shaped.
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if !CODE_RE.is_match(&code) {
        return Err(AtlasError::InvalidCode(code).into());
    }
    Ok(code)
}

/// Parse a map-data body. Anything other than a `FeatureCollection` is an error.
pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection> {
    let gj: GeoJson = body.parse().context("parse GeoJSON")?;
    match gj {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(AtlasError::NotAFeatureCollection.into()),
    }
}

/// Parse a country-profile body.
pub fn parse_profile(body: &str) -> Result<CountryProfile> {
    serde_json::from_str(body).context("parse country profile")
}

impl Client {
    /// Build a client from configuration (base URL and timeouts).
    pub fn new(cfg: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .redirect(Policy::limited(5))
            .user_agent(concat!("africa_atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Same client, different API base.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn map_data_url(&self) -> String {
        format!("{}/map-data", self.base_url)
    }

    /// URL of a country profile. The code is normalized and percent-encoded.
    pub fn profile_url(&self, code: &str) -> Result<String> {
        Ok(format!(
            "{}/country-profile/{}",
            self.base_url,
            encode_code(&normalize_code(code)?)
        ))
    }

    pub fn country_map_data_url(&self, code: &str) -> Result<String> {
        Ok(format!(
            "{}/map-data/{}",
            self.base_url,
            encode_code(&normalize_code(code)?)
        ))
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", config::service_root(&self.base_url))
    }

    pub fn capitals_url(&self) -> String {
        format!("{}/african-capitals", config::service_root(&self.base_url))
    }

    fn get(&self, url: &str) -> Result<Response> {
        let resp = self
            .http
            .get(url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AtlasError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }
        Ok(resp)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        self.get(url)?
            .text()
            .with_context(|| format!("read body of GET {}", url))
    }

    /// Fetch boundary geometry for every country the backend serves.
    pub fn fetch_map_data(&self) -> Result<FeatureCollection> {
        let url = self.map_data_url();
        let body = self.get_text(&url)?;
        let fc = parse_feature_collection(&body).with_context(|| format!("GET {}", url))?;
        log::info!("loaded {} boundary features", fc.features.len());
        Ok(fc)
    }

    /// Fetch boundary geometry for one country. `None` when the backend has none.
    pub fn fetch_country_map_data(&self, code: &str) -> Result<Option<FeatureCollection>> {
        let url = self.country_map_data_url(code)?;
        match self.get_text(&url) {
            Ok(body) => parse_feature_collection(&body)
                .with_context(|| format!("GET {}", url))
                .map(Some),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Fetch the profile of one country.
    pub fn fetch_country_profile(&self, code: &str) -> Result<CountryProfile> {
        let url = self.profile_url(code)?;
        let body = match self.get_text(&url) {
            Ok(body) => body,
            Err(e) if is_not_found(&e) => {
                return Err(AtlasError::NotFound(normalize_code(code)?).into());
            }
            Err(e) => return Err(e),
        };
        parse_profile(&body).with_context(|| format!("GET {}", url))
    }

    pub fn health(&self) -> Result<HealthStatus> {
        let url = self.health_url();
        self.get(&url)?
            .json()
            .with_context(|| format!("decode health from {}", url))
    }

    /// Capitals grouped by region, in the backend's region order.
    pub fn fetch_capitals(&self) -> Result<Vec<RegionCapitals>> {
        let url = self.capitals_url();
        let body: CapitalsResponse = self
            .get(&url)?
            .json()
            .with_context(|| format!("decode capitals from {}", url))?;
        Ok(body.african_capitals_by_region)
    }
}

fn encode_code(code: &str) -> String {
    percent_encoding::utf8_percent_encode(code, SAFE).to_string()
}

fn is_not_found(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<AtlasError>(),
        Some(AtlasError::Status { status, .. }) if *status == StatusCode::NOT_FOUND.as_u16()
    )
}
