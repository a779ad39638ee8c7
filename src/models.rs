use serde::{Deserialize, Serialize};

/// Per-country profile served by `GET /country-profile/{code}`.
///
/// Every block and field is optional: the backend emits `null` for indicators
/// it could not resolve, and renderers guard each access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryProfile {
    pub country: Option<CountryInfo>,
    pub demographics: Option<Demographics>,
    pub economy: Option<Economy>,
    /// Boundary geometry and capital coordinates. Carried through, not rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geography: Option<Geography>,
}

impl CountryProfile {
    /// Uppercased ISO2 code of the profile, if the document carries one.
    pub fn code(&self) -> Option<String> {
        self.country
            .as_ref()
            .and_then(|c| c.code.as_deref())
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
    }

    pub fn name(&self) -> Option<&str> {
        self.country.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Key sectors, or an empty slice when the economy block or the list is missing.
    pub fn key_sectors(&self) -> &[KeySector] {
        self.economy
            .as_ref()
            .and_then(|e| e.key_sectors.as_deref())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub name: Option<String>,
    pub code: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub population: Option<f64>,
    /// Annual growth in percent.
    pub growth_rate: Option<f64>,
    pub median_age: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Economy {
    /// Current US$.
    pub gdp: Option<f64>,
    /// Annual growth in percent.
    pub gdp_growth: Option<f64>,
    pub currency: Option<String>,
    pub key_sectors: Option<Vec<KeySector>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeySector {
    pub name: Option<String>,
    /// Billions of US$.
    pub value: Option<f64>,
    /// Share of GDP in percent.
    pub contribution: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geography {
    pub boundaries: Option<serde_json::Value>,
    pub capital_coordinates: Option<[f64; 2]>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub time: chrono::DateTime<chrono::FixedOffset>,
}

/// Body of `GET /african-capitals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalsResponse {
    pub african_capitals_by_region: Vec<RegionCapitals>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionCapitals {
    pub region: String,
    pub countries: Vec<CapitalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalEntry {
    pub country: String,
    pub capital: String,
}
