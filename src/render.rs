//! Sidebar and popup rendering.
//!
//! A profile is first turned into a [`Sidebar`] of display-ready strings; the
//! desktop viewer lays those out as widgets, while [`Sidebar::to_html`] and
//! [`Sidebar::to_text`] produce fragments for embedding and for the terminal.

use crate::format::{
    FlagSize, NOT_AVAILABLE, bar_percent, escape_html, flag_url, format_gdp, format_number,
    format_percent, format_plain, or_na,
};
use crate::models::{CountryProfile, KeySector};
use std::fmt::Write as _;

/// Text shown when nothing is selected or the last fetch failed.
pub const SIDEBAR_PLACEHOLDER: &str = "Select a country from the dropdown to see details";

#[derive(Debug, Clone, PartialEq)]
pub enum Sidebar {
    Placeholder,
    Details(Box<CountryDetails>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryDetails {
    pub code: Option<String>,
    pub flag_url: Option<String>,
    pub name: String,
    pub capital: String,
    pub region: String,
    pub population: String,
    pub population_growth: String,
    pub median_age: String,
    pub gdp: String,
    pub gdp_growth: String,
    pub currency: String,
    /// Empty when the profile lists no key sectors; no sectors block is rendered then.
    pub sectors: Vec<SectorLine>,
}

impl CountryDetails {
    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, &str); 9] {
        [
            ("Capital", self.capital.as_str()),
            ("Region", self.region.as_str()),
            ("Population", self.population.as_str()),
            ("Population Growth", self.population_growth.as_str()),
            ("Median Age", self.median_age.as_str()),
            ("GDP", self.gdp.as_str()),
            ("GDP Growth", self.gdp_growth.as_str()),
            ("Currency", self.currency.as_str()),
            ("Code", self.code.as_deref().unwrap_or(NOT_AVAILABLE)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorLine {
    pub name: String,
    /// Bar fill in percent, `0..=100`.
    pub bar_percent: f64,
    pub caption: String,
}

impl From<&KeySector> for SectorLine {
    fn from(s: &KeySector) -> Self {
        Self {
            name: or_na(s.name.as_deref()),
            bar_percent: bar_percent(s.contribution),
            caption: sector_caption(s),
        }
    }
}

/// `$33.9 billion (34.5% of GDP)`
pub fn sector_caption(s: &KeySector) -> String {
    format!(
        "${} billion ({}% of GDP)",
        format_plain(s.value),
        format_plain(s.contribution)
    )
}

impl Sidebar {
    /// Placeholder when there is no profile or it has no `country` block.
    pub fn from_profile(profile: Option<&CountryProfile>) -> Self {
        let Some(profile) = profile else {
            return Sidebar::Placeholder;
        };
        let Some(country) = profile.country.as_ref() else {
            return Sidebar::Placeholder;
        };
        let demo = profile.demographics.as_ref();
        let econ = profile.economy.as_ref();
        let code = profile.code();

        Sidebar::Details(Box::new(CountryDetails {
            flag_url: code.as_deref().and_then(|c| flag_url(c, FlagSize::Sidebar)),
            code,
            name: or_na(country.name.as_deref()),
            capital: or_na(country.capital.as_deref()),
            region: or_na(country.region.as_deref()),
            population: format_number(demo.and_then(|d| d.population)),
            population_growth: format_percent(demo.and_then(|d| d.growth_rate)),
            median_age: match demo.and_then(|d| d.median_age) {
                Some(age) if age.is_finite() => format!("{} years", format_plain(Some(age))),
                _ => NOT_AVAILABLE.to_string(),
            },
            gdp: format_gdp(econ.and_then(|e| e.gdp)),
            gdp_growth: format_percent(econ.and_then(|e| e.gdp_growth)),
            currency: or_na(econ.and_then(|e| e.currency.as_deref())),
            sectors: profile.key_sectors().iter().map(SectorLine::from).collect(),
        }))
    }

    pub fn details(&self) -> Option<&CountryDetails> {
        match self {
            Sidebar::Details(d) => Some(d),
            Sidebar::Placeholder => None,
        }
    }

    pub fn to_html(&self) -> String {
        let d = match self {
            Sidebar::Placeholder => return format!("<p>{}</p>", SIDEBAR_PLACEHOLDER),
            Sidebar::Details(d) => d,
        };
        let name = escape_html(&d.name);
        let mut html = String::from("<div class=\"country-details\">\n");
        if let Some(url) = &d.flag_url {
            let _ = writeln!(
                html,
                "<img src=\"{}\" alt=\"Flag of {}\" style=\"float:right;margin:0 0 10px 10px;border:1px solid #ddd;\">",
                escape_html(url),
                name
            );
        }
        let _ = writeln!(html, "<h4>{}</h4>", name);
        for (label, value) in d.rows().iter().take(8) {
            let _ = writeln!(
                html,
                "<p><strong>{}:</strong> {}</p>",
                label,
                escape_html(value)
            );
        }
        if !d.sectors.is_empty() {
            html.push_str("<div class=\"sectors-list mt-3\">\n<h5>Key Economic Sectors:</h5>\n");
            for s in &d.sectors {
                let _ = writeln!(
                    html,
                    "<div class=\"sector-item mb-2\"><div><strong>{}</strong></div>\
                     <div class=\"sector-bar\"><div class=\"sector-fill\" style=\"width: {}%\"></div></div>\
                     <small>{}</small></div>",
                    escape_html(&s.name),
                    s.bar_percent,
                    escape_html(&s.caption)
                );
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div>");
        html
    }

    /// Terminal rendering, one field per line.
    pub fn to_text(&self) -> String {
        let d = match self {
            Sidebar::Placeholder => return SIDEBAR_PLACEHOLDER.to_string(),
            Sidebar::Details(d) => d,
        };
        let mut out = String::new();
        let _ = writeln!(out, "{}", d.name);
        let _ = writeln!(out, "{}", "=".repeat(d.name.chars().count().max(3)));
        for (label, value) in d.rows() {
            let _ = writeln!(out, "{:<18} {}", format!("{}:", label), value);
        }
        if !d.sectors.is_empty() {
            let _ = writeln!(out, "\nKey Economic Sectors:");
            for s in &d.sectors {
                let filled = (s.bar_percent / 5.0).round() as usize;
                let _ = writeln!(
                    out,
                    "  {:<20} [{:<20}] {}",
                    s.name,
                    "#".repeat(filled),
                    s.caption
                );
            }
        }
        out
    }
}

/// Compact fragment shown when a country is clicked on the map.
pub fn popup_html(profile: &CountryProfile) -> String {
    let Sidebar::Details(d) = Sidebar::from_profile(Some(profile)) else {
        return format!("<p>{}</p>", SIDEBAR_PLACEHOLDER);
    };
    let code = d.code.as_deref().unwrap_or_default();
    let mut html = String::from("<div class=\"country-popup\">");
    if let Some(url) = flag_url(code, FlagSize::Marker) {
        let _ = write!(html, "<img src=\"{}\" alt=\"\"> ", escape_html(&url));
    }
    let _ = write!(
        html,
        "<strong>{}</strong><br>Capital: {}<br>Population: {}<br>GDP: {}</div>",
        escape_html(&d.name),
        escape_html(&d.capital),
        escape_html(&d.population),
        escape_html(&d.gdp)
    );
    html
}
