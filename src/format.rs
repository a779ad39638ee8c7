//! Number and URL formatting shared by the sidebar, popups and CLI output.

use num_format::{Locale, ToFormattedString};

/// Shown wherever a value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Flag image sizes served by the flag CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagSize {
    /// 64x48, sidebar and popup.
    Sidebar,
    /// 32x24, map markers.
    Marker,
}

impl FlagSize {
    pub fn path(&self) -> &'static str {
        match self {
            FlagSize::Sidebar => "64x48",
            FlagSize::Marker => "32x24",
        }
    }

    pub fn pixels(&self) -> (u32, u32) {
        match self {
            FlagSize::Sidebar => (64, 48),
            FlagSize::Marker => (32, 24),
        }
    }
}

/// `https://flagcdn.com/{size}/{code}.png` with the code lowercased; `None` for an empty code.
pub fn flag_url(code: &str, size: FlagSize) -> Option<String> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    Some(format!(
        "https://flagcdn.com/{}/{}.png",
        size.path(),
        code.to_ascii_lowercase()
    ))
}

/// Comma-grouped number: `53771300` → `53,771,300`. Fractional digits are kept
/// as printed; missing or non-finite values become `N/A`.
pub fn format_number(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            if x.fract() == 0.0 && x.abs() < 9.0e15 {
                return (x as i64).to_formatted_string(&Locale::en);
            }
            let s = x.to_string();
            match s.split_once('.') {
                Some((int, frac)) => match int.parse::<i64>() {
                    Ok(i) if int != "-0" => {
                        format!("{}.{}", i.to_formatted_string(&Locale::en), frac)
                    }
                    _ => s,
                },
                None => s,
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// GDP in US$ as `$98.84 billion`.
pub fn format_gdp(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("${:.2} billion", x / 1.0e9),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Percentage with one decimal, `5.6%`.
pub fn format_percent(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{:.1}%", x),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Plain number the way it was served: `35` stays `35`, `33.9` stays `33.9`.
pub fn format_plain(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => x.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Text field or `N/A` when absent or blank.
pub fn or_na(v: Option<&str>) -> String {
    match v.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Bar width for a sector's share of GDP, clamped to `0..=100`.
pub fn bar_percent(contribution: Option<f64>) -> f64 {
    match contribution {
        Some(c) if c.is_finite() => c.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

/// Minimal HTML escaping for text interpolated into fragments.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_integers_and_keeps_fractions() {
        assert_eq!(format_number(Some(53_771_300.0)), "53,771,300");
        assert_eq!(format_number(Some(999.0)), "999");
        assert_eq!(format_number(Some(1234.5)), "1,234.5");
        assert_eq!(format_number(Some(-1_000_000.0)), "-1,000,000");
        assert_eq!(format_number(None), "N/A");
        assert_eq!(format_number(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn gdp_is_billions_two_decimals() {
        assert_eq!(format_gdp(Some(98_842_000_000.0)), "$98.84 billion");
        assert_eq!(format_gdp(Some(1.0e9)), "$1.00 billion");
        assert_eq!(format_gdp(None), "N/A");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(Some(5.64)), "5.6%");
        assert_eq!(format_percent(Some(-1.26)), "-1.3%");
        assert_eq!(format_percent(Some(2.0)), "2.0%");
    }

    #[test]
    fn plain_numbers_drop_trailing_zero() {
        assert_eq!(format_plain(Some(35.0)), "35");
        assert_eq!(format_plain(Some(33.9)), "33.9");
    }

    #[test]
    fn flag_urls_are_lowercase() {
        assert_eq!(
            flag_url("KE", FlagSize::Sidebar).as_deref(),
            Some("https://flagcdn.com/64x48/ke.png")
        );
        assert_eq!(
            flag_url("NG", FlagSize::Marker).as_deref(),
            Some("https://flagcdn.com/32x24/ng.png")
        );
        assert_eq!(flag_url("  ", FlagSize::Marker), None);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }
}
