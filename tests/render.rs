use africa_atlas::api::parse_profile;
use africa_atlas::render::{SIDEBAR_PLACEHOLDER, popup_html};
use africa_atlas::{CountryProfile, Sidebar};

fn kenya() -> CountryProfile {
    parse_profile(include_str!("fixtures/profile_ke.json")).unwrap()
}

#[test]
fn profile_parses() {
    let p = kenya();
    assert_eq!(p.code().as_deref(), Some("KE"));
    assert_eq!(p.name(), Some("Kenya"));
    assert_eq!(p.key_sectors().len(), 2);
    assert!(p.geography.is_none());
}

#[test]
fn sidebar_formats_fields() {
    let sidebar = Sidebar::from_profile(Some(&kenya()));
    let d = sidebar.details().expect("details");
    assert_eq!(d.name, "Kenya");
    assert_eq!(d.capital, "Nairobi");
    assert_eq!(d.region, "East Africa");
    assert_eq!(d.population, "53,771,300");
    assert_eq!(d.population_growth, "2.3%");
    assert_eq!(d.median_age, "20.1 years");
    assert_eq!(d.gdp, "$98.84 billion");
    assert_eq!(d.gdp_growth, "5.4%");
    assert_eq!(d.currency, "Kenyan Shilling (KES)");
    assert_eq!(d.flag_url.as_deref(), Some("https://flagcdn.com/64x48/ke.png"));

    assert_eq!(d.sectors[0].caption, "$33.9 billion (34.5% of GDP)");
    assert_eq!(d.sectors[1].caption, "$45.2 billion (46% of GDP)");
    assert_eq!(d.sectors[1].bar_percent, 46.0);
}

#[test]
fn html_contains_values_and_sectors() {
    let html = Sidebar::from_profile(Some(&kenya())).to_html();
    assert!(html.contains("<h4>Kenya</h4>"));
    assert!(html.contains("<strong>Capital:</strong> Nairobi"));
    assert!(html.contains("53,771,300"));
    assert!(html.contains("$98.84 billion"));
    assert!(html.contains("Key Economic Sectors:"));
    assert!(html.contains("width: 34.5%"));
}

#[test]
fn missing_sections_render_na_without_sectors() {
    let p = parse_profile(r#"{"country":{"name":"Chad","code":"TD"}}"#).unwrap();
    let sidebar = Sidebar::from_profile(Some(&p));
    let d = sidebar.details().unwrap();
    assert_eq!(d.capital, "N/A");
    assert_eq!(d.population, "N/A");
    assert_eq!(d.median_age, "N/A");
    assert_eq!(d.gdp, "N/A");
    assert!(d.sectors.is_empty());
    assert!(!sidebar.to_html().contains("Key Economic Sectors"));
}

#[test]
fn zero_is_a_value() {
    let p = parse_profile(
        r#"{"country":{"name":"X","code":"XX"},"demographics":{"population":0,"growth_rate":0}}"#,
    )
    .unwrap();
    let d = Sidebar::from_profile(Some(&p)).details().cloned().unwrap();
    assert_eq!(d.population, "0");
    assert_eq!(d.population_growth, "0.0%");
}

#[test]
fn no_country_block_is_placeholder() {
    let p = parse_profile("{}").unwrap();
    assert_eq!(Sidebar::from_profile(Some(&p)), Sidebar::Placeholder);
    assert_eq!(Sidebar::from_profile(None), Sidebar::Placeholder);
    assert_eq!(
        Sidebar::Placeholder.to_html(),
        format!("<p>{}</p>", SIDEBAR_PLACEHOLDER)
    );
}

#[test]
fn text_output_lists_rows() {
    let text = Sidebar::from_profile(Some(&kenya())).to_text();
    assert!(text.starts_with("Kenya\n=====\n"));
    assert!(text.contains("Population:"));
    assert!(text.contains("Agriculture"));
}

#[test]
fn names_are_escaped() {
    let p = parse_profile(r#"{"country":{"name":"<Côte d'Ivoire>","code":"CI"}}"#).unwrap();
    let html = popup_html(&p);
    assert!(html.contains("&lt;Côte d&#39;Ivoire&gt;"));
    assert!(html.contains("https://flagcdn.com/32x24/ci.png"));
}

#[test]
fn sector_without_name_still_renders() {
    let p = parse_profile(
        r#"{"country":{"name":"Ghana","code":"GH"},
            "economy":{"key_sectors":[{"name":null,"value":12.5,"contribution":null},{"value":3}]}}"#,
    )
    .unwrap();
    let sidebar = Sidebar::from_profile(Some(&p));
    let sectors = &sidebar.details().unwrap().sectors;
    assert_eq!(sectors.len(), 2);
    assert_eq!(sectors[0].name, "N/A");
    assert_eq!(sectors[0].bar_percent, 0.0);
    assert_eq!(sectors[0].caption, "$12.5 billion (N/A% of GDP)");
    assert_eq!(sectors[1].name, "N/A");
}
