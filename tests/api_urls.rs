use africa_atlas::api::normalize_code;
use africa_atlas::{AtlasError, Client, Config};

fn client() -> Client {
    Client::new(&Config::default())
        .unwrap()
        .with_base_url("http://atlas.test/api/v1/")
}

#[test]
fn resource_urls() {
    let c = client();
    assert_eq!(c.map_data_url(), "http://atlas.test/api/v1/map-data");
    assert_eq!(
        c.profile_url(" ke ").unwrap(),
        "http://atlas.test/api/v1/country-profile/KE"
    );
    assert_eq!(
        c.country_map_data_url("ng").unwrap(),
        "http://atlas.test/api/v1/map-data/NG"
    );
}

#[test]
fn service_root_urls() {
    let c = client();
    assert_eq!(c.health_url(), "http://atlas.test/health");
    assert_eq!(c.capitals_url(), "http://atlas.test/african-capitals");
}

#[test]
fn code_validation() {
    assert_eq!(normalize_code("ke").unwrap(), "KE");
    assert_eq!(normalize_code("KEN").unwrap(), "KEN");
    assert_eq!(normalize_code("-99").unwrap(), "-99");
    for bad in ["", "K", "KENY", "K/E", "../x"] {
        let err = normalize_code(bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AtlasError>(),
            Some(AtlasError::InvalidCode(_))
        ));
    }
    assert!(client().profile_url("a b").is_err());
}
