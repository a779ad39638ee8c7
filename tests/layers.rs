use africa_atlas::api::parse_feature_collection;
use africa_atlas::geo::LatLng;
use africa_atlas::layers::{DEFAULT_STYLE, HIGHLIGHT_STYLE};
use africa_atlas::BoundaryLayers;

fn fixture() -> BoundaryLayers {
    let fc = parse_feature_collection(include_str!("fixtures/africa.geojson")).unwrap();
    BoundaryLayers::from_feature_collection(&fc)
}

#[test]
fn one_layer_per_coded_feature_in_load_order() {
    let layers = fixture();
    let codes: Vec<_> = layers.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["KE", "NG", "NE", "EG", "DZ"]);
    assert_eq!(layers.len(), 5);
    assert!(layers.iter().all(|l| l.style == DEFAULT_STYLE));
}

#[test]
fn features_without_code_are_decorative() {
    let layers = fixture();
    assert_eq!(layers.decorative().len(), 1);
    assert!(layers.iter().all(|l| l.name != "Somaliland"));
    // Clicking it selects nothing.
    assert!(layers.layer_at(LatLng::new(9.5, 45.0)).is_none());
}

#[test]
fn codes_are_uppercased_and_lookup_ignores_case() {
    let layers = fixture();
    assert_eq!(layers.get("EG").map(|l| l.name.as_str()), Some("Egypt"));
    assert!(layers.contains_code("eg"));
    assert!(layers.contains_code(" ke "));
    assert!(!layers.contains_code("ZZ"));
    // MultiPolygon keeps every part.
    assert_eq!(layers.get("EG").unwrap().polygons.len(), 2);
}

#[test]
fn hit_test_respects_holes() {
    let layers = fixture();
    let kenya = layers.layer_at(LatLng::new(0.0, 37.0)).unwrap();
    assert_eq!(kenya.code, "KE");
    assert_eq!(layers.layer_at(LatLng::new(26.0, 0.0)).unwrap().code, "DZ");
    assert!(layers.layer_at(LatLng::new(29.0, 3.0)).is_none());
    assert!(layers.layer_at(LatLng::new(-30.0, -10.0)).is_none());
}

#[test]
fn highlight_is_exclusive() {
    let mut layers = fixture();
    assert!(layers.highlight("ke"));
    assert!(layers.highlight("NG"));
    let styled: Vec<_> = layers
        .iter()
        .filter(|l| l.style == HIGHLIGHT_STYLE)
        .map(|l| l.code.as_str())
        .collect();
    assert_eq!(styled, ["NG"]);
    assert_eq!(layers.highlighted().map(|l| l.code.as_str()), Some("NG"));

    assert!(!layers.highlight("ZZ"));
    assert!(layers.highlighted().is_none());
}

#[test]
fn duplicate_codes_keep_first_position_last_geometry() {
    let body = r#"{
      "type": "FeatureCollection",
      "features": [
        { "type": "Feature", "properties": { "ISO_A2": "SD", "NAME": "Sudan (old)" },
          "geometry": { "type": "Polygon", "coordinates": [[[22,8],[38,8],[38,22],[22,22],[22,8]]] } },
        { "type": "Feature", "properties": { "ISO_A2": "TD", "NAME": "Chad" },
          "geometry": { "type": "Polygon", "coordinates": [[[13,7],[24,7],[24,23],[13,23],[13,7]]] } },
        { "type": "Feature", "properties": { "ISO_A2": "SD", "NAME": "Sudan" },
          "geometry": { "type": "Polygon", "coordinates": [[[22,10],[38,10],[38,22],[22,22],[22,10]]] } }
      ]
    }"#;
    let layers = BoundaryLayers::from_feature_collection(&parse_feature_collection(body).unwrap());
    let codes: Vec<_> = layers.iter().map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["SD", "TD"]);
    let sudan = layers.get("SD").unwrap();
    assert_eq!(sudan.name, "Sudan");
    assert_eq!(sudan.bounds.unwrap().south_west.lat, 10.0);
}

#[test]
fn empty_collection_has_no_bounds() {
    let fc = parse_feature_collection(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
    let layers = BoundaryLayers::from_feature_collection(&fc);
    assert!(layers.is_empty());
    assert!(layers.bounds().is_none());
}

#[test]
fn non_collection_is_rejected() {
    let point = r#"{"type":"Point","coordinates":[1.0,2.0]}"#;
    assert!(parse_feature_collection(point).is_err());
    assert!(parse_feature_collection("not json").is_err());
}
