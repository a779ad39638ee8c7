use africa_atlas::geo::{Bounds, LatLng};
use africa_atlas::map_view::{
    AFRICA_BOUNDS, AFRICA_CENTER, INITIAL_ZOOM, MAX_TILE_ZOOM, MapView, TileId, TileSource,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn initial_view_is_centered_on_africa() {
    let view = MapView::africa(800.0, 600.0, 18);
    assert_eq!(view.zoom(), INITIAL_ZOOM);
    assert!(close(view.center().lat, AFRICA_CENTER.lat));
    assert!(close(view.center().lng, AFRICA_CENTER.lng));
    assert_eq!(view.max_bounds(), Some(AFRICA_BOUNDS));
}

#[test]
fn screen_round_trip_is_stable() {
    let view = MapView::africa(800.0, 600.0, 18);
    let p = LatLng::new(-1.28, 36.82);
    let (x, y) = view.latlng_to_screen(p);
    let back = view.screen_to_latlng(x, y);
    assert!(close(back.lat, p.lat) && close(back.lng, p.lng));

    let (cx, cy) = view.latlng_to_screen(view.center());
    assert!(close(cx, 400.0) && close(cy, 300.0));
}

#[test]
fn panning_stays_inside_max_bounds() {
    let mut view = MapView::africa(800.0, 600.0, 18);
    view.pan_by(-1.0e6, 1.0e6);
    let visible = view.visible_bounds();
    assert!(visible.south_west.lat >= AFRICA_BOUNDS.south_west.lat - 1e-6);
    assert!(visible.north_east.lng <= AFRICA_BOUNDS.north_east.lng + 1e-6);
}

#[test]
fn fit_bounds_shows_whole_country_at_integral_zoom() {
    let mut view = MapView::africa(800.0, 600.0, 18);
    let kenya = Bounds::new(LatLng::new(-4.7, 34.0), LatLng::new(5.0, 41.9));
    view.fit_bounds(&kenya, 0.0);

    assert_eq!(view.zoom().fract(), 0.0);
    assert!(view.zoom() > INITIAL_ZOOM);
    let visible = view.visible_bounds();
    assert!(visible.contains(kenya.south_west));
    assert!(visible.contains(kenya.north_east));
    assert!(view.visible_bounds().contains(kenya.center()));
}

#[test]
fn point_bounds_zoom_to_max() {
    let mut view = MapView::africa(800.0, 600.0, 12);
    view.fit_bounds(&Bounds::from_point(LatLng::new(1.0, 20.0)), 0.0);
    assert_eq!(view.zoom(), 12.0);
}

#[test]
fn zoom_keeps_point_under_pointer() {
    let mut view = MapView::africa(1600.0, 1200.0, 18);
    view.set_view(LatLng::new(0.0, 20.0), 6.0);
    let before = view.screen_to_latlng(900.0, 500.0);
    view.zoom_around(900.0, 500.0, 1.0);
    assert_eq!(view.zoom(), 7.0);
    let (x, y) = view.latlng_to_screen(before);
    assert!((x - 900.0).abs() < 1e-3 && (y - 500.0).abs() < 1e-3);
}

#[test]
fn zoom_is_capped() {
    let mut view = MapView::africa(800.0, 600.0, 10);
    view.zoom_around(400.0, 300.0, 50.0);
    assert_eq!(view.zoom(), 10.0);
}

#[test]
fn visible_tiles_cover_viewport() {
    let view = MapView::africa(800.0, 600.0, 18);
    let tiles = view.visible_tiles(18);
    assert!(!tiles.is_empty());
    assert!(tiles.iter().all(|t| t.tile.z == 4 && t.size == 256.0));
    let min_x = tiles.iter().map(|t| t.screen_x).fold(f64::INFINITY, f64::min);
    let max_x = tiles.iter().map(|t| t.screen_x + t.size).fold(f64::NEG_INFINITY, f64::max);
    assert!(min_x <= 0.0 && max_x >= 800.0);
}

#[test]
fn tile_url_uses_row_before_column() {
    let src = TileSource::default();
    let url = src.url(&TileId { z: 4, x: 8, y: 7 });
    assert!(url.ends_with("/tile/4/7/8"));
}

#[test]
fn oversized_max_zoom_is_capped() {
    let mut view = MapView::africa(800.0, 600.0, 40);
    view.set_view(LatLng::new(0.0, 20.0), 33.0);
    assert_eq!(view.zoom(), f64::from(MAX_TILE_ZOOM));
    let tiles = view.visible_tiles(40);
    assert!(!tiles.is_empty());
    assert!(tiles.iter().all(|t| t.tile.z == MAX_TILE_ZOOM));
}
