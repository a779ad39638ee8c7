//! Geographic primitives and the Web Mercator projection used by the basemap.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Latitude limit of Web Mercator.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Tile edge in pixels at every zoom level.
pub const TILE_SIZE: f64 = 256.0;

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON positions are `[lng, lat, ...]`.
    pub fn from_position(pos: &[f64]) -> Option<Self> {
        match pos {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }
}

/// Position in normalized Web Mercator space: `x` grows east, `y` grows south,
/// the whole world spans `[0, 1]` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

pub fn project(p: LatLng) -> WorldPoint {
    let lat = p.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (p.lng + 180.0) / 360.0;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    WorldPoint { x, y }
}

pub fn unproject(w: WorldPoint) -> LatLng {
    let lng = w.x * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * w.y);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lng)
}

/// Pixel size of the whole world at a (possibly fractional) zoom.
pub fn world_size_px(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

/// Axis-aligned geographic rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Corners in any order.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn from_point(p: LatLng) -> Self {
        Self {
            south_west: p,
            north_east: p,
        }
    }

    /// Smallest bounds holding every point, `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = LatLng>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let mut b = Self::from_point(it.next()?);
        for p in it {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.extend(other.south_west);
        out.extend(other.north_east);
        out
    }

    /// Midpoint of the box (what tooltips and flag markers anchor to).
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }
}

/// Even-odd point-in-ring test on raw lng/lat coordinates.
pub(crate) fn ring_contains(ring: &[LatLng], p: LatLng) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.lat > p.lat) != (b.lat > p.lat) {
            let t = (p.lat - a.lat) / (b.lat - a.lat);
            if p.lng < a.lng + t * (b.lng - a.lng) {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_round_trips_inside_africa() {
        let nairobi = LatLng::new(-1.2921, 36.8219);
        let back = unproject(project(nairobi));
        assert!((back.lat - nairobi.lat).abs() < 1e-9);
        assert!((back.lng - nairobi.lng).abs() < 1e-9);
    }

    #[test]
    fn equator_and_greenwich_are_world_center() {
        let w = project(LatLng::new(0.0, 0.0));
        assert!((w.x - 0.5).abs() < 1e-12);
        assert!((w.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ring_with_hole_is_even_odd() {
        let outer = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 10.0),
            LatLng::new(10.0, 10.0),
            LatLng::new(10.0, 0.0),
        ];
        assert!(ring_contains(&outer, LatLng::new(5.0, 5.0)));
        assert!(!ring_contains(&outer, LatLng::new(15.0, 5.0)));
    }
}
