//! Boundary layers built from the map-data `FeatureCollection`.
//!
//! Each feature with an `ISO_A2` property becomes one interactive
//! [`CountryLayer`], keyed by the uppercased code and kept in insertion order.
//! Features without a usable code still render, but take no part in selection,
//! search, tooltips or flag markers.

use crate::geo::{Bounds, LatLng, ring_contains};
use ahash::AHashMap;
use geojson::{Feature, FeatureCollection, Value};

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Outline style of a boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerStyle {
    pub weight: f32,
    pub color: Rgb,
}

/// `weight 1, #666`.
pub const DEFAULT_STYLE: LayerStyle = LayerStyle {
    weight: 1.0,
    color: Rgb(0x66, 0x66, 0x66),
};

/// `weight 2, #ff7800`.
pub const HIGHLIGHT_STYLE: LayerStyle = LayerStyle {
    weight: 2.0,
    color: Rgb(0xff, 0x78, 0x00),
};

/// Transient pointer-over style; never stored on a layer.
pub const HOVER_STYLE: LayerStyle = LayerStyle {
    weight: 3.0,
    color: Rgb(0xff, 0xff, 0xff),
};

/// Polygon with an exterior ring and optional holes, coordinates in degrees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Vec<LatLng>,
    pub holes: Vec<Vec<LatLng>>,
}

impl Polygon {
    pub fn contains(&self, p: LatLng) -> bool {
        ring_contains(&self.exterior, p) && !self.holes.iter().any(|h| ring_contains(h, p))
    }

    pub fn rings(&self) -> impl Iterator<Item = &[LatLng]> {
        std::iter::once(self.exterior.as_slice()).chain(self.holes.iter().map(|h| h.as_slice()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryLayer {
    /// Uppercased ISO2 code.
    pub code: String,
    /// `NAME` property; empty when the feature has none.
    pub name: String,
    pub polygons: Vec<Polygon>,
    pub bounds: Option<Bounds>,
    pub style: LayerStyle,
}

impl CountryLayer {
    pub fn contains(&self, p: LatLng) -> bool {
        match self.bounds {
            Some(b) if b.contains(p) => self.polygons.iter().any(|poly| poly.contains(p)),
            _ => false,
        }
    }

    /// Where the tooltip and flag marker sit: the center of the bounding box.
    pub fn anchor(&self) -> Option<LatLng> {
        self.bounds.map(|b| b.center())
    }
}

/// All boundary layers of one map-data load.
#[derive(Debug, Clone, Default)]
pub struct BoundaryLayers {
    layers: Vec<CountryLayer>,
    index: AHashMap<String, usize>,
    decorative: Vec<Vec<Polygon>>,
}

impl BoundaryLayers {
    pub fn from_feature_collection(fc: &FeatureCollection) -> Self {
        let mut out = Self::default();
        for (i, feature) in fc.features.iter().enumerate() {
            let polygons = feature_polygons(feature);
            let Some(code) = feature_code(feature) else {
                log::warn!("feature #{} has no ISO_A2, rendered without interaction", i);
                out.decorative.push(polygons);
                continue;
            };
            let name = feature
                .property("NAME")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            out.insert(CountryLayer {
                bounds: Bounds::from_points(
                    polygons.iter().flat_map(|p| p.exterior.iter().copied()),
                ),
                code,
                name,
                polygons,
                style: DEFAULT_STYLE,
            });
        }
        log::info!(
            "wired {} country layers ({} decorative features)",
            out.layers.len(),
            out.decorative.len()
        );
        out
    }

    /// A repeated code replaces the earlier layer but keeps its position.
    fn insert(&mut self, layer: CountryLayer) {
        match self.index.get(&layer.code) {
            Some(&i) => self.layers[i] = layer,
            None => {
                self.index.insert(layer.code.clone(), self.layers.len());
                self.layers.push(layer);
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<&CountryLayer> {
        let code = code.trim().to_ascii_uppercase();
        self.index.get(&code).map(|&i| &self.layers[i])
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Layers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Geometry of features skipped for interaction.
    pub fn decorative(&self) -> &[Vec<Polygon>] {
        &self.decorative
    }

    pub fn reset_styles(&mut self) {
        for layer in &mut self.layers {
            layer.style = DEFAULT_STYLE;
        }
    }

    /// Reset every layer, then highlight `code`. Returns false for unknown codes.
    pub fn highlight(&mut self, code: &str) -> bool {
        self.reset_styles();
        let code = code.trim().to_ascii_uppercase();
        match self.index.get(&code) {
            Some(&i) => {
                self.layers[i].style = HIGHLIGHT_STYLE;
                true
            }
            None => false,
        }
    }

    pub fn highlighted(&self) -> Option<&CountryLayer> {
        self.layers.iter().find(|l| l.style == HIGHLIGHT_STYLE)
    }

    /// First layer (insertion order) whose polygons contain `p`.
    pub fn layer_at(&self, p: LatLng) -> Option<&CountryLayer> {
        self.layers.iter().find(|l| l.contains(p))
    }

    /// Extent of every interactive layer.
    pub fn bounds(&self) -> Option<Bounds> {
        self.layers
            .iter()
            .filter_map(|l| l.bounds)
            .reduce(|a, b| a.union(&b))
    }
}

/// Uppercased `ISO_A2`, or `None` when missing, null, empty or not a string.
fn feature_code(feature: &Feature) -> Option<String> {
    feature
        .property("ISO_A2")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_uppercase)
}

fn feature_polygons(feature: &Feature) -> Vec<Polygon> {
    let mut out = Vec::new();
    if let Some(geometry) = &feature.geometry {
        collect_polygons(&geometry.value, &mut out);
    }
    out
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon>) {
    match value {
        Value::Polygon(rings) => out.extend(polygon_from_rings(rings)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| polygon_from_rings(rings)))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_polygons(&g.value, out);
            }
        }
        _ => {}
    }
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon> {
    let mut it = rings.iter().map(|ring| {
        ring.iter()
            .filter_map(|pos| LatLng::from_position(pos))
            .collect::<Vec<_>>()
    });
    let exterior = it.next().filter(|r| r.len() >= 3)?;
    Some(Polygon {
        exterior,
        holes: it.filter(|r| r.len() >= 3).collect(),
    })
}
