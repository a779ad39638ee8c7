//! The map surface: a Web Mercator viewport bounded to a region, plus the tile
//! arithmetic that decides which basemap tiles cover it.
//!
//! Screen coordinates are pixels relative to the top-left corner of the viewport.

use crate::config::Config;
use crate::geo::{Bounds, LatLng, WorldPoint, project, unproject, world_size_px};

/// Region the viewer is locked to: Cape Town-ish south-west, Cairo-ish north-east.
pub const AFRICA_BOUNDS: Bounds = Bounds {
    south_west: LatLng::new(-35.0, -20.0),
    north_east: LatLng::new(38.0, 55.0),
};

pub const AFRICA_CENTER: LatLng = LatLng::new(0.0, 20.0);
pub const INITIAL_ZOOM: f64 = 4.0;
pub const MIN_ZOOM: f64 = 0.0;
/// Deepest zoom any tile service serves; tile indices stay well inside `u32`.
pub const MAX_TILE_ZOOM: u8 = 22;

/// Padding (px) left around a country when the view is fitted to it.
pub const FIT_PADDING_PX: f64 = 0.0;

/// One slippy-map tile address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

/// A tile and where its top-left corner lands on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    pub tile: TileId,
    pub screen_x: f64,
    pub screen_y: f64,
    /// Edge length on screen; 256 at integral zoom.
    pub size: f64,
}

/// Basemap imagery source.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSource {
    /// URL with `{z}`, `{x}` and `{y}` placeholders.
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
}

impl TileSource {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            url_template: cfg.tile_url_template.clone(),
            attribution: cfg.tile_attribution.clone(),
            max_zoom: cfg.max_zoom.min(MAX_TILE_ZOOM),
        }
    }

    pub fn url(&self, tile: &TileId) -> String {
        self.url_template
            .replace("{z}", &tile.z.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

impl Default for TileSource {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    center: LatLng,
    zoom: f64,
    width: f64,
    height: f64,
    max_bounds: Option<Bounds>,
    max_zoom: f64,
}

impl MapView {
    /// Unbounded view.
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64, max_zoom: u8) -> Self {
        let mut view = Self {
            center,
            zoom,
            width: width.max(1.0),
            height: height.max(1.0),
            max_bounds: None,
            max_zoom: f64::from(max_zoom.min(MAX_TILE_ZOOM)),
        };
        view.clamp();
        view
    }

    /// The initial viewer state: centered on `(0, 20)` at zoom 4, locked to Africa.
    pub fn africa(width: f64, height: f64, max_zoom: u8) -> Self {
        Self::new(AFRICA_CENTER, INITIAL_ZOOM, width, height, max_zoom)
            .with_max_bounds(AFRICA_BOUNDS)
    }

    pub fn with_max_bounds(mut self, bounds: Bounds) -> Self {
        self.max_bounds = Some(bounds);
        self.clamp();
        self
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn max_bounds(&self) -> Option<Bounds> {
        self.max_bounds
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.clamp();
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.clamp();
    }

    fn world_px(&self) -> f64 {
        world_size_px(self.zoom)
    }

    /// World-pixel position of the viewport's top-left corner.
    fn origin_px(&self) -> (f64, f64) {
        let c = project(self.center);
        let ws = self.world_px();
        (c.x * ws - self.width / 2.0, c.y * ws - self.height / 2.0)
    }

    pub fn latlng_to_screen(&self, p: LatLng) -> (f64, f64) {
        let w = project(p);
        let ws = self.world_px();
        let (ox, oy) = self.origin_px();
        (w.x * ws - ox, w.y * ws - oy)
    }

    pub fn screen_to_latlng(&self, x: f64, y: f64) -> LatLng {
        let ws = self.world_px();
        let (ox, oy) = self.origin_px();
        unproject(WorldPoint {
            x: (ox + x) / ws,
            y: (oy + y) / ws,
        })
    }

    /// Drag by a pointer delta in pixels; the map follows the pointer.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let ws = self.world_px();
        let c = project(self.center);
        self.center = unproject(WorldPoint {
            x: c.x - dx / ws,
            y: c.y - dy / ws,
        });
        self.clamp();
    }

    /// Change zoom by `delta` keeping the geographic point under `(x, y)` fixed.
    pub fn zoom_around(&mut self, x: f64, y: f64, delta: f64) {
        let anchor = self.screen_to_latlng(x, y);
        let new_zoom = (self.zoom + delta).clamp(MIN_ZOOM, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }
        self.zoom = new_zoom;
        // Re-center so the anchor lands back under the pointer.
        let ws = self.world_px();
        let a = project(anchor);
        let cx = a.x * ws - x + self.width / 2.0;
        let cy = a.y * ws - y + self.height / 2.0;
        self.center = unproject(WorldPoint {
            x: cx / ws,
            y: cy / ws,
        });
        self.clamp();
    }

    /// Largest integral zoom at which `bounds` fits inside the viewport minus padding.
    pub fn bounds_zoom(&self, bounds: &Bounds, padding: f64) -> f64 {
        let nw = project(bounds.north_west());
        let se = project(bounds.south_east());
        let dx = (se.x - nw.x).abs();
        let dy = (se.y - nw.y).abs();
        let avail_w = (self.width - 2.0 * padding).max(1.0);
        let avail_h = (self.height - 2.0 * padding).max(1.0);
        if dx <= f64::EPSILON && dy <= f64::EPSILON {
            return self.max_zoom;
        }
        let scale_x = if dx > f64::EPSILON {
            avail_w / (dx * world_size_px(0.0))
        } else {
            f64::INFINITY
        };
        let scale_y = if dy > f64::EPSILON {
            avail_h / (dy * world_size_px(0.0))
        } else {
            f64::INFINITY
        };
        scale_x
            .min(scale_y)
            .log2()
            .floor()
            .clamp(MIN_ZOOM, self.max_zoom)
    }

    /// Center on `bounds` at the largest zoom that shows all of it.
    pub fn fit_bounds(&mut self, bounds: &Bounds, padding: f64) {
        let zoom = self.bounds_zoom(bounds, padding);
        let nw = project(bounds.north_west());
        let se = project(bounds.south_east());
        let center = unproject(WorldPoint {
            x: (nw.x + se.x) / 2.0,
            y: (nw.y + se.y) / 2.0,
        });
        self.set_view(center, zoom);
    }

    /// Geographic extent currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        Bounds::new(
            self.screen_to_latlng(0.0, self.height),
            self.screen_to_latlng(self.width, 0.0),
        )
    }

    /// Tiles (at `floor(zoom)`, capped by `max_tile_zoom`) covering the viewport.
    pub fn visible_tiles(&self, max_tile_zoom: u8) -> Vec<TilePlacement> {
        let z = self
            .zoom
            .floor()
            .clamp(0.0, f64::from(max_tile_zoom.min(MAX_TILE_ZOOM)));
        let tiles_per_axis = 1u32 << (z as u32);
        let tile_px = self.world_px() / f64::from(tiles_per_axis);
        let (ox, oy) = self.origin_px();

        let max_index = i64::from(tiles_per_axis) - 1;
        let x0 = ((ox / tile_px).floor() as i64).clamp(0, max_index);
        let x1 = (((ox + self.width) / tile_px).floor() as i64).clamp(0, max_index);
        let y0 = ((oy / tile_px).floor() as i64).clamp(0, max_index);
        let y1 = (((oy + self.height) / tile_px).floor() as i64).clamp(0, max_index);

        let mut out = Vec::with_capacity(((x1 - x0 + 1) * (y1 - y0 + 1)) as usize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                out.push(TilePlacement {
                    tile: TileId {
                        z: z as u8,
                        x: x as u32,
                        y: y as u32,
                    },
                    screen_x: x as f64 * tile_px - ox,
                    screen_y: y as f64 * tile_px - oy,
                    size: tile_px,
                });
            }
        }
        out
    }

    /// Enforce zoom limits and keep the viewport inside `max_bounds`. When the
    /// viewport is wider (taller) than the bounds, the bounds are centered.
    fn clamp(&mut self) {
        self.zoom = self.zoom.clamp(MIN_ZOOM, self.max_zoom);
        let Some(bounds) = self.max_bounds else {
            return;
        };
        let ws = self.world_px();
        let nw = project(bounds.north_west());
        let se = project(bounds.south_east());
        let (x0, x1) = (nw.x * ws, se.x * ws);
        let (y0, y1) = (nw.y * ws, se.y * ws);
        let c = project(self.center);
        let (mut cx, mut cy) = (c.x * ws, c.y * ws);
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);

        cx = if x1 - x0 <= self.width {
            (x0 + x1) / 2.0
        } else {
            cx.clamp(x0 + hw, x1 - hw)
        };
        cy = if y1 - y0 <= self.height {
            (y0 + y1) / 2.0
        } else {
            cy.clamp(y0 + hh, y1 - hh)
        };
        self.center = unproject(WorldPoint {
            x: cx / ws,
            y: cy / ws,
        });
    }
}
