//! Static map snapshots: boundary layers drawn to **SVG** or **PNG** without a window.
//!
//! - Web Mercator, fitted to the extent of all geometry
//! - Interactive layers filled, decorative features in gray
//! - Optional highlighted country in the selection style
//! - A dot where each country's flag marker would sit

use crate::geo::{LatLng, WorldPoint, project};
use crate::layers::{BoundaryLayers, DEFAULT_STYLE, HIGHLIGHT_STYLE, LayerStyle, Polygon};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;

const BACKGROUND: RGBColor = RGBColor(170, 211, 223);
const LAND: RGBColor = RGBColor(242, 239, 233);
const DECORATIVE: RGBColor = RGBColor(210, 210, 210);

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    pub width: u32,
    pub height: u32,
    /// Country drawn in the selection style.
    pub highlight: Option<String>,
    /// Empty border around the geometry, in pixels.
    pub margin: u32,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
            highlight: None,
            margin: 20,
        }
    }
}

/// Maps geographic positions onto the image.
#[derive(Debug, Clone, Copy)]
struct Fit {
    min: WorldPoint,
    scale: f64,
    off_x: f64,
    off_y: f64,
}

impl Fit {
    fn new(points: impl Iterator<Item = LatLng>, opts: &SnapshotOptions) -> Option<Self> {
        let (mut min, mut max) = (
            WorldPoint {
                x: f64::INFINITY,
                y: f64::INFINITY,
            },
            WorldPoint {
                x: f64::NEG_INFINITY,
                y: f64::NEG_INFINITY,
            },
        );
        let mut any = false;
        for p in points {
            let w = project(p);
            min.x = min.x.min(w.x);
            min.y = min.y.min(w.y);
            max.x = max.x.max(w.x);
            max.y = max.y.max(w.y);
            any = true;
        }
        if !any {
            return None;
        }
        let margin = f64::from(opts.margin);
        let avail_w = (f64::from(opts.width) - 2.0 * margin).max(1.0);
        let avail_h = (f64::from(opts.height) - 2.0 * margin).max(1.0);
        let dx = (max.x - min.x).max(f64::EPSILON);
        let dy = (max.y - min.y).max(f64::EPSILON);
        let scale = (avail_w / dx).min(avail_h / dy);
        Some(Self {
            min,
            scale,
            off_x: margin + (avail_w - dx * scale) / 2.0,
            off_y: margin + (avail_h - dy * scale) / 2.0,
        })
    }

    fn px(&self, p: LatLng) -> (i32, i32) {
        let w = project(p);
        (
            (self.off_x + (w.x - self.min.x) * self.scale).round() as i32,
            (self.off_y + (w.y - self.min.y) * self.scale).round() as i32,
        )
    }
}

/// Render `layers` to `out_path`; `.svg` selects SVG, anything else PNG.
pub fn render_snapshot<P: AsRef<Path>>(
    layers: &BoundaryLayers,
    out_path: P,
    opts: &SnapshotOptions,
) -> Result<()> {
    let all_points = layers
        .iter()
        .flat_map(|l| l.polygons.iter())
        .chain(layers.decorative().iter().flatten())
        .flat_map(|p| p.exterior.iter().copied());
    let fit = Fit::new(all_points, opts).ok_or_else(|| anyhow!("no geometry to draw"))?;

    if let Some(code) = &opts.highlight {
        if !layers.contains_code(code) {
            log::warn!("highlight code {} is not a loaded country", code);
        }
    }

    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let size = (opts.width, opts.height);
    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), size).into_drawing_area();
        draw(root, layers, &fit, opts)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), size).into_drawing_area();
        draw(root, layers, &fit, opts)
    }
}

fn rgb(style: &LayerStyle) -> RGBColor {
    RGBColor(style.color.0, style.color.1, style.color.2)
}

fn draw<DB>(
    root: DrawingArea<DB, Shift>,
    layers: &BoundaryLayers,
    fit: &Fit,
    opts: &SnapshotOptions,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&BACKGROUND).map_err(|e| anyhow!("{:?}", e))?;

    for polygons in layers.decorative() {
        for poly in polygons {
            draw_polygon(&root, fit, poly, DECORATIVE.filled(), rgb(&DEFAULT_STYLE).stroke_width(1))?;
        }
    }

    let highlight = opts.highlight.as_ref().map(|c| c.trim().to_ascii_uppercase());
    let mut highlighted = None;
    for layer in layers.iter() {
        if highlight.as_deref() == Some(layer.code.as_str()) {
            highlighted = Some(layer);
            continue;
        }
        for poly in &layer.polygons {
            draw_polygon(&root, fit, poly, LAND.filled(), rgb(&DEFAULT_STYLE).stroke_width(1))?;
        }
    }
    // Last, so its outline is not covered by neighbors.
    if let Some(layer) = highlighted {
        let color = rgb(&HIGHLIGHT_STYLE);
        for poly in &layer.polygons {
            draw_polygon(
                &root,
                fit,
                poly,
                color.mix(0.35).filled(),
                color.stroke_width(HIGHLIGHT_STYLE.weight as u32),
            )?;
        }
    }

    for anchor in layers.iter().filter_map(|l| l.anchor()) {
        root.draw(&Circle::new(fit.px(anchor), 2, BLACK.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_polygon<DB>(
    root: &DrawingArea<DB, Shift>,
    fit: &Fit,
    poly: &Polygon,
    fill: ShapeStyle,
    stroke: ShapeStyle,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let exterior: Vec<(i32, i32)> = poly.exterior.iter().map(|p| fit.px(*p)).collect();
    root.draw(&plotters::element::Polygon::new(exterior.clone(), fill))
        .map_err(|e| anyhow!("{:?}", e))?;
    for hole in &poly.holes {
        let pts: Vec<(i32, i32)> = hole.iter().map(|p| fit.px(*p)).collect();
        root.draw(&plotters::element::Polygon::new(pts.clone(), BACKGROUND.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&PathElement::new(close(pts), stroke))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    root.draw(&PathElement::new(close(exterior), stroke))
        .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn close(mut ring: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    ring
}
