/*!
 * Desktop viewer for africa-atlas - interactive map of African countries
 *
 * - Satellite basemap locked to Africa, drag to pan, scroll to zoom
 * - Country boundaries with labels and flag markers, hover and selection styling
 * - Select a country from the dropdown, by clicking it, or by searching its name
 * - Sidebar with the country's demographics, economy and key sectors
 *
 * Platform support: Windows, macOS, Linux
 */

use africa_atlas::fetch::AtlasSource;
use africa_atlas::format::{FlagSize, flag_url};
use africa_atlas::geo::LatLng;
use africa_atlas::images::{HttpImageFetch, ImageCache, ImageLoader};
use africa_atlas::layers::{DEFAULT_STYLE, HIGHLIGHT_STYLE, HOVER_STYLE, LayerStyle, Polygon};
use africa_atlas::map_view::{MapView, TileSource};
use africa_atlas::render::{CountryDetails, SIDEBAR_PLACEHOLDER, Sidebar};
use africa_atlas::viewer::LoadState;
use africa_atlas::{Client, Config, Viewer};
use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, TextureHandle, Vec2};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<(), eframe::Error> {
    let cfg = Config::load().unwrap_or_else(|err| {
        eprintln!("Falling back to default configuration: {:#}", err);
        Config::default()
    });
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cfg.log_level))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0])
            .with_title("African Countries - africa-atlas"),
        ..Default::default()
    };

    eframe::run_native(
        "Africa Atlas",
        options,
        Box::new(move |_cc| {
            AtlasApp::new(cfg)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(Into::into)
        }),
    )
}

/// Main application state
struct AtlasApp {
    viewer: Viewer,
    tiles: TileSource,

    // Tiles and flags, keyed by URL
    images: ImageLoader,
    textures: ImageCache<TextureHandle>,

    // Input fields
    search_query: String,
    /// Country whose popup is open after a map click.
    popup: Option<String>,
}

impl AtlasApp {
    fn new(cfg: Config) -> anyhow::Result<Self> {
        let client = Client::new(&cfg)?;
        let source: Arc<dyn AtlasSource> = Arc::new(client);
        let view = MapView::africa(800.0, 600.0, cfg.max_zoom);
        let images = ImageLoader::new(Arc::new(HttpImageFetch::new(&cfg)?), cfg.image_workers);

        Ok(Self {
            viewer: Viewer::new(source, view),
            tiles: TileSource::from_config(&cfg),
            images,
            textures: ImageCache::new(cfg.image_cache_capacity),
            search_query: String::new(),
            popup: None,
        })
    }

    /// Texture for `url`, queueing the download when it is not cached.
    fn texture(&mut self, url: &str) -> Option<TextureHandle> {
        if let Some(tex) = self.textures.get(url) {
            return Some(tex.clone());
        }
        self.images.request(url);
        None
    }

    fn check_image_results(&mut self, ctx: &egui::Context) {
        for (url, result) in self.images.poll() {
            if let Ok(img) = result {
                let color = egui::ColorImage::from_rgba_unmultiplied(
                    [img.width as usize, img.height as usize],
                    &img.rgba,
                );
                let tex = ctx.load_texture(url.clone(), color, egui::TextureOptions::LINEAR);
                self.textures.insert(url, tex);
            }
        }
    }

    fn side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("African Countries");
        ui.add_space(8.0);

        // Country dropdown
        let selected_text = self
            .viewer
            .selected()
            .and_then(|code| self.viewer.layers().get(code))
            .map(|l| l.name.clone())
            .unwrap_or_else(|| africa_atlas::directory::PLACEHOLDER_OPTION.to_string());
        let mut choice: Option<Option<String>> = None;
        egui::ComboBox::from_id_salt("country-select")
            .selected_text(selected_text)
            .width(ui.available_width())
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(
                        self.viewer.selected().is_none(),
                        africa_atlas::directory::PLACEHOLDER_OPTION,
                    )
                    .clicked()
                {
                    choice = Some(None);
                }
                for entry in self.viewer.directory() {
                    let is_selected = self.viewer.selected() == Some(entry.code.as_str());
                    if ui.selectable_label(is_selected, &entry.name).clicked() {
                        choice = Some(Some(entry.code.clone()));
                    }
                }
            });
        if let Some(choice) = choice {
            self.viewer.select(choice.as_deref());
        }

        ui.add_space(6.0);

        // Search
        ui.horizontal(|ui| {
            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.search_query)
                    .hint_text("Search country...")
                    .desired_width(ui.available_width() - 70.0),
            );
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Search").clicked() || submitted {
                let query = self.search_query.clone();
                self.viewer.search(&query);
            }
        });

        match self.viewer.map_state() {
            LoadState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading map data...");
                });
            }
            LoadState::Failed(_) => {
                ui.colored_label(Color32::RED, "Could not load map data.");
            }
            LoadState::Ready => {}
        }

        if let Some(status) = self.viewer.status().map(str::to_owned) {
            ui.horizontal(|ui| {
                ui.colored_label(Color32::from_rgb(200, 120, 0), status);
                if ui.small_button("x").on_hover_text("Dismiss").clicked() {
                    self.viewer.clear_status();
                }
            });
        }

        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            let sidebar = self.viewer.sidebar().clone();
            match &sidebar {
                Sidebar::Placeholder => {
                    ui.label(SIDEBAR_PLACEHOLDER);
                }
                Sidebar::Details(details) => self.country_details(ui, details),
            }
        });
    }

    fn country_details(&mut self, ui: &mut egui::Ui, d: &CountryDetails) {
        ui.horizontal(|ui| {
            ui.heading(&d.name);
            if let Some(url) = &d.flag_url
                && let Some(tex) = self.texture(url)
            {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.image((tex.id(), Vec2::new(64.0, 48.0)));
                });
            }
        });
        ui.add_space(6.0);

        egui::Grid::new("country-details")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (label, value) in d.rows().iter().take(8) {
                    ui.strong(format!("{}:", label));
                    ui.label(*value);
                    ui.end_row();
                }
            });

        if !d.sectors.is_empty() {
            ui.add_space(10.0);
            ui.label(egui::RichText::new("Key Economic Sectors:").heading().size(15.0));
            for sector in &d.sectors {
                ui.add_space(4.0);
                ui.strong(&sector.name);
                ui.add(
                    egui::ProgressBar::new((sector.bar_percent / 100.0) as f32)
                        .desired_width(ui.available_width()),
                );
                ui.small(&sector.caption);
            }
        }
    }

    fn map_panel(&mut self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.viewer
            .view_mut()
            .resize(f64::from(rect.width()), f64::from(rect.height()));

        // Pan
        if response.dragged() {
            let d = response.drag_delta();
            self.viewer.view_mut().pan_by(f64::from(d.x), f64::from(d.y));
        }

        // Zoom around the pointer (wheel and pinch)
        if let Some(pointer) = response.hover_pos() {
            let (scroll, pinch) = ui.input(|i| (i.smooth_scroll_delta.y, i.zoom_delta()));
            let mut delta = f64::from(scroll) / 200.0;
            if (pinch - 1.0).abs() > f32::EPSILON {
                delta += f64::from(pinch).log2();
            }
            if delta.abs() > f64::EPSILON {
                let local = pointer - rect.min;
                self.viewer
                    .view_mut()
                    .zoom_around(f64::from(local.x), f64::from(local.y), delta);
            }
        }

        // Hover and click
        let to_geo = |view: &MapView, p: Pos2| {
            let local = p - rect.min;
            view.screen_to_latlng(f64::from(local.x), f64::from(local.y))
        };
        let hover = response.hover_pos().map(|p| to_geo(self.viewer.view(), p));
        self.viewer.hover(hover);
        if response.clicked()
            && let Some(p) = response.interact_pointer_pos()
        {
            let at = to_geo(self.viewer.view(), p);
            self.popup = self.viewer.click(at);
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(20, 30, 45));

        self.paint_tiles(&painter, rect);
        self.paint_boundaries(&painter, rect);
        self.paint_markers(&painter, rect);
        self.show_popup(ui.ctx(), rect);

        // Attribution (required by the tile provider)
        let galley = painter.layout_no_wrap(
            self.tiles.attribution.clone(),
            FontId::proportional(10.0),
            Color32::from_gray(40),
        );
        let text_rect = Align2::RIGHT_BOTTOM
            .anchor_size(rect.right_bottom() - Vec2::new(2.0, 2.0), galley.size())
            .expand(2.0);
        painter.rect_filled(text_rect, 2.0, Color32::from_white_alpha(200));
        painter.galley(text_rect.min + Vec2::splat(2.0), galley, Color32::from_gray(40));

        if let Some(name) = self
            .viewer
            .hovered()
            .and_then(|code| self.viewer.layers().get(code))
            .map(|l| l.name.clone())
        {
            response.on_hover_text(egui::RichText::new(name).strong());
        }
    }

    fn paint_tiles(&mut self, painter: &egui::Painter, rect: Rect) {
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        let placements = self.viewer.view().visible_tiles(self.tiles.max_zoom);
        for t in placements {
            let min = rect.min + Vec2::new(t.screen_x as f32, t.screen_y as f32);
            let tile_rect = Rect::from_min_size(min, Vec2::splat(t.size as f32));
            let url = self.tiles.url(&t.tile);
            match self.texture(&url) {
                Some(tex) => {
                    painter.image(tex.id(), tile_rect, uv, Color32::WHITE);
                }
                None => {
                    painter.rect_filled(tile_rect, 0.0, Color32::from_gray(60));
                }
            }
        }
    }

    fn paint_boundaries(&self, painter: &egui::Painter, rect: Rect) {
        let view = self.viewer.view();
        let layers = self.viewer.layers();

        for polygons in layers.decorative() {
            paint_polygons(painter, rect, view, polygons, &DEFAULT_STYLE);
        }
        for layer in layers.iter().filter(|l| l.style != HIGHLIGHT_STYLE) {
            paint_polygons(painter, rect, view, &layer.polygons, &layer.style);
        }
        // Drawn last so neighbors do not cover the outline.
        if let Some(layer) = layers.highlighted() {
            paint_polygons(painter, rect, view, &layer.polygons, &HIGHLIGHT_STYLE);
        }
        if let Some(layer) = self.viewer.hovered().and_then(|c| layers.get(c)) {
            paint_polygons(painter, rect, view, &layer.polygons, &HOVER_STYLE);
        }
    }

    /// Compact card next to the clicked country, once its profile is in.
    fn show_popup(&self, ctx: &egui::Context, rect: Rect) {
        let Some(code) = self.popup.as_deref() else {
            return;
        };
        let (Some(layer), Some(profile)) =
            (self.viewer.layers().get(code), self.viewer.cached_profile(code))
        else {
            return;
        };
        let sidebar = Sidebar::from_profile(Some(profile));
        let (Some(anchor), Some(d)) = (layer.anchor(), sidebar.details()) else {
            return;
        };
        let pos = screen_pos(rect, self.viewer.view(), anchor);
        if !rect.contains(pos) {
            return;
        }
        egui::Area::new(egui::Id::new("country-popup"))
            .fixed_pos(pos + Vec2::new(12.0, -12.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.strong(&d.name);
                    ui.label(format!("Capital: {}", d.capital));
                    ui.label(format!("Population: {}", d.population));
                    ui.label(format!("GDP: {}", d.gdp));
                });
            });
    }

    fn paint_markers(&mut self, painter: &egui::Painter, rect: Rect) {
        let markers: Vec<(Pos2, String, Option<String>)> = self
            .viewer
            .layers()
            .iter()
            .filter_map(|l| {
                let anchor = l.anchor()?;
                Some((
                    screen_pos(rect, self.viewer.view(), anchor),
                    l.name.clone(),
                    flag_url(&l.code, FlagSize::Marker),
                ))
            })
            .filter(|(pos, _, _)| rect.expand(40.0).contains(*pos))
            .collect();

        let (w, h) = FlagSize::Marker.pixels();
        let flag_size = Vec2::new(w as f32, h as f32);
        for (pos, name, url) in markers {
            if let Some(url) = url
                && let Some(tex) = self.texture(&url)
            {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(tex.id(), Rect::from_center_size(pos, flag_size), uv, Color32::WHITE);
            }
            let label_pos = pos + Vec2::new(0.0, flag_size.y / 2.0 + 2.0);
            let font = FontId::proportional(12.0);
            painter.text(
                label_pos + Vec2::splat(1.0),
                Align2::CENTER_TOP,
                &name,
                font.clone(),
                Color32::BLACK,
            );
            painter.text(label_pos, Align2::CENTER_TOP, &name, font, Color32::WHITE);
        }
    }
}

fn screen_pos(rect: Rect, view: &MapView, p: LatLng) -> Pos2 {
    let (x, y) = view.latlng_to_screen(p);
    rect.min + Vec2::new(x as f32, y as f32)
}

fn paint_polygons(
    painter: &egui::Painter,
    rect: Rect,
    view: &MapView,
    polygons: &[Polygon],
    style: &LayerStyle,
) {
    let stroke = Stroke::new(
        style.weight,
        Color32::from_rgb(style.color.0, style.color.1, style.color.2),
    );
    for poly in polygons {
        for ring in poly.rings() {
            let points: Vec<Pos2> = ring.iter().map(|p| screen_pos(rect, view, *p)).collect();
            painter.add(Shape::closed_line(points, stroke));
        }
    }
}

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished background requests
        self.viewer.poll();
        self.check_image_results(ctx);

        // Keep polling while anything is in flight
        if self.viewer.in_flight() > 0 || self.images.pending() > 0 {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(330.0)
            .show(ctx, |ui| self.side_panel(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.map_panel(ui));
    }
}
