use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};

use crate::io::{decode_image, open_review};
use crate::model::Cursor;
use report_ai_common::{ExtractionRecord, ReviewEntry, ReviewStore};

const RESULT_COLUMNS: &[&str] = &["Test Name", "Value", "Unit", "Reference"];

pub struct ViewerApp {
    store: ReviewStore,
    entries: Vec<ReviewEntry>,
    cursor: Cursor,
    records: HashMap<String, Option<ExtractionRecord>>,
    textures: HashMap<String, egui::TextureHandle>,
    missing: HashSet<String>,
    inflight: HashSet<String>,
    pending: Vec<ImageData>,
    image_rx: Receiver<ImageData>,
    image_tx: mpsc::Sender<ImageData>,
    status: String,
}

struct ImageData {
    stem: String,
    size: [usize; 2],
    pixels: Vec<u8>,
}

impl ViewerApp {
    pub fn new(records_dir: &Path, images_dir: &Path) -> anyhow::Result<Self> {
        let (store, entries) = open_review(records_dir, images_dir)?;
        let (image_tx, image_rx) = mpsc::channel();
        let cursor = Cursor::new(entries.len());

        Ok(Self {
            store,
            entries,
            cursor,
            records: HashMap::new(),
            textures: HashMap::new(),
            missing: HashSet::new(),
            inflight: HashSet::new(),
            pending: Vec::new(),
            image_rx,
            image_tx,
            status: String::new(),
        })
    }

    fn ensure_record(&mut self, stem: &str) {
        if self.records.contains_key(stem) {
            return;
        }
        match self.store.load(stem) {
            Ok(record) => {
                self.records.insert(stem.to_string(), Some(record));
            }
            Err(err) => {
                self.status = format!("Load failed: {err}");
                self.records.insert(stem.to_string(), None);
            }
        }
    }

    fn request_image(&mut self, stem: &str) {
        if self.textures.contains_key(stem)
            || self.missing.contains(stem)
            || self.inflight.contains(stem)
        {
            return;
        }
        self.inflight.insert(stem.to_string());
        let sender = self.image_tx.clone();
        let store = self.store.clone();
        let stem_owned = stem.to_string();

        std::thread::spawn(move || {
            let decoded = store
                .image_for(&stem_owned)
                .ok()
                .and_then(|bytes| decode_image(&bytes).ok());
            let message = match decoded {
                Some((size, pixels)) => ImageData {
                    stem: stem_owned,
                    size,
                    pixels,
                },
                None => ImageData {
                    stem: stem_owned,
                    size: [0, 0],
                    pixels: Vec::new(),
                },
            };
            let _ = sender.send(message);
        });
    }

    fn poll_images(&mut self) {
        while let Ok(msg) = self.image_rx.try_recv() {
            self.inflight.remove(&msg.stem);
            self.pending.push(msg);
        }
    }

    fn process_pending(&mut self, ctx: &egui::Context) {
        let pending = std::mem::take(&mut self.pending);
        for msg in pending {
            if msg.size[0] == 0 || msg.size[1] == 0 {
                self.missing.insert(msg.stem);
                continue;
            }
            let color_image = egui::ColorImage::from_rgba_unmultiplied(msg.size, &msg.pixels);
            let texture = ctx.load_texture(&msg.stem, color_image, egui::TextureOptions::default());
            self.textures.insert(msg.stem, texture);
        }
    }

    fn render_image_pane(&self, ui: &mut egui::Ui, entry: &ReviewEntry) {
        ui.heading("Image");
        ui.label(&entry.stem);
        ui.separator();

        if let Some(texture) = self.textures.get(&entry.stem) {
            let size = ui.available_size();
            ui.add(
                egui::Image::new(texture)
                    .max_size(size)
                    .maintain_aspect_ratio(true),
            );
        } else if self.missing.contains(&entry.stem) {
            ui.label(RichText::new("Image missing").color(Color32::from_rgb(246, 196, 69)));
        } else {
            ui.label("Loading...");
        }
    }

    fn render_record_pane(&self, ui: &mut egui::Ui, entry: &ReviewEntry) {
        match self.records.get(&entry.stem) {
            Some(Some(record)) => {
                ui.heading("Report Title");
                let title = if record.report_title.is_empty() {
                    "-"
                } else {
                    record.report_title.as_str()
                };
                ui.label(RichText::new(title).strong());
                ui.separator();

                ui.heading("Test Results");
                if record.test_results.is_empty() {
                    ui.label("No rows extracted.");
                    return;
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    egui::Grid::new("test_results")
                        .striped(true)
                        .min_col_width(80.0)
                        .show(ui, |ui| {
                            for column in RESULT_COLUMNS {
                                ui.label(RichText::new(*column).strong().color(Color32::from_gray(200)));
                            }
                            ui.end_row();

                            for row in &record.test_results {
                                for value in [&row.test_name, &row.value, &row.unit, &row.range] {
                                    ui.label(if value.is_empty() { "-" } else { value.as_str() });
                                }
                                ui.end_row();
                            }
                        });
                });
            }
            Some(None) => {
                ui.label("Record could not be loaded.");
            }
            None => {
                ui.label("Loading...");
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.inflight.is_empty() || !self.pending.is_empty() {
            ctx.request_repaint();
        }
        self.poll_images();
        self.process_pending(ctx);

        let advance_key = ctx.input(|i| i.key_pressed(egui::Key::ArrowRight));

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Medical Report Viewer");
                ui.separator();
                let next = ui
                    .add_enabled(!self.cursor.is_empty(), egui::Button::new("Next"))
                    .clicked();
                if next || advance_key {
                    self.cursor.advance();
                }
                if !self.cursor.is_empty() {
                    ui.label(format!("{} / {}", self.cursor.index() + 1, self.cursor.len()));
                }
                if !self.status.is_empty() {
                    ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                }
            });
        });

        if self.entries.is_empty() {
            // Terminal empty state: never index into the list.
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label("No records to show.");
                });
            });
            return;
        }

        let entry = self.entries[self.cursor.index()].clone();
        self.ensure_record(&entry.stem);
        if entry.has_image {
            self.request_image(&entry.stem);
        } else {
            self.missing.insert(entry.stem.clone());
        }

        egui::SidePanel::left("image")
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                self.render_image_pane(ui, &entry);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_record_pane(ui, &entry);
        });
    }
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\msyh.ttc",
        r"C:\Windows\Fonts\simsun.ttc",
        r"C:\Windows\Fonts\meiryo.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("cjk_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .insert(0, "cjk_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .insert(0, "cjk_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}
