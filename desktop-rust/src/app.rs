use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use image::ImageReader;

use crate::io;
use crate::model::{ThumbData, UiMessage};
use text_detector_common::{render, Applied, Failure, ImageRef, Screen};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];
const THUMB_SIZE: [u32; 2] = [300, 200];
const BUTTON_GREEN: Color32 = Color32::from_rgb(76, 175, 80);

pub struct DesktopApp {
    screen: Screen,
    capturing: bool,
    recognizing: usize,
    tx: Sender<UiMessage>,
    rx: Receiver<UiMessage>,
    thumbs: HashMap<String, egui::TextureHandle>,
    thumb_rx: Receiver<ThumbData>,
    thumb_tx: Sender<ThumbData>,
    thumb_inflight: HashSet<String>,
    thumb_failed: HashSet<String>,
    pending_thumbs: Vec<ThumbData>,
}

impl DesktopApp {
    fn load_photo(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            // キャンセル
            return;
        };
        match ImageRef::from_path(&path) {
            Ok(image) => self.start_recognition(image),
            Err(err) => {
                self.screen.report(Failure::CaptureUnavailable(err.to_string()));
            }
        }
    }

    fn capture_photo(&mut self) {
        let sender = self.tx.clone();
        self.capturing = true;

        std::thread::spawn(move || {
            let result = io::acquire_capture().map_err(|err| format!("{err:#}"));
            let _ = sender.send(UiMessage::Acquired(result));
        });
    }

    fn start_recognition(&mut self, image: ImageRef) {
        let generation = self.screen.begin_recognition();
        let sender = self.tx.clone();
        self.recognizing += 1;
        tracing::info!(%image, generation = generation.value(), "recognition started");

        std::thread::spawn(move || {
            let result = io::recognize(&image).map_err(|err| format!("{err:#}"));
            let _ = sender.send(UiMessage::Recognized { generation, image, result });
        });
    }

    fn request_thumbnail(&mut self, image: &ImageRef) {
        let uri = image.as_str();
        if self.thumbs.contains_key(uri) || self.thumb_inflight.contains(uri) || self.thumb_failed.contains(uri) {
            return;
        }
        self.thumb_inflight.insert(uri.to_string());
        let sender = self.thumb_tx.clone();
        let uri = uri.to_string();
        let path = image.to_path();

        std::thread::spawn(move || {
            let decoded = ImageReader::open(&path)
                .ok()
                .and_then(|r| r.with_guessed_format().ok())
                .and_then(|r| r.decode().ok());
            let data = match decoded {
                Some(decoded) => {
                    let thumb = decoded.thumbnail(THUMB_SIZE[0], THUMB_SIZE[1]);
                    ThumbData {
                        uri,
                        size: [thumb.width() as usize, thumb.height() as usize],
                        pixels: thumb.to_rgba8().into_raw(),
                    }
                }
                None => ThumbData { uri, size: [0, 0], pixels: Vec::new() },
            };
            let _ = sender.send(data);
        });
    }

    fn process_pending_thumbs(&mut self, ctx: &egui::Context) {
        let pending = std::mem::take(&mut self.pending_thumbs);
        for msg in pending {
            if msg.size[0] == 0 || msg.size[1] == 0 {
                self.thumb_failed.insert(msg.uri);
                continue;
            }
            let color_image = egui::ColorImage::from_rgba_unmultiplied(msg.size, &msg.pixels);
            let texture = ctx.load_texture(&msg.uri, color_image, egui::TextureOptions::default());
            self.thumbs.insert(msg.uri, texture);
        }
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.thumb_rx.try_recv() {
            self.thumb_inflight.remove(&msg.uri);
            self.pending_thumbs.push(msg);
        }

        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Acquired(result) => {
                    self.capturing = false;
                    let outcome = result
                        .map_err(Failure::CaptureUnavailable)
                        .and_then(|report| report.into_outcome());
                    match outcome {
                        Ok(Some(image)) => self.start_recognition(image),
                        Ok(None) => tracing::info!("capture cancelled"),
                        Err(failure) => {
                            self.screen.report(failure);
                        }
                    }
                }
                UiMessage::Recognized { generation, image, result } => {
                    self.recognizing = self.recognizing.saturating_sub(1);
                    let applied = match result {
                        Ok(blocks) => self.screen.apply_recognition(generation, image, &blocks),
                        Err(message) => self
                            .screen
                            .apply_failure(generation, Failure::RecognitionFailed(message)),
                    };
                    if applied == Applied::Stale {
                        tracing::debug!(generation = generation.value(), "stale recognition dropped");
                    }
                }
            }
        }
    }

    fn render_thumbnail(&mut self, ui: &mut egui::Ui, image: &ImageRef) {
        let size = egui::vec2(THUMB_SIZE[0] as f32, THUMB_SIZE[1] as f32);
        if let Some(texture) = self.thumbs.get(image.as_str()) {
            ui.add(egui::Image::new(texture).fit_to_exact_size(size).rounding(5.0));
            return;
        }

        let text = if self.thumb_failed.contains(image.as_str()) {
            "Preview unavailable"
        } else {
            self.request_thumbnail(image);
            "Loading..."
        };
        ui.allocate_ui_with_layout(size, egui::Layout::centered_and_justified(egui::Direction::LeftToRight), |ui| {
            ui.label(text);
        });
    }
}

fn action_button(label: &str, width: f32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label).strong().size(16.0).color(Color32::WHITE))
        .fill(BUTTON_GREEN)
        .rounding(10.0)
        .min_size(egui::vec2(width, 44.0))
}

pub fn configure_fonts(ctx: &egui::Context) {
    // 認識結果に日本語などが含まれても表示できるようにする
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("cjk_fallback".to_string(), FontData::from_owned(data));
            for family in [FontFamily::Proportional, FontFamily::Monospace] {
                fonts.families.entry(family).or_default().push("cjk_fallback".to_string());
            }
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let (thumb_tx, thumb_rx) = mpsc::channel();
        Self {
            screen: Screen::default(),
            capturing: false,
            recognizing: 0,
            tx,
            rx,
            thumbs: HashMap::new(),
            thumb_rx,
            thumb_tx,
            thumb_inflight: HashSet::new(),
            thumb_failed: HashSet::new(),
            pending_thumbs: Vec::new(),
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.capturing || self.recognizing > 0 || !self.thumb_inflight.is_empty() || !self.pending_thumbs.is_empty() {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.process_pending_thumbs(ctx);

        let view = render(&self.screen);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.heading(RichText::new("Text Detector").size(24.0).strong());
                ui.add_space(10.0);

                let width = ui.available_width();
                if ui.add(action_button("Capture photo", width)).clicked() {
                    self.capture_photo();
                }
                ui.add_space(6.0);
                if ui.add(action_button("Load photo", width)).clicked() {
                    self.load_photo();
                }

                if self.capturing {
                    ui.label(RichText::new("Waiting for camera...").color(Color32::from_gray(150)));
                }
                if self.recognizing > 0 {
                    ui.label(RichText::new("Recognizing text...").color(Color32::from_gray(150)));
                }

                if let Some(notice) = &view.notice {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(notice).color(Color32::from_rgb(246, 196, 69)));
                        if ui.small_button("Dismiss").clicked() {
                            self.screen.dismiss_notice();
                        }
                    });
                }

                ui.add_space(20.0);
                if let Some(image) = &view.thumbnail {
                    ui.vertical_centered(|ui| self.render_thumbnail(ui, image));
                }

                ui.add_space(10.0);
                for line in &view.lines {
                    ui.push_id(&line.key, |ui| {
                        ui.label(RichText::new(&line.text).size(15.0).strong());
                    });
                }
            });
        });
    }
}
