//! egui front end: renders the page view model and routes clicks to the
//! controller.

use eframe::{App, Frame, egui};
use egui::{Color32, ColorImage, TextureHandle, TextureOptions};
use log::{info, warn};
use rfd::FileDialog;
use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};
use tokio::{
    runtime::Handle,
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
};

use crate::api::Backend;
use crate::config::ClientConfig;
use crate::controller::{Command, Effect, Outcome, PageController, SaveRequest};
use crate::dispatch;
use crate::model::{DownloadKind, SaveStatus, SaveTask};
use crate::platform::open_with_system;
use crate::saver::{self, SaveEvent};
use crate::thumbnail;
use crate::view::{DownloadButton, site_glyph};

/// Widget interactions collected during a frame, applied after drawing
enum UiAction {
    SelectFormat(Option<String>),
    PressDownload,
    ChooseType(DownloadKind),
    Preview,
    OpenPlayer(String),
}

/// Application state for the GUI
pub struct VideoPageApp {
    controller: PageController,
    backend: Arc<dyn Backend>,
    /// Client for file saves; no overall timeout, saves can be long
    save_client: reqwest::Client,
    download_dir: PathBuf,
    runtime: Handle,
    ctx: egui::Context,
    outcome_tx: UnboundedSender<Outcome>,
    outcome_rx: UnboundedReceiver<Outcome>,
    /// Texture for the info panel, keyed by its source URL
    thumbnail: Option<(String, TextureHandle)>,
    /// Incoming thumbnail fetch results (source URL, image)
    thumbnail_results: Arc<Mutex<Vec<(String, ColorImage)>>>,
    saves: Vec<SaveTask>,
    /// Progress channels for each save id
    save_rxs: HashMap<u64, UnboundedReceiver<SaveEvent>>,
    next_save_id: u64,
}

impl VideoPageApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: &ClientConfig,
        backend: Arc<dyn Backend>,
        save_client: reqwest::Client,
        runtime: Handle,
    ) -> Self {
        let (outcome_tx, outcome_rx) = unbounded_channel();
        let mut app = Self {
            controller: PageController::new(config.error_timeout),
            backend,
            save_client,
            download_dir: config.download_dir.clone(),
            runtime,
            ctx: cc.egui_ctx.clone(),
            outcome_tx,
            outcome_rx,
            thumbnail: None,
            thumbnail_results: Arc::new(Mutex::new(Vec::new())),
            saves: Vec::new(),
            save_rxs: HashMap::new(),
            next_save_id: 1,
        };
        let command = app.controller.load_sites();
        app.run(command);
        app
    }

    /// Runs a controller command on the runtime; the outcome comes back
    /// through the outcome channel.
    fn run(&self, command: Command) {
        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let outcome = dispatch::execute(backend.as_ref(), command).await;
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::LoadThumbnail(url) => self.load_thumbnail(url),
            Effect::Save(request) => self.start_save(request),
        }
    }

    fn load_thumbnail(&self, url: String) {
        let results = Arc::clone(&self.thumbnail_results);
        let ctx = self.ctx.clone();
        self.runtime.spawn_blocking(move || match thumbnail::fetch_thumbnail(&url) {
            Ok(img) => {
                if let Ok(mut pending) = results.lock() {
                    pending.push((url, img));
                }
                ctx.request_repaint();
            }
            Err(err) => warn!("thumbnail {url} unavailable: {err}"),
        });
    }

    /// Asks where to put the file, then streams it there.
    fn start_save(&mut self, request: SaveRequest) {
        if let Err(err) = std::fs::create_dir_all(&self.download_dir) {
            warn!("cannot create {}: {err}", self.download_dir.display());
        }
        let suggested = saver::sanitize_filename(&request.filename);
        let Some(dest) = FileDialog::new()
            .set_directory(&self.download_dir)
            .set_file_name(&suggested)
            .save_file()
        else {
            info!("save of \"{}\" cancelled", request.filename);
            return;
        };

        let id = self.next_save_id;
        self.next_save_id += 1;
        let (tx, rx) = unbounded_channel();
        self.save_rxs.insert(id, rx);
        self.saves.push(SaveTask::new(id, request.filename, dest.clone()));

        let client = self.save_client.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            saver::run_save(client, request.source, dest, tx).await;
            ctx.request_repaint();
        });
    }

    fn poll_saves(&mut self) {
        for (id, rx) in self.save_rxs.iter_mut() {
            while let Ok(event) = rx.try_recv() {
                let Some(task) = self.saves.iter_mut().find(|t| t.id == *id) else {
                    continue;
                };
                match event {
                    SaveEvent::Progress { received, total } => {
                        task.received = received;
                        task.total = total;
                    }
                    SaveEvent::Finished(path) => {
                        task.path = path;
                        task.status = SaveStatus::Done;
                    }
                    SaveEvent::Failed(reason) => task.status = SaveStatus::Failed(reason),
                }
            }
        }
    }

    /// Uploads finished thumbnails, dropping those for a video no longer shown.
    fn poll_thumbnails(&mut self, ctx: &egui::Context) {
        let Ok(mut pending) = self.thumbnail_results.lock() else {
            return;
        };
        for (url, img) in pending.drain(..) {
            if self.controller.view().wants_thumbnail(&url) {
                let tex = ctx.load_texture(&url, img, TextureOptions::default());
                self.thumbnail = Some((url, tex));
            }
        }
    }

    fn saves_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Saved Files");
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let mut to_remove = vec![];

                for task in &self.saves {
                    let status_text = match &task.status {
                        SaveStatus::Saving => "⬇️ Saving".to_string(),
                        SaveStatus::Done => "✅ Done".to_string(),
                        SaveStatus::Failed(reason) => format!("⚠ {reason}"),
                    };
                    ui.group(|ui| {
                        ui.label(&task.title);
                        ui.label(status_text);
                        ui.add(egui::ProgressBar::new(task.fraction()).show_percentage());
                        ui.small(task.size_label());
                        if task.status != SaveStatus::Saving {
                            ui.horizontal(|ui| {
                                if task.status == SaveStatus::Done && ui.button("Open Folder").clicked() {
                                    if let Some(folder) = task.path.parent() {
                                        open_with_system(folder.display().to_string());
                                    }
                                }
                                if ui.add(egui::Button::new("❌").fill(Color32::RED)).clicked() {
                                    to_remove.push(task.id);
                                }
                            });
                        }
                    });
                }

                if !to_remove.is_empty() {
                    self.saves.retain(|t| !to_remove.contains(&t.id));
                    for id in to_remove {
                        self.save_rxs.remove(&id);
                    }
                }
            });
    }

    fn page_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Video Downloader");

        let sites = &self.controller.view().sites;
        if !sites.is_empty() {
            ui.horizontal_wrapped(|ui| {
                ui.label("Supported:");
                for site in sites {
                    ui.label(format!("{} {}", site_glyph(&site.icon), site.name));
                }
            });
        }
        ui.separator();

        ui.label("Paste video URL:");
        let mut submitted = false;
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(self.controller.url_input_mut());
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submitted = true;
            }
            if ui.button("Fetch").clicked() {
                submitted = true;
            }
        });
        if submitted {
            if let Some(command) = self.controller.submit() {
                self.run(command);
            }
        }

        let view = self.controller.view().clone();
        let mut actions = Vec::new();

        if view.spinner {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Working…");
            });
        }
        if let Some(banner) = &view.banner {
            ui.colored_label(Color32::from_rgb(230, 80, 80), banner.text.as_str());
        }

        if let Some(info) = &view.info {
            ui.group(|ui| {
                let texture = self
                    .thumbnail
                    .as_ref()
                    .filter(|(url, _)| *url == info.thumbnail)
                    .map(|(_, tex)| tex);
                let preview = match texture {
                    Some(tex) => ui.add(egui::Image::new(tex).max_width(320.0).sense(egui::Sense::click())),
                    None => ui.add(egui::Label::new("▶ Preview").sense(egui::Sense::click())),
                };
                if preview.on_hover_text("Play inline").clicked() {
                    actions.push(UiAction::Preview);
                }

                ui.strong(info.title.as_str());
                ui.label(info.duration_label.as_str());

                let mut selected = view.formats.selected().map(str::to_owned);
                egui::ComboBox::from_id_source("format_select")
                    .selected_text(view.formats.selected_label())
                    .show_ui(ui, |ui| {
                        for (index, (value, label)) in view.formats.entries().into_iter().enumerate() {
                            let value = (!value.is_empty()).then(|| value.to_string());
                            let response = ui.selectable_value(&mut selected, value, label);
                            // Entry 0 is the placeholder
                            if let Some(option) = index.checked_sub(1).and_then(|i| view.formats.options().get(i)) {
                                response.on_hover_text(option.details());
                            }
                        }
                    });
                if selected.as_deref() != view.formats.selected() {
                    actions.push(UiAction::SelectFormat(selected));
                }

                if view.download_button != DownloadButton::Hidden {
                    let enabled = view.download_button == DownloadButton::Enabled;
                    if ui.add_enabled(enabled, egui::Button::new("⬇ Download")).clicked() {
                        actions.push(UiAction::PressDownload);
                    }
                }

                if view.options_visible {
                    ui.horizontal(|ui| {
                        for kind in DownloadKind::ALL {
                            if ui.button(kind.label()).clicked() {
                                actions.push(UiAction::ChooseType(kind));
                            }
                        }
                    });
                }
            });
        }

        if let Some(player) = &view.player {
            ui.group(|ui| {
                ui.label("Inline player");
                ui.monospace(player.source.as_str());
                if ui.button("▶ Open in player").clicked() {
                    actions.push(UiAction::OpenPlayer(player.source.clone()));
                }
            });
        }

        let now = Instant::now();
        for action in actions {
            match action {
                UiAction::SelectFormat(format_id) => self.controller.select_format(format_id.as_deref()),
                UiAction::PressDownload => self.controller.press_download(),
                UiAction::ChooseType(kind) => {
                    if let Some(command) = self.controller.choose_download_type(kind, now) {
                        self.run(command);
                    }
                }
                UiAction::Preview => self.controller.click_preview(),
                UiAction::OpenPlayer(source) => open_with_system(source),
            }
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for VideoPageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if let Some(effect) = self.controller.apply(outcome, now) {
                self.perform(effect);
            }
        }
        self.controller.tick(now);
        self.poll_saves();
        self.poll_thumbnails(ctx);

        egui::SidePanel::right("saves_panel").show(ctx, |ui| self.saves_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.page_ui(ui));

        // Banner expiry and save progress need periodic repaints
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
