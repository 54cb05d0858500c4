//! Main post studio application.
//!
//! `PostStudio` implements `eframe::App`. Each frame it drains finished
//! requests, renders the session, and turns button presses into
//! [`Intent`]s that are applied once rendering is done.

use super::rendering::{card, color_swatch, error_banner, image_frame, sync_texture};
use super::state::{Intent, ViewState};
use crate::catalog::{AspectRatio, ColorPalette, Font, QuotePlacement};
use crate::error::{AppError, Result};
use crate::export::{hashtag_line, save_post};
use crate::gateway::SharedGateway;
use crate::prompt::PRESET_PROMPTS;
use crate::workflow::{Completion, Mode, Phase, Stage, Ticket, Workflow, execute};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Instant;

pub struct PostStudio {
    workflow: Workflow,
    runtime: tokio::runtime::Runtime,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    view: ViewState,
}

impl PostStudio {
    /// Creates the studio.
    ///
    /// # Arguments
    /// * `gateway` - Backend used for every request
    /// * `download_dir` - Directory the finished post is saved into
    pub fn new(gateway: SharedGateway, download_dir: PathBuf) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|e| AppError::ui(format!("Failed to create async runtime: {}", e)))?;
        let (tx, rx) = channel();

        Ok(Self {
            workflow: Workflow::new(gateway),
            runtime,
            tx,
            rx,
            view: ViewState::new(download_dir),
        })
    }

    /// Runs a ticket in the background and wakes the UI when it finishes.
    fn dispatch(&self, ticket: Ticket, ctx: &egui::Context) {
        let gateway = self.workflow.gateway();
        let tx = self.tx.clone();
        let ctx = ctx.clone();

        self.runtime.spawn(async move {
            let completion = execute(gateway.as_ref(), ticket).await;
            if tx.send(completion).is_err() {
                tracing::debug!("UI closed before request finished");
            }
            ctx.request_repaint();
        });
    }

    /// Applies finished requests from the background tasks.
    fn process_completions(&mut self) {
        while let Ok(completion) = self.rx.try_recv() {
            self.workflow.session_mut().apply(completion);
        }
    }

    fn handle(&mut self, intent: Intent, ctx: &egui::Context) {
        tracing::debug!(?intent, "Handling intent");
        self.view.notice = None;

        let ticket = match intent {
            Intent::SelectMode(mode) => {
                self.workflow.session_mut().select_mode(mode);
                None
            }
            Intent::Upload(path) => Some(Ok(self.workflow.session_mut().begin_upload(path))),
            Intent::Generate => {
                let prompt = self.view.generation_prompt.clone();
                let ratio = self.view.aspect_ratio;
                Some(self.workflow.session_mut().begin_generate(&prompt, ratio))
            }
            Intent::Edit => {
                let style = self.workflow.style();
                Some(self.workflow.session_mut().begin_edit(style))
            }
            Intent::GenerateQuote => Some(self.workflow.session_mut().begin_quote()),
            Intent::GenerateHashtags => Some(self.workflow.session_mut().begin_hashtags()),
            Intent::EditAgain => {
                let _ = self.workflow.edit_again();
                None
            }
            Intent::Download => {
                self.download();
                None
            }
            Intent::CopyHashtags => {
                self.copy_hashtags();
                None
            }
            Intent::StartOver => {
                self.workflow.start_over();
                self.view.upload_path.clear();
                None
            }
            Intent::DismissError => {
                self.workflow.session_mut().dismiss_error();
                None
            }
        };

        // Precondition failures are already on the session's banner
        if let Some(Ok(ticket)) = ticket {
            self.dispatch(ticket, ctx);
        }
    }

    fn download(&mut self) {
        let session = self.workflow.session();
        match save_post(session.edited_image(), &self.view.download_dir) {
            Ok(path) => self.view.notice = Some(format!("Saved to {}", path.display())),
            Err(e) => self.workflow.session_mut().report(&e),
        }
    }

    fn copy_hashtags(&mut self) {
        let tags = self.workflow.session().hashtags();
        if tags.is_empty() {
            return;
        }
        let line = hashtag_line(tags);
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(line)) {
            Ok(()) => self.view.copied.raise(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to copy to clipboard");
                self.workflow
                    .session_mut()
                    .report(&AppError::ui(format!("Could not access clipboard: {}", e)));
            }
        }
    }

    fn render_mode_selector(&self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        card(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("How would you like to start?");
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("✨ Generate Image with AI").clicked() {
                        intents.push(Intent::SelectMode(Mode::Generate));
                    }
                    if ui.button("⬆ Edit My Own Image").clicked() {
                        intents.push(Intent::SelectMode(Mode::Upload));
                    }
                });
            });
        });
    }

    fn render_uploader(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let uploading = self.workflow.session().phase() == Phase::Uploading;
        card(ui, |ui| {
            ui.heading("Upload an image to get started");
            ui.weak("PNG, JPG, GIF or WEBP. Drop a file on the window or enter its path.");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let field = ui.add(
                    egui::TextEdit::singleline(&mut self.view.upload_path)
                        .hint_text("/path/to/photo.jpg")
                        .desired_width(360.0),
                );
                let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let open = ui.add_enabled(!uploading, egui::Button::new("Open"));
                if (open.clicked() || submitted) && !self.view.upload_path.trim().is_empty() {
                    intents.push(Intent::Upload(PathBuf::from(self.view.upload_path.trim())));
                }
                if uploading {
                    ui.spinner();
                }
            });
        });
    }

    fn render_generator(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let loading = self.workflow.session().is_loading(Stage::ImageGenerate);
        card(ui, |ui| {
            ui.label(egui::RichText::new("Describe the image you want to create").strong());
            ui.add(
                egui::TextEdit::multiline(&mut self.view.generation_prompt)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY)
                    .hint_text("e.g., 'A mystical forest with glowing mushrooms and a serene lake under a starry sky'"),
            );
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Aspect Ratio for Instagram").strong());
            ui.horizontal_wrapped(|ui| {
                for ratio in AspectRatio::ALL {
                    ui.selectable_value(&mut self.view.aspect_ratio, ratio, ratio.name());
                }
            });
            ui.add_space(8.0);
            let label = if loading { "Generating..." } else { "✨ Generate Image" };
            if ui.add_enabled(!loading, egui::Button::new(label)).clicked() {
                intents.push(Intent::Generate);
            }
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let mut style = self.workflow.style();
        let session = self.workflow.session_mut();
        let loading = session.loading();

        card(ui, |ui| {
            ui.label(egui::RichText::new("1. Describe your edits (Optional)").strong());
            let mut instruction = session.instruction().to_string();
            let edited = ui
                .add(
                    egui::TextEdit::multiline(&mut instruction)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY)
                        .hint_text("e.g., 'Add a retro filter' or 'Make the background blurry'"),
                )
                .changed();
            ui.horizontal_wrapped(|ui| {
                ui.weak("Or try a preset theme:");
                for preset in PRESET_PROMPTS {
                    if ui.small_button(preset.name).clicked() {
                        instruction = preset.prompt.to_string();
                        session.set_instruction(instruction.clone());
                    }
                }
            });
            if edited {
                session.set_instruction(instruction);
            }

            ui.separator();
            ui.label(egui::RichText::new("2. Add & Style Quote (Optional)").strong());
            let label = if loading.quote { "Generating..." } else { "❝ Generate Motivational Quote" };
            if ui.add_enabled(!loading.quote, egui::Button::new(label)).clicked() {
                intents.push(Intent::GenerateQuote);
            }

            if !session.quote().is_empty() {
                let mut quote = session.quote().to_string();
                if ui
                    .add(egui::TextEdit::multiline(&mut quote).desired_rows(2).desired_width(f32::INFINITY))
                    .changed()
                {
                    session.set_quote(quote);
                }

                ui.label("Position");
                ui.horizontal(|ui| {
                    for placement in QuotePlacement::ALL {
                        ui.selectable_value(&mut style.placement, placement, placement.name());
                    }
                });
                ui.label("Font");
                ui.horizontal_wrapped(|ui| {
                    for font in Font::ALL {
                        ui.selectable_value(&mut style.font, font, font.name());
                    }
                });
                ui.label("Color");
                ui.horizontal_wrapped(|ui| {
                    for palette in ColorPalette::ALL {
                        if color_swatch(ui, palette, style.palette == palette).clicked() {
                            style.palette = palette;
                        }
                    }
                });
            }

            ui.separator();
            ui.label(egui::RichText::new("3. Add Watermark (Optional)").strong());
            let mut watermark = session.watermark().to_string();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut watermark)
                        .hint_text("e.g., @yourhandle or yoursite.com")
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                session.set_watermark(watermark);
            }

            ui.separator();
            ui.label(egui::RichText::new("4. Create Your Post").strong());
            let label = if loading.image_edit { "Generating Image..." } else { "✨ Generate Post" };
            if ui.add_enabled(!loading.image_edit, egui::Button::new(label)).clicked() {
                intents.push(Intent::Edit);
            }
        });

        self.workflow.set_style(style);
    }

    fn render_results(&mut self, ui: &mut egui::Ui, intents: &mut Vec<Intent>) {
        let now = Instant::now();
        let copied = self.view.copied.is_up(now);
        if let Some(remaining) = self.view.copied.remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }

        let session = self.workflow.session();
        let loading = session.loading();
        let has_result = session.edited_image().is_some();

        card(ui, |ui| {
            ui.horizontal(|ui| {
                image_frame(ui, "Source Image", self.view.source_texture.as_ref(), false);
                image_frame(
                    ui,
                    "Generated Result",
                    self.view.result_texture.as_ref(),
                    loading.image_edit,
                );
            });

            if !session.quote().is_empty() && !has_result {
                ui.add_space(8.0);
                ui.label(egui::RichText::new(format!("\"{}\"", session.quote())).italics());
            }

            if has_result {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("✏ Edit Result").clicked() {
                        intents.push(Intent::EditAgain);
                    }
                    let label = if loading.hashtags { "Generating..." } else { "# Generate Hashtags" };
                    if ui.add_enabled(!loading.hashtags, egui::Button::new(label)).clicked() {
                        intents.push(Intent::GenerateHashtags);
                    }
                    if ui.button("⬇ Download Post").clicked() {
                        intents.push(Intent::Download);
                    }
                });
            }

            if loading.hashtags {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Finding trending hashtags...");
                });
            }

            if !session.hashtags().is_empty() {
                ui.separator();
                ui.label(egui::RichText::new("Trending Hashtags:").strong());
                ui.horizontal_wrapped(|ui| {
                    for tag in session.hashtags() {
                        ui.label(egui::RichText::new(format!("#{}", tag)).color(super::rendering::ACCENT));
                    }
                });
                ui.add_space(8.0);
                ui.label(egui::RichText::new("Ready to Post?").strong());
                ui.weak("Download your image and copy the hashtags, then head to Instagram or your favorite scheduling tool.");
                ui.horizontal(|ui| {
                    let label = if copied { "Copied!" } else { "⧉ Copy Hashtags" };
                    if ui.button(label).clicked() {
                        intents.push(Intent::CopyHashtags);
                    }
                    ui.hyperlink_to("Post on Instagram", "https://www.instagram.com");
                });
            }

            if let Some(notice) = &self.view.notice {
                ui.add_space(6.0);
                ui.weak(notice.as_str());
            }
        });
    }
}

impl eframe::App for PostStudio {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(egui::Visuals::dark());

        self.process_completions();

        // Files dropped on the window start a new upload
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });

        {
            let session = self.workflow.session();
            sync_texture(ctx, &mut self.view.source_texture, "source", session.working_image());
            sync_texture(ctx, &mut self.view.result_texture, "result", session.edited_image());
        }

        let mut intents: Vec<Intent> = dropped.into_iter().take(1).map(Intent::Upload).collect();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading(egui::RichText::new("AI Instagram Post Generator").size(28.0));
                    ui.weak("Create stunning, share-worthy posts in minutes.");
                });
                ui.add_space(12.0);

                if let Some(message) = self.workflow.session().error() {
                    if error_banner(ui, message) {
                        intents.push(Intent::DismissError);
                    }
                    ui.add_space(8.0);
                }

                let session = self.workflow.session();
                let has_image = session.working_image().is_some();
                match (session.mode(), has_image) {
                    (_, true) => {
                        ui.columns(2, |columns| {
                            self.render_controls(&mut columns[0], &mut intents);
                            self.render_results(&mut columns[1], &mut intents);
                        });
                        ui.add_space(8.0);
                        if ui.button("↺ Start over").clicked() {
                            intents.push(Intent::StartOver);
                        }
                    }
                    (None, false) => self.render_mode_selector(ui, &mut intents),
                    (Some(Mode::Upload), false) => self.render_uploader(ui, &mut intents),
                    (Some(Mode::Generate), false) => self.render_generator(ui, &mut intents),
                }
            });
        });

        for intent in intents {
            self.handle(intent, ctx);
        }
    }
}

/// Launches the studio window and blocks until it is closed.
pub fn run(gateway: SharedGateway, download_dir: PathBuf) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AI Post Studio")
            .with_inner_size([1200.0, 820.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let studio = PostStudio::new(gateway, download_dir)?;

    eframe::run_native(
        "AI Post Studio",
        options,
        Box::new(move |_cc| Ok(Box::new(studio) as Box<dyn eframe::App>)),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {}", e)))
}
