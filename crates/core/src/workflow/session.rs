//! Session state and its transitions.
//!
//! The session follows this state machine (see [`Phase`]):
//! `Idle` -> `Uploading` | `Generating` -> `Ready` -> `Editing` -> `Edited`
//! -> `HashtagsReady`, with "edit again" returning to `Ready` and "start
//! over" returning to `Idle` from anywhere.
//!
//! Every asynchronous stage is split in two: a `begin_*` method validates
//! the request, marks the stage as loading and hands out a [`Ticket`]; the
//! resulting [`Completion`] is fed back through [`Session::apply`]. Tickets
//! carry the session epoch, which changes on every reset, so results that
//! arrive after a reset are discarded.

use super::ticket::{Completion, Outcome, Request, Ticket};
use crate::catalog::{AspectRatio, StyleSelection};
use crate::encoding::EncodedImage;
use crate::error::{AppError, Result};
use crate::prompt::{EditPromptInput, HASHTAG_FALLBACK_CONTEXT, compose_edit_prompt};
use std::path::{Path, PathBuf};

/// How the user chose to obtain the origin image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Upload,
    Generate,
}

/// The image a session started from.
#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    Uploaded { path: PathBuf, image: EncodedImage },
    Generated { image: EncodedImage },
}

impl Origin {
    pub fn image(&self) -> &EncodedImage {
        match self {
            Origin::Uploaded { image, .. } | Origin::Generated { image } => image,
        }
    }
}

/// Asynchronous operation categories, each with its own loading flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    ImageEdit,
    Quote,
    Hashtags,
    ImageGenerate,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    pub image_edit: bool,
    pub quote: bool,
    pub hashtags: bool,
    pub image_generate: bool,
}

impl LoadingFlags {
    pub fn get(&self, stage: Stage) -> bool {
        match stage {
            Stage::ImageEdit => self.image_edit,
            Stage::Quote => self.quote,
            Stage::Hashtags => self.hashtags,
            Stage::ImageGenerate => self.image_generate,
        }
    }

    fn set(&mut self, stage: Stage, value: bool) {
        match stage {
            Stage::ImageEdit => self.image_edit = value,
            Stage::Quote => self.quote = value,
            Stage::Hashtags => self.hashtags = value,
            Stage::ImageGenerate => self.image_generate = value,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Uploading,
    Generating,
    Ready,
    Editing,
    Edited,
    HashtagsReady,
}

/// What [`Session::apply`] did with a completion.
#[derive(Debug)]
pub enum Applied {
    /// The result was written to the session.
    Done,
    /// The stage failed; its banner message is now the session error.
    Failed(AppError),
    /// The completion belonged to an earlier epoch and was ignored.
    Stale,
}

#[derive(Debug, Default)]
pub struct Session {
    epoch: u64,
    mode: Option<Mode>,
    origin: Option<Origin>,
    working: Option<EncodedImage>,
    edited: Option<EncodedImage>,
    quote: String,
    hashtags: Vec<String>,
    loading: LoadingFlags,
    uploading: bool,
    error: Option<String>,
    instruction: String,
    watermark: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn origin(&self) -> Option<&Origin> {
        self.origin.as_ref()
    }

    /// The image that the next edit applies to.
    pub fn working_image(&self) -> Option<&EncodedImage> {
        self.working.as_ref()
    }

    pub fn edited_image(&self) -> Option<&EncodedImage> {
        self.edited.as_ref()
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    pub fn hashtags(&self) -> &[String] {
        &self.hashtags
    }

    pub fn loading(&self) -> LoadingFlags {
        self.loading
    }

    pub fn is_loading(&self, stage: Stage) -> bool {
        self.loading.get(stage)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn watermark(&self) -> &str {
        &self.watermark
    }

    pub fn phase(&self) -> Phase {
        if self.uploading {
            return Phase::Uploading;
        }
        if self.working.is_none() {
            return if self.loading.image_generate {
                Phase::Generating
            } else {
                Phase::Idle
            };
        }
        if self.loading.image_edit {
            return Phase::Editing;
        }
        match (&self.edited, self.hashtags.is_empty()) {
            (Some(_), false) => Phase::HashtagsReady,
            (Some(_), true) => Phase::Edited,
            (None, _) => Phase::Ready,
        }
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    /// Discards everything and returns to mode selection.
    pub fn start_over(&mut self) {
        self.reset();
        self.mode = None;
        tracing::debug!(epoch = self.epoch, "Session reset");
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Shows the banner for a failure that happened outside a ticket,
    /// such as saving the post or touching the clipboard.
    pub fn report(&mut self, error: &AppError) {
        tracing::warn!(error = %error, "Reporting error");
        self.error = Some(error.banner());
    }

    pub fn set_instruction(&mut self, text: impl Into<String>) {
        self.instruction = text.into();
    }

    pub fn set_watermark(&mut self, text: impl Into<String>) {
        self.watermark = text.into();
    }

    /// Replaces the quote. Hashtags describe the previous quote, so they go.
    pub fn set_quote(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.quote {
            self.hashtags.clear();
            self.quote = text;
        }
    }

    /// Starts a new session from a file on disk.
    pub fn begin_upload(&mut self, path: impl Into<PathBuf>) -> Ticket {
        self.reset();
        self.mode = Some(Mode::Upload);
        self.uploading = true;
        self.ticket(Request::Upload { path: path.into() })
    }

    /// Starts a new session from an AI-generated image.
    ///
    /// An empty prompt is rejected without touching the current session.
    pub fn begin_generate(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Ticket> {
        if prompt.trim().is_empty() {
            return Err(self.reject("Please enter a prompt to generate an image."));
        }
        self.ensure_idle(Stage::ImageGenerate)?;

        self.reset();
        self.mode = Some(Mode::Generate);
        self.loading.set(Stage::ImageGenerate, true);
        Ok(self.ticket(Request::Generate {
            prompt: prompt.trim().to_string(),
            aspect_ratio,
        }))
    }

    /// Freezes the current instruction, quote and watermark into an edit
    /// request for the working image.
    pub fn begin_edit(&mut self, style: StyleSelection) -> Result<Ticket> {
        let Some(image) = self.working.clone() else {
            return Err(self.reject("Please upload or generate an image first."));
        };
        self.ensure_idle(Stage::ImageEdit)?;

        self.loading.set(Stage::ImageEdit, true);
        self.error = None;
        self.edited = None;
        self.hashtags.clear();

        let prompt = compose_edit_prompt(&EditPromptInput {
            instruction: &self.instruction,
            quote: &self.quote,
            style,
            watermark: &self.watermark,
        });
        Ok(self.ticket(Request::Edit { image, prompt }))
    }

    pub fn begin_quote(&mut self) -> Result<Ticket> {
        self.ensure_idle(Stage::Quote)?;
        self.loading.set(Stage::Quote, true);
        self.error = None;
        Ok(self.ticket(Request::Quote))
    }

    /// Requests hashtags for the current quote, or for the edited image when
    /// there is no quote.
    pub fn begin_hashtags(&mut self) -> Result<Ticket> {
        let context = if !self.quote.trim().is_empty() {
            self.quote.trim().to_string()
        } else if self.edited.is_some() {
            HASHTAG_FALLBACK_CONTEXT.to_string()
        } else {
            return Err(self.reject(
                "Please generate an image and a quote first to create relevant hashtags.",
            ));
        };
        self.ensure_idle(Stage::Hashtags)?;

        self.loading.set(Stage::Hashtags, true);
        self.error = None;
        Ok(self.ticket(Request::Hashtags { context }))
    }

    /// Promotes the edited result to the working image for another pass.
    pub fn edit_again(&mut self) -> Result<()> {
        let Some(edited) = self.edited.take() else {
            return Err(self.reject("There is no edited image to continue from."));
        };
        self.working = Some(edited);
        self.instruction.clear();
        self.hashtags.clear();
        Ok(())
    }

    /// Applies the result of a ticket.
    ///
    /// Completions from an earlier epoch are ignored entirely: the reset that
    /// invalidated them already cleared their loading flag.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        let Completion { epoch, outcome } = completion;
        if epoch != self.epoch {
            tracing::warn!(
                stale_epoch = epoch,
                epoch = self.epoch,
                stage = outcome.label(),
                "Discarding result from a reset session"
            );
            return Applied::Stale;
        }

        match outcome {
            Outcome::Uploaded { path, result } => {
                self.uploading = false;
                match result {
                    Ok(image) => self.establish_origin(Origin::Uploaded { path, image }),
                    Err(e) => return self.fail(e),
                }
            }
            Outcome::Generated(result) => {
                self.loading.set(Stage::ImageGenerate, false);
                match result {
                    Ok(image) => self.establish_origin(Origin::Generated { image }),
                    Err(e) => return self.fail(e),
                }
            }
            Outcome::Edited(result) => {
                self.loading.set(Stage::ImageEdit, false);
                match result {
                    Ok(image) => {
                        self.edited = Some(image);
                        self.hashtags.clear();
                    }
                    Err(e) => return self.fail(e),
                }
            }
            Outcome::Quote(result) => {
                self.loading.set(Stage::Quote, false);
                match result {
                    Ok(quote) => self.set_quote(quote),
                    Err(e) => return self.fail(e),
                }
            }
            Outcome::Hashtags(result) => {
                self.loading.set(Stage::Hashtags, false);
                match result {
                    Ok(tags) => self.hashtags = tags,
                    Err(e) => return self.fail(e),
                }
            }
        }
        Applied::Done
    }

    /// Path of the uploaded origin, if the session started from a file.
    pub fn upload_path(&self) -> Option<&Path> {
        match &self.origin {
            Some(Origin::Uploaded { path, .. }) => Some(path),
            _ => None,
        }
    }

    fn establish_origin(&mut self, origin: Origin) {
        self.working = Some(origin.image().clone());
        self.edited = None;
        self.hashtags.clear();
        self.origin = Some(origin);
    }

    fn reset(&mut self) {
        self.epoch += 1;
        self.origin = None;
        self.working = None;
        self.edited = None;
        self.quote.clear();
        self.hashtags.clear();
        self.instruction.clear();
        self.watermark.clear();
        self.error = None;
        self.loading = LoadingFlags::default();
        self.uploading = false;
    }

    fn ensure_idle(&mut self, stage: Stage) -> Result<()> {
        if self.loading.get(stage) {
            return Err(self.reject("Please wait for the current request to finish."));
        }
        Ok(())
    }

    fn reject(&mut self, message: &str) -> AppError {
        self.error = Some(message.to_string());
        AppError::precondition(message)
    }

    fn fail(&mut self, error: AppError) -> Applied {
        tracing::error!(error = %error, "Stage failed");
        self.error = Some(error.banner());
        Applied::Failed(error)
    }

    fn ticket(&self, request: Request) -> Ticket {
        Ticket::new(self.epoch, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ColorPalette, Font, QuotePlacement};
    use crate::prompt::DEFAULT_EDIT_INSTRUCTION;

    fn image(tag: &str) -> EncodedImage {
        EncodedImage::new(tag, "image/png")
    }

    fn uploaded(tag: &str) -> Session {
        let mut session = Session::new();
        let ticket = session.begin_upload("photo.png");
        let applied = session.apply(ticket.complete(Outcome::Uploaded {
            path: "photo.png".into(),
            result: Ok(image(tag)),
        }));
        assert!(matches!(applied, Applied::Done));
        session
    }

    fn edited(tag: &str) -> Session {
        let mut session = uploaded("X");
        let ticket = session.begin_edit(StyleSelection::default()).unwrap();
        session.apply(ticket.complete(Outcome::Edited(Ok(image(tag)))));
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.origin().is_none());
        assert_eq!(session.mode(), None);
    }

    #[test]
    fn upload_moves_through_uploading_to_ready() {
        let mut session = Session::new();
        let ticket = session.begin_upload("photo.png");
        assert_eq!(session.phase(), Phase::Uploading);
        assert_eq!(session.mode(), Some(Mode::Upload));

        session.apply(ticket.complete(Outcome::Uploaded {
            path: "photo.png".into(),
            result: Ok(image("X")),
        }));
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.working_image(), Some(&image("X")));
        assert_eq!(session.origin().map(Origin::image), Some(&image("X")));
        assert_eq!(session.upload_path(), Some(Path::new("photo.png")));
    }

    #[test]
    fn failed_upload_returns_to_mode_selection() {
        let mut session = Session::new();
        let ticket = session.begin_upload("missing.png");
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let applied = session.apply(ticket.complete(Outcome::Uploaded {
            path: "missing.png".into(),
            result: Err(err.into()),
        }));

        assert!(matches!(applied, Applied::Failed(AppError::Io(_))));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.mode(), Some(Mode::Upload));
        assert!(session.origin().is_none());
        assert_eq!(
            session.error(),
            Some("Failed to load image. Please try another file.")
        );
    }

    #[test]
    fn generate_requires_prompt_and_keeps_session() {
        let mut session = uploaded("X");
        session.set_quote("keep me");
        let err = session.begin_generate("   ", AspectRatio::Square).unwrap_err();

        assert!(matches!(err, AppError::Precondition(_)));
        assert_eq!(session.quote(), "keep me");
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.error().is_some());
    }

    #[test]
    fn generate_resets_then_sets_generated_origin() {
        let mut session = uploaded("X");
        let ticket = session
            .begin_generate("a misty lake", AspectRatio::Story)
            .unwrap();
        assert_eq!(session.phase(), Phase::Generating);
        assert!(session.working_image().is_none());
        assert!(matches!(
            ticket.request(),
            Request::Generate { prompt, aspect_ratio: AspectRatio::Story } if prompt == "a misty lake"
        ));

        session.apply(ticket.complete(Outcome::Generated(Ok(image("G")))));
        assert_eq!(session.phase(), Phase::Ready);
        assert!(matches!(session.origin(), Some(Origin::Generated { .. })));
        assert!(!session.is_loading(Stage::ImageGenerate));
    }

    #[test]
    fn failed_generation_leaves_origin_unset() {
        let mut session = Session::new();
        let ticket = session.begin_generate("a lake", AspectRatio::Square).unwrap();
        session.apply(ticket.complete(Outcome::Generated(Err(AppError::Generation(
            "no image".into(),
        )))));

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.mode(), Some(Mode::Generate));
        assert!(session.origin().is_none());
        assert!(!session.is_loading(Stage::ImageGenerate));
        assert_eq!(
            session.error(),
            Some("Failed to generate the image. Please try a different prompt.")
        );
    }

    #[test]
    fn edit_without_image_is_a_precondition_error() {
        let mut session = Session::new();
        let err = session.begin_edit(StyleSelection::default()).unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert!(!session.is_loading(Stage::ImageEdit));
    }

    #[test]
    fn edit_freezes_default_prompt_for_bare_session() {
        let mut session = uploaded("X");
        let ticket = session.begin_edit(StyleSelection::default()).unwrap();

        assert_eq!(session.phase(), Phase::Editing);
        match ticket.request() {
            Request::Edit { image: source, prompt } => {
                assert_eq!(source, &image("X"));
                assert_eq!(prompt, DEFAULT_EDIT_INSTRUCTION);
            }
            other => panic!("unexpected request {other:?}"),
        }

        // Later typing does not change the in-flight request
        session.set_instruction("something else");
        session.apply(ticket.complete(Outcome::Edited(Ok(image("Y")))));
        assert_eq!(session.phase(), Phase::Edited);
        assert_eq!(session.edited_image(), Some(&image("Y")));
    }

    #[test]
    fn edit_prompt_carries_quote_style_and_watermark() {
        let mut session = uploaded("X");
        session.set_quote("Adventure awaits");
        session.set_watermark("@traveler");
        let style = StyleSelection {
            font: Font::Caveat,
            palette: ColorPalette::GoldenHour,
            placement: QuotePlacement::Bottom,
        };

        let ticket = session.begin_edit(style).unwrap();
        let Request::Edit { prompt, .. } = ticket.request() else {
            panic!("expected an edit request");
        };
        for needle in ["Adventure awaits", "Caveat", "#FFD700", "bottom", "@traveler"] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn same_stage_cannot_be_started_twice() {
        let mut session = uploaded("X");
        let _first = session.begin_edit(StyleSelection::default()).unwrap();
        let second = session.begin_edit(StyleSelection::default());
        assert!(matches!(second, Err(AppError::Precondition(_))));

        // Other stages are independent
        assert!(session.begin_quote().is_ok());
        assert!(session.loading().image_edit && session.loading().quote);
    }

    #[test]
    fn failed_edit_returns_to_ready_without_result() {
        let mut session = uploaded("X");
        let ticket = session.begin_edit(StyleSelection::default()).unwrap();
        session.apply(ticket.complete(Outcome::Edited(Err(AppError::Edit("none".into())))));

        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.edited_image().is_none());
        assert!(session.error().unwrap().starts_with("Failed to edit the image."));
    }

    #[test]
    fn successful_edit_clears_hashtags() {
        let mut session = edited("Y");
        let ticket = session.begin_hashtags().unwrap();
        session.apply(ticket.complete(Outcome::Hashtags(Ok(vec!["travel".into()]))));
        assert_eq!(session.phase(), Phase::HashtagsReady);

        session.edit_again().unwrap();
        let ticket = session.begin_edit(StyleSelection::default()).unwrap();
        session.apply(ticket.complete(Outcome::Edited(Ok(image("Z")))));
        assert!(session.hashtags().is_empty());
        assert_eq!(session.phase(), Phase::Edited);
    }

    #[test]
    fn hashtags_need_quote_or_edited_image() {
        let mut session = uploaded("X");
        let err = session.begin_hashtags().unwrap_err();
        assert!(matches!(err, AppError::Precondition(_)));
        assert!(!session.is_loading(Stage::Hashtags));
        assert!(session.error().is_some());
    }

    #[test]
    fn hashtag_context_prefers_quote_over_fallback() {
        let mut session = edited("Y");
        let ticket = session.begin_hashtags().unwrap();
        assert!(matches!(
            ticket.request(),
            Request::Hashtags { context } if context == HASHTAG_FALLBACK_CONTEXT
        ));
        session.apply(ticket.complete(Outcome::Hashtags(Ok(vec![]))));

        session.set_quote("Go outside");
        let ticket = session.begin_hashtags().unwrap();
        assert!(matches!(
            ticket.request(),
            Request::Hashtags { context } if context == "Go outside"
        ));
    }

    #[test]
    fn changing_quote_clears_hashtags() {
        let mut session = edited("Y");
        session.set_quote("first");
        let ticket = session.begin_hashtags().unwrap();
        session.apply(ticket.complete(Outcome::Hashtags(Ok(vec!["a".into(), "b".into()]))));
        assert_eq!(session.hashtags(), ["a", "b"]);

        session.set_quote("first");
        assert_eq!(session.hashtags().len(), 2);
        session.set_quote("second");
        assert!(session.hashtags().is_empty());
    }

    #[test]
    fn edit_again_promotes_result() {
        let mut session = edited("Y");
        session.set_instruction("make it warmer");
        session.edit_again().unwrap();

        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.working_image(), Some(&image("Y")));
        assert!(session.edited_image().is_none());
        assert!(session.instruction().is_empty());
        // The origin is untouched
        assert_eq!(session.origin().map(Origin::image), Some(&image("X")));

        assert!(matches!(session.edit_again(), Err(AppError::Precondition(_))));
    }

    #[test]
    fn start_over_clears_everything_from_any_phase() {
        let mut session = edited("Y");
        session.set_quote("q");
        session.set_watermark("@me");
        let ticket = session.begin_hashtags().unwrap();
        session.apply(ticket.complete(Outcome::Hashtags(Ok(vec!["t".into()]))));
        let _pending = session.begin_quote().unwrap();
        let _ = session.begin_edit(StyleSelection::default());
        let epoch = session.epoch();

        session.start_over();

        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.origin().is_none());
        assert!(session.working_image().is_none());
        assert!(session.edited_image().is_none());
        assert!(session.quote().is_empty());
        assert!(session.hashtags().is_empty());
        assert!(session.watermark().is_empty());
        assert!(session.error().is_none());
        assert_eq!(session.loading(), LoadingFlags::default());
        assert_eq!(session.mode(), None);
        assert!(session.epoch() > epoch);
    }

    #[test]
    fn stale_results_are_discarded_after_reset() {
        let mut session = uploaded("X");
        let quote = session.begin_quote().unwrap();
        let edit = session.begin_edit(StyleSelection::default()).unwrap();

        let fresh = session.begin_upload("other.png");
        session.apply(fresh.complete(Outcome::Uploaded {
            path: "other.png".into(),
            result: Ok(image("N")),
        }));
        // A new quote request is allowed while the stale one is in flight
        let new_quote = session.begin_quote().unwrap();

        let applied = session.apply(edit.complete(Outcome::Edited(Ok(image("old")))));
        assert!(matches!(applied, Applied::Stale));
        let applied = session.apply(quote.complete(Outcome::Quote(Ok("old quote".into()))));
        assert!(matches!(applied, Applied::Stale));

        assert!(session.edited_image().is_none());
        assert!(session.quote().is_empty());
        assert!(session.is_loading(Stage::Quote));
        assert_eq!(session.working_image(), Some(&image("N")));

        session.apply(new_quote.complete(Outcome::Quote(Ok("fresh".into()))));
        assert_eq!(session.quote(), "fresh");
        assert!(!session.is_loading(Stage::Quote));
    }

    #[test]
    fn failed_stage_preserves_previous_state() {
        let mut session = edited("Y");
        session.set_quote("q");
        let ticket = session.begin_hashtags().unwrap();
        session.apply(ticket.complete(Outcome::Hashtags(Ok(vec!["keep".into()]))));

        let ticket = session.begin_quote().unwrap();
        session.apply(ticket.complete(Outcome::Quote(Err(AppError::Quote("down".into())))));

        assert_eq!(session.quote(), "q");
        assert_eq!(session.hashtags(), ["keep"]);
        assert_eq!(session.edited_image(), Some(&image("Y")));
        assert_eq!(
            session.error(),
            Some("Could not generate a quote. Please try again.")
        );

        session.dismiss_error();
        assert!(session.error().is_none());
    }

    #[test]
    fn reported_errors_use_banner_text() {
        let mut session = edited("Y");
        session.report(&AppError::precondition("Generate a post before downloading it."));
        assert_eq!(session.error(), Some("Generate a post before downloading it."));
        assert_eq!(session.phase(), Phase::Edited);
    }
}
