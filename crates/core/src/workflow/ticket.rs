//! Epoch-tagged requests and their results.

use crate::catalog::AspectRatio;
use crate::encoding::{self, EncodedImage};
use crate::error::Result;
use crate::gateway::Gateway;
use std::path::PathBuf;

/// A request frozen at the time the user triggered it.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Upload { path: PathBuf },
    Generate { prompt: String, aspect_ratio: AspectRatio },
    Edit { image: EncodedImage, prompt: String },
    Quote,
    Hashtags { context: String },
}

/// A request plus the session epoch it was issued in.
#[derive(Clone, Debug)]
pub struct Ticket {
    epoch: u64,
    request: Request,
}

impl Ticket {
    pub(crate) fn new(epoch: u64, request: Request) -> Self {
        Self { epoch, request }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Pairs an outcome with this ticket's epoch.
    pub fn complete(&self, outcome: Outcome) -> Completion {
        Completion {
            epoch: self.epoch,
            outcome,
        }
    }
}

/// Result of one request, ready to be applied to a session.
#[derive(Debug)]
pub enum Outcome {
    Uploaded {
        path: PathBuf,
        result: Result<EncodedImage>,
    },
    Generated(Result<EncodedImage>),
    Edited(Result<EncodedImage>),
    Quote(Result<String>),
    Hashtags(Result<Vec<String>>),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Uploaded { .. } => "upload",
            Outcome::Generated(_) => "generate",
            Outcome::Edited(_) => "edit",
            Outcome::Quote(_) => "quote",
            Outcome::Hashtags(_) => "hashtags",
        }
    }

    pub fn is_ok(&self) -> bool {
        match self {
            Outcome::Uploaded { result, .. } => result.is_ok(),
            Outcome::Generated(result) | Outcome::Edited(result) => result.is_ok(),
            Outcome::Quote(result) => result.is_ok(),
            Outcome::Hashtags(result) => result.is_ok(),
        }
    }
}

#[derive(Debug)]
pub struct Completion {
    pub(crate) epoch: u64,
    pub(crate) outcome: Outcome,
}

impl Completion {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// Runs a ticket to completion. Never fails: errors travel inside the
/// [`Outcome`] so the session can scope them to their stage.
pub async fn execute(gateway: &dyn Gateway, ticket: Ticket) -> Completion {
    let Ticket { epoch, request } = ticket;
    let outcome = match request {
        Request::Upload { path } => {
            let result = encoding::encode_file(&path).await;
            Outcome::Uploaded { path, result }
        }
        Request::Generate {
            prompt,
            aspect_ratio,
        } => Outcome::Generated(gateway.generate_image(&prompt, aspect_ratio).await),
        Request::Edit { image, prompt } => {
            Outcome::Edited(gateway.edit_image(&image, &prompt).await)
        }
        Request::Quote => Outcome::Quote(gateway.generate_quote().await),
        Request::Hashtags { context } => {
            Outcome::Hashtags(gateway.generate_hashtags(&context).await)
        }
    };

    tracing::debug!(epoch, stage = outcome.label(), ok = outcome.is_ok(), "Request finished");
    Completion { epoch, outcome }
}
