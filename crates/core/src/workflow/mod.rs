//! Workflow controller.
//!
//! [`Session`] owns all state and exposes the stage transitions;
//! [`execute`] runs a [`Ticket`] against a [`Gateway`]. [`Workflow`] glues
//! the two together for callers that can simply await each stage, such as
//! the command line. The UI instead spawns `execute` and feeds completions
//! back on its own thread.

mod session;
mod ticket;

pub use session::{Applied, LoadingFlags, Mode, Origin, Phase, Session, Stage};
pub use ticket::{Completion, Outcome, Request, Ticket, execute};

use crate::catalog::{AspectRatio, StyleSelection};
use crate::error::Result;
use crate::gateway::SharedGateway;
use std::path::PathBuf;

/// A session, its style selection and the backend it talks to.
pub struct Workflow {
    session: Session,
    style: StyleSelection,
    gateway: SharedGateway,
}

impl Workflow {
    pub fn new(gateway: SharedGateway) -> Self {
        Self {
            session: Session::new(),
            style: StyleSelection::default(),
            gateway,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn style(&self) -> StyleSelection {
        self.style
    }

    pub fn set_style(&mut self, style: StyleSelection) {
        self.style = style;
    }

    pub fn gateway(&self) -> SharedGateway {
        self.gateway.clone()
    }

    pub async fn upload(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let ticket = self.session.begin_upload(path);
        self.run(ticket).await
    }

    pub async fn generate(&mut self, prompt: &str, aspect_ratio: AspectRatio) -> Result<()> {
        let ticket = self.session.begin_generate(prompt, aspect_ratio)?;
        self.run(ticket).await
    }

    pub async fn edit(&mut self) -> Result<()> {
        let ticket = self.session.begin_edit(self.style)?;
        self.run(ticket).await
    }

    pub async fn quote(&mut self) -> Result<()> {
        let ticket = self.session.begin_quote()?;
        self.run(ticket).await
    }

    pub async fn hashtags(&mut self) -> Result<()> {
        let ticket = self.session.begin_hashtags()?;
        self.run(ticket).await
    }

    pub fn edit_again(&mut self) -> Result<()> {
        self.session.edit_again()
    }

    pub fn start_over(&mut self) {
        self.session.start_over();
    }

    async fn run(&mut self, ticket: Ticket) -> Result<()> {
        let completion = execute(&*self.gateway, ticket).await;
        match self.session.apply(completion) {
            Applied::Failed(e) => Err(e),
            Applied::Done | Applied::Stale => Ok(()),
        }
    }
}
