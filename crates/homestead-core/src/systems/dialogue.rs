//! Dialog controller - paged conversations that block world input
//!
//! Completion is reported as a `DialogOutcome` value from `advance`,
//! `cancel` and `update` rather than through a stored callback. A session
//! yields `Closed` exactly once.

use log::{debug, warn};

use crate::traits::{DialogView, InputSource, Movable};

/// What the dialog surface renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogPage {
    pub npc_name: String,
    pub text: String,
    pub index: usize,
    pub total: usize,
    pub is_last_page: bool,
}

/// Result of stepping an active dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Moved to the next page
    Continued,
    /// Session ended (finished or cancelled; callers see no difference)
    Closed,
}

#[derive(Debug, Clone)]
struct DialogSession {
    npc_name: String,
    pages: Vec<String>,
    page: usize,
}

impl DialogSession {
    fn page(&self) -> DialogPage {
        DialogPage {
            npc_name: self.npc_name.clone(),
            text: self.pages[self.page].clone(),
            index: self.page,
            total: self.pages.len(),
            is_last_page: self.page + 1 == self.pages.len(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DialogController {
    session: Option<DialogSession>,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_page(&self) -> Option<DialogPage> {
        self.session.as_ref().map(DialogSession::page)
    }

    /// Open a conversation at page 0 and stop the player.
    ///
    /// Returns false (and changes nothing) when there are no pages or a
    /// conversation is already open.
    pub fn show(
        &mut self,
        npc_name: &str,
        pages: &[String],
        player: &mut dyn Movable,
        view: &mut dyn DialogView,
    ) -> bool {
        if pages.is_empty() {
            warn!("Dialog for '{}' has no pages, not opening", npc_name);
            return false;
        }
        if self.is_active() {
            warn!("Dialog already open, ignoring dialog for '{}'", npc_name);
            return false;
        }

        player.stop();
        let session = DialogSession {
            npc_name: npc_name.to_string(),
            pages: pages.to_vec(),
            page: 0,
        };
        view.show_page(&session.page());
        self.session = Some(session);
        debug!("Dialog opened with '{}' ({} pages)", npc_name, pages.len());
        true
    }

    /// Next page, or close after the last one. `None` if nothing is open.
    pub fn advance(&mut self, view: &mut dyn DialogView) -> Option<DialogOutcome> {
        let session = self.session.as_mut()?;
        session.page += 1;
        if session.page < session.pages.len() {
            view.show_page(&session.page());
            Some(DialogOutcome::Continued)
        } else {
            self.hide(view)
        }
    }

    /// Close immediately. `None` if nothing is open.
    pub fn cancel(&mut self, view: &mut dyn DialogView) -> Option<DialogOutcome> {
        self.hide(view)
    }

    /// Forced teardown (new game, load). Same as `cancel`; returns whether a
    /// session was open.
    pub fn close(&mut self, view: &mut dyn DialogView) -> bool {
        self.hide(view).is_some()
    }

    fn hide(&mut self, view: &mut dyn DialogView) -> Option<DialogOutcome> {
        let session = self.session.take()?;
        view.hide();
        debug!("Dialog with '{}' closed", session.npc_name);
        Some(DialogOutcome::Closed)
    }

    /// Per-frame input handling. Input is not polled at all while inactive.
    pub fn update(
        &mut self,
        input: &mut dyn InputSource,
        view: &mut dyn DialogView,
    ) -> Option<DialogOutcome> {
        if !self.is_active() {
            return None;
        }
        if input.cancel_pressed() {
            return self.cancel(view);
        }
        if input.advance_pressed() {
            return self.advance(view);
        }
        None
    }
}
