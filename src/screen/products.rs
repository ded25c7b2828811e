//! The product listing screen.
//!
//! [`ProductScreen`] is the headless core of the listing: the live list for
//! the signed-in owner, at most one [`EditSession`], and the dispatcher for
//! save and delete commands. A renderer reads [`ProductScreen::products`]
//! and the session, and drives the screen by awaiting
//! [`ProductScreen::tick`] (or calling [`ProductScreen::pump`] from a
//! synchronous loop).
//!
//! The screen never applies a mutation locally. Saves and deletes go to the
//! store, and the listing changes only when the subscription delivers the
//! next snapshot. Failed commands surface as [`Notice`]s and leave list and
//! session untouched.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::auth::UserId;
use crate::screen::commands::{CommandDispatcher, CommandOutcome};
use crate::screen::edit::EditSession;
use crate::screen::Notice;
use crate::store::{DocumentStore, StoreError};
use crate::sync::{ProductFeed, ProductList};

pub struct ProductScreen {
    feed: ProductFeed,
    list: watch::Receiver<ProductList>,
    session: EditSession,
    dispatcher: CommandDispatcher,
    outcomes: mpsc::UnboundedReceiver<CommandOutcome>,
    notices: VecDeque<Notice>,
}

impl ProductScreen {
    /// Opens the screen for `owner`: registers the live subscription and
    /// readies the command channel. The list starts empty and fills when the
    /// first snapshot arrives.
    pub fn open(store: Arc<dyn DocumentStore>, owner: impl Into<UserId>) -> Self {
        let owner = owner.into();
        let feed = ProductFeed::spawn(store.as_ref(), &owner);
        let list = feed.list();
        let (dispatcher, outcomes) = CommandDispatcher::new(store, owner);
        Self {
            feed,
            list,
            session: EditSession::default(),
            dispatcher,
            outcomes,
            notices: VecDeque::new(),
        }
    }

    /// The list as of the last delivered snapshot.
    pub fn products(&self) -> ProductList {
        self.list.borrow().clone()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Mutable access to the open form, for typing into its fields.
    pub fn session_mut(&mut self) -> &mut EditSession {
        &mut self.session
    }

    /// Opens an edit session over the listed product with this id. The
    /// session works on a copy; later snapshots do not touch it. Returns
    /// `false` when the id is not in the current list.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let product = self.list.borrow().get(id).cloned();
        match product {
            Some(product) => {
                debug!(id = %product.id, "edit session opened");
                self.session.begin(&product);
                true
            }
            None => false,
        }
    }

    /// Opens an empty session for a new product.
    pub fn begin_create(&mut self) {
        self.session.begin_new();
    }

    /// Discards the open session without saving.
    pub fn cancel_edit(&mut self) {
        self.session.close();
    }

    /// Dispatches the open session's draft. The session stays open until the
    /// outcome comes back; success closes it, failure leaves it open for
    /// another attempt. Does nothing when no session is open.
    pub fn save(&mut self) {
        if !self.session.is_open() {
            return;
        }
        let target = self.session.target().map(str::to_owned);
        self.dispatcher.save(target, self.session.draft());
    }

    /// Dispatches a delete for this document id.
    pub fn delete(&mut self, id: &str) {
        self.dispatcher.delete(id.to_string());
    }

    /// Waits for the next event (snapshot, command outcome, or transport
    /// interruption) and applies it.
    pub async fn tick(&mut self) {
        tokio::select! {
            Ok(()) = self.list.changed() => {}
            Some(outcome) = self.outcomes.recv() => self.apply_outcome(outcome),
            Some(error) = self.feed.interrupted() => self.apply_interruption(error),
        }
    }

    /// Applies every event that is already queued, without waiting. Returns
    /// how many were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        if self.list.has_changed().unwrap_or(false) {
            self.list.borrow_and_update();
            applied += 1;
        }
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.apply_outcome(outcome);
            applied += 1;
        }
        while let Some(error) = self.feed.try_interrupted() {
            self.apply_interruption(error);
            applied += 1;
        }
        applied
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    /// Drains the queued user-facing notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn apply_outcome(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::SaveCompleted(Ok(id)) => {
                debug!(%id, "save confirmed, closing session");
                self.session.close();
            }
            CommandOutcome::SaveCompleted(Err(error)) => {
                self.notices.push_back(Notice::SaveFailed(error));
            }
            CommandOutcome::DeleteCompleted { id, result: Ok(()) } => {
                debug!(%id, "delete confirmed");
            }
            CommandOutcome::DeleteCompleted { result: Err(error), .. } => {
                self.notices.push_back(Notice::DeleteFailed(error));
            }
        }
    }

    fn apply_interruption(&mut self, error: StoreError) {
        self.notices.push_back(Notice::SyncInterrupted(error));
    }
}
