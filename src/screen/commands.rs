//! Fire-and-report mutation commands.
//!
//! The [`CommandDispatcher`] turns a user intent (save this draft, delete
//! this product) into a store mutation running on its own task, and reports
//! the result as a [`CommandOutcome`] on an unbounded channel. Nothing is
//! applied locally on dispatch: the listing only changes when the store's
//! subscription delivers the next snapshot, so a failed command leaves the
//! screen exactly as it was.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::auth::UserId;
use crate::model::{self, ProductDraft};
use crate::store::{DocumentId, DocumentStore, StoreError};

/// Terminal report of one dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// A save finished. `Ok` carries the id the document lives under, for a
    /// creation as well as for a replacement.
    SaveCompleted(Result<DocumentId, StoreError>),

    /// A delete finished.
    DeleteCompleted {
        id: DocumentId,
        result: Result<(), StoreError>,
    },
}

/// Dispatches product mutations for one owner.
pub struct CommandDispatcher {
    store: Arc<dyn DocumentStore>,
    owner: UserId,
    outcomes: mpsc::UnboundedSender<CommandOutcome>,
}

impl CommandDispatcher {
    /// New dispatcher writing on behalf of `owner`, plus the receiving end
    /// of its outcome channel.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        owner: impl Into<UserId>,
    ) -> (Self, mpsc::UnboundedReceiver<CommandOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (Self { store, owner: owner.into(), outcomes }, receiver)
    }

    /// Saves a draft. With a `target` the document is replaced under that
    /// id; without one a new document is created. Exactly one store call is
    /// issued either way.
    #[instrument(skip(self, draft))]
    pub fn save(&self, target: Option<DocumentId>, draft: ProductDraft) {
        debug!(?draft, "dispatching save");
        let store = Arc::clone(&self.store);
        let owner = self.owner.clone();
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let fields = draft.to_document(&owner);
            let result = match &target {
                Some(id) => {
                    store.replace(model::PRODUCTS, id, fields).await.map(|()| id.clone())
                }
                None => store.create(model::PRODUCTS, fields).await,
            };
            match &result {
                Ok(id) => info!(%id, "product saved"),
                Err(error) => warn!(%error, "product save failed"),
            }
            outcomes.send(CommandOutcome::SaveCompleted(result)).ok();
        });
    }

    /// Deletes a product by document id.
    #[instrument(skip(self))]
    pub fn delete(&self, id: DocumentId) {
        debug!(%id, "dispatching delete");
        let store = Arc::clone(&self.store);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let result = store.delete(model::PRODUCTS, &id).await;
            match &result {
                Ok(()) => info!(%id, "product deleted"),
                Err(error) => warn!(%id, %error, "product delete failed"),
            }
            outcomes.send(CommandOutcome::DeleteCompleted { id, result }).ok();
        });
    }
}
