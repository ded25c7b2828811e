use std::sync::Arc;

use thiserror::Error;

use crate::auth::{AuthGateway, UserId};
use crate::screen::{ProductScreen, RegisterScreen};
use crate::store::DocumentStore;

/// Why a screen could not be opened.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    /// The products screen needs a signed-in user to scope its subscription.
    #[error("no signed-in user")]
    NotSignedIn,
}

/// The composition root: holds the two capabilities and vends screens wired
/// to them.
///
/// `InventorySystem` owns nothing that runs. Each [`ProductScreen`] carries
/// its own subscription and tasks and releases them when dropped, so there
/// is no system-wide shutdown step; dropping the screens is enough.
///
/// # Example
///
/// ```ignore
/// let system = InventorySystem::new(auth, store);
///
/// let mut register = system.register_screen();
/// register.form.email = "alice@example.com".into();
/// // ... fill the rest, then:
/// register.submit();
/// register.tick().await;
///
/// let mut products = system.products_screen()?;
/// products.tick().await; // first snapshot
/// ```
pub struct InventorySystem {
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn DocumentStore>,
}

impl InventorySystem {
    pub fn new(auth: Arc<dyn AuthGateway>, store: Arc<dyn DocumentStore>) -> Self {
        Self { auth, store }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<UserId> {
        self.auth.current_user()
    }

    /// A registration screen over the system's capabilities.
    pub fn register_screen(&self) -> RegisterScreen {
        RegisterScreen::open(Arc::clone(&self.auth), Arc::clone(&self.store))
    }

    /// A products screen for the signed-in user. Fails when nobody is
    /// signed in, since the live query is scoped to an owner.
    pub fn products_screen(&self) -> Result<ProductScreen, ScreenError> {
        let owner = self.auth.current_user().ok_or(ScreenError::NotSignedIn)?;
        Ok(ProductScreen::open(Arc::clone(&self.store), owner))
    }
}
