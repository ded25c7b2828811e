//! The registration screen.
//!
//! Registration runs in three steps: create the credential (which signs the
//! new user in), attach the display name, and write the profile document
//! under the new user id. The display-name step is best effort; its failure
//! is logged and the flow continues. Form validation happens before anything
//! leaves the process, so a mismatched or empty password never reaches the
//! provider.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::auth::{AuthError, AuthGateway, UserId};
use crate::model::{self, UserProfile};
use crate::screen::Notice;
use crate::store::{DocumentStore, StoreError};

/// Why a registration attempt did not produce an account.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegisterError {
    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A required form field is empty.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The identity provider rejected or failed the credential step.
    #[error(transparent)]
    Credential(#[from] AuthError),

    /// The credential exists but the profile document could not be written.
    #[error("could not store profile: {0}")]
    Profile(#[from] StoreError),
}

/// What the user has typed into the registration form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Local validation, run before any remote call.
    pub fn validate(&self) -> Result<(), RegisterError> {
        if self.email.is_empty() {
            return Err(RegisterError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(RegisterError::MissingField("password"));
        }
        if self.password != self.confirm_password {
            return Err(RegisterError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Runs the registration flow end to end and returns the new user id.
///
/// On success the user is signed in and the `users` collection holds a
/// profile document keyed by the user id. A credential failure leaves the
/// store untouched; a profile-write failure leaves the credential standing
/// and the user signed in, mirroring what a retry would find.
#[instrument(skip_all, fields(email = %form.email))]
pub async fn register_user(
    auth: &dyn AuthGateway,
    store: &dyn DocumentStore,
    form: &RegisterForm,
) -> Result<UserId, RegisterError> {
    form.validate()?;

    let user_id = auth.create_credential(&form.email, &form.password).await?;

    if let Err(error) = auth.set_display_name(&user_id, &form.username).await {
        warn!(%user_id, %error, "display name not applied");
    }

    let profile = UserProfile::new(&form.username, &form.email);
    store.replace(model::USERS, &user_id, profile.to_document()).await?;

    info!(%user_id, "user registered");
    Ok(user_id)
}

/// The headless registration screen: the form, a busy flag while an attempt
/// is in flight, and the outcome once it lands.
pub struct RegisterScreen {
    pub form: RegisterForm,
    auth: Arc<dyn AuthGateway>,
    store: Arc<dyn DocumentStore>,
    busy: bool,
    registered: Option<UserId>,
    notices: Vec<Notice>,
    events: mpsc::UnboundedReceiver<Result<UserId, RegisterError>>,
    events_tx: mpsc::UnboundedSender<Result<UserId, RegisterError>>,
}

impl RegisterScreen {
    pub fn open(auth: Arc<dyn AuthGateway>, store: Arc<dyn DocumentStore>) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        Self {
            form: RegisterForm::default(),
            auth,
            store,
            busy: false,
            registered: None,
            notices: Vec::new(),
            events,
            events_tx,
        }
    }

    /// Submits the form. Validation failures are reported synchronously as a
    /// [`Notice`] and nothing is sent anywhere. A valid form starts the flow
    /// on its own task and sets the busy flag until the outcome arrives.
    /// Ignored while an attempt is already in flight.
    pub fn submit(&mut self) {
        if self.busy {
            return;
        }
        if let Err(error) = self.form.validate() {
            self.notices.push(Notice::RegistrationFailed(error));
            return;
        }

        self.busy = true;
        let auth = Arc::clone(&self.auth);
        let store = Arc::clone(&self.store);
        let form = self.form.clone();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            events.send(register_user(auth.as_ref(), store.as_ref(), &form).await).ok();
        });
    }

    /// Waits for the in-flight attempt to finish and applies its outcome.
    pub async fn tick(&mut self) {
        if let Some(result) = self.events.recv().await {
            self.apply(result);
        }
    }

    /// Applies an already-finished outcome, if any. Returns how many were
    /// applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.events.try_recv() {
            self.apply(result);
            applied += 1;
        }
        applied
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    /// The registered user id, once an attempt has succeeded.
    pub fn registered(&self) -> Option<&str> {
        self.registered.as_deref()
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn apply(&mut self, result: Result<UserId, RegisterError>) {
        self.busy = false;
        match result {
            Ok(user_id) => self.registered = Some(user_id),
            Err(error) => self.notices.push(Notice::RegistrationFailed(error)),
        }
    }
}
