use std::sync::Arc;
use std::time::Duration;

use stockroom::auth::{AuthError, AuthGateway, MemoryAuth};
use stockroom::lifecycle::InventorySystem;
use stockroom::model::{FIELD_EMAIL, FIELD_OWNER_ID, FIELD_USERNAME, PRODUCTS, USERS};
use stockroom::screen::{Notice, RegisterError, RegisterScreen};
use stockroom::store::{Document, MemoryStore, Mutation, StoreError};
use tokio::time::timeout;

fn system() -> (Arc<MemoryAuth>, Arc<MemoryStore>, InventorySystem) {
    let auth = Arc::new(MemoryAuth::new());
    let store = Arc::new(MemoryStore::new());
    let system = InventorySystem::new(Arc::<MemoryAuth>::clone(&auth), Arc::<MemoryStore>::clone(&store));
    (auth, store, system)
}

fn fill_valid(screen: &mut RegisterScreen) {
    screen.form.username = "alice".to_string();
    screen.form.email = "alice@example.com".to_string();
    screen.form.password = "hunter22".to_string();
    screen.form.confirm_password = "hunter22".to_string();
}

/// Awaits the in-flight attempt, failing the test after one second.
async fn settle(screen: &mut RegisterScreen) {
    timeout(Duration::from_secs(1), screen.tick())
        .await
        .expect("registration did not finish in time");
}

/// Mismatched passwords are rejected locally: no credential call, no
/// profile write, and the notice is available immediately.
#[tokio::test]
async fn mismatched_passwords_never_reach_the_provider() {
    let (auth, store, system) = system();
    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.form.password = "a".to_string();
    screen.form.confirm_password = "b".to_string();

    screen.submit();

    assert!(!screen.busy(), "local rejection must not start an attempt");
    assert_eq!(auth.credential_calls(), 0, "the provider must never be called");
    assert!(store.documents(USERS).is_empty());
    assert_eq!(
        screen.take_notices(),
        vec![Notice::RegistrationFailed(RegisterError::PasswordMismatch)]
    );
}

/// Empty email and empty password are also caught before any remote call.
#[tokio::test]
async fn empty_fields_are_rejected_locally() {
    let (auth, _store, system) = system();

    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.form.email = String::new();
    screen.submit();
    assert_eq!(
        screen.take_notices(),
        vec![Notice::RegistrationFailed(RegisterError::MissingField("email"))]
    );

    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.form.password = String::new();
    screen.form.confirm_password = String::new();
    screen.submit();
    assert_eq!(
        screen.take_notices(),
        vec![Notice::RegistrationFailed(RegisterError::MissingField("password"))]
    );

    assert_eq!(auth.credential_calls(), 0);
}

/// A valid form creates the credential, signs the user in, attaches the
/// display name, and writes exactly one profile document keyed by the new
/// user id.
#[tokio::test]
async fn successful_registration_signs_in_and_writes_profile() {
    let (auth, store, system) = system();
    let mut screen = system.register_screen();
    fill_valid(&mut screen);

    screen.submit();
    assert!(screen.busy(), "a valid submit must set the busy flag");

    settle(&mut screen).await;

    assert!(!screen.busy());
    let user_id = screen.registered().expect("registration should succeed").to_string();
    assert_eq!(auth.current_user(), Some(user_id.clone()));
    assert_eq!(auth.display_name_of(&user_id), Some("alice".to_string()));

    let profiles = store.documents(USERS);
    assert_eq!(profiles.len(), 1, "exactly one profile document");
    assert_eq!(profiles[0].id, user_id, "profile must be keyed by the user id");
    assert_eq!(profiles[0].fields.str_field(FIELD_USERNAME), "alice");
    assert_eq!(profiles[0].fields.str_field(FIELD_EMAIL), "alice@example.com");
    assert!(screen.take_notices().is_empty());
}

/// A duplicate email is rejected by the provider; nothing is written and
/// the failure surfaces as a notice.
#[tokio::test]
async fn duplicate_email_reports_and_writes_nothing() {
    let (auth, store, system) = system();

    let mut first = system.register_screen();
    fill_valid(&mut first);
    first.submit();
    settle(&mut first).await;
    assert!(first.registered().is_some());

    let mut second = system.register_screen();
    fill_valid(&mut second);
    second.form.username = "another alice".to_string();
    second.submit();
    settle(&mut second).await;

    assert!(second.registered().is_none());
    assert_eq!(
        second.take_notices(),
        vec![Notice::RegistrationFailed(RegisterError::Credential(AuthError::EmailInUse(
            "alice@example.com".to_string()
        )))]
    );
    assert_eq!(store.documents(USERS).len(), 1, "only the first profile may exist");
    assert_eq!(auth.credential_calls(), 2);
}

/// A password the provider considers too weak fails the credential step;
/// no profile document is written.
#[tokio::test]
async fn weak_password_is_rejected_by_the_provider() {
    let (auth, store, system) = system();
    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.form.password = "abc".to_string();
    screen.form.confirm_password = "abc".to_string();

    screen.submit();
    settle(&mut screen).await;

    assert!(screen.registered().is_none());
    assert_eq!(auth.current_user(), None);
    assert!(store.documents(USERS).is_empty());
    assert!(matches!(
        screen.take_notices().as_slice(),
        [Notice::RegistrationFailed(RegisterError::Credential(AuthError::WeakPassword(_)))]
    ));
}

/// The display-name step is best effort: its failure is logged, the flow
/// continues, and the profile document is still written.
#[tokio::test]
async fn display_name_failure_does_not_block_the_profile() {
    let (auth, store, system) = system();
    auth.fail_next_display_name(AuthError::Unavailable("profile service down".to_string()));

    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.submit();
    settle(&mut screen).await;

    let user_id = screen.registered().expect("registration should still succeed").to_string();
    assert_eq!(auth.display_name_of(&user_id), None);
    assert_eq!(store.documents(USERS).len(), 1);
    assert!(screen.take_notices().is_empty());
}

/// When the profile write fails the attempt is reported as failed, but the
/// credential stands and the user stays signed in, which is what a retry
/// would find.
#[tokio::test]
async fn profile_write_failure_reports_but_keeps_the_credential() {
    let (auth, store, system) = system();
    store.fail_next(Mutation::Replace, StoreError::Unavailable("offline".to_string()));

    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.submit();
    settle(&mut screen).await;

    assert!(screen.registered().is_none());
    assert!(auth.current_user().is_some(), "the credential was created and signed in");
    assert!(store.documents(USERS).is_empty());
    assert_eq!(
        screen.take_notices(),
        vec![Notice::RegistrationFailed(RegisterError::Profile(StoreError::Unavailable(
            "offline".to_string()
        )))]
    );
}

/// Submitting again while an attempt is in flight is ignored.
#[tokio::test]
async fn submit_while_busy_is_ignored() {
    let (auth, _store, system) = system();
    let mut screen = system.register_screen();
    fill_valid(&mut screen);

    screen.submit();
    screen.submit();
    settle(&mut screen).await;

    assert!(screen.registered().is_some());
    assert_eq!(auth.credential_calls(), 1, "the second submit must not start a flow");
    assert_eq!(screen.pump(), 0, "no second outcome may be queued");
}

/// After registration the products screen opens for the new user and sees
/// their products.
#[tokio::test]
async fn registration_hands_off_to_the_products_screen() {
    let (_auth, store, system) = system();
    let mut screen = system.register_screen();
    fill_valid(&mut screen);
    screen.submit();
    settle(&mut screen).await;
    let user_id = screen.registered().expect("registration should succeed").to_string();

    let mut products = system.products_screen().expect("a signed-in user can open the screen");
    store.seed(
        PRODUCTS,
        "p1",
        Document::new().with_str("name", "Rice").with_str(FIELD_OWNER_ID, &user_id),
    );

    timeout(Duration::from_secs(1), async {
        while products.products().is_empty() {
            products.tick().await;
        }
    })
    .await
    .expect("the product should reach the listing");

    assert!(products.products().contains("p1"));
}
