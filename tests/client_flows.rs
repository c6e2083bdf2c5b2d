//! End-to-end flows over the in-memory adapters.

use std::sync::Arc;

use rolodex::adapters::mock::{InMemoryBlobs, InMemoryDocuments, InMemoryIdentity};
use rolodex::app::{App, Image};
use rolodex::error::{AppError, StoreError};
use rolodex::models::{ContactDraft, ContactUpdate, Gender};
use rolodex::state::RequestPhase;

type MockApp = App<InMemoryIdentity, InMemoryDocuments, InMemoryBlobs>;

struct Backend {
    identity: Arc<InMemoryIdentity>,
    documents: Arc<InMemoryDocuments>,
    blobs: Arc<InMemoryBlobs>,
}

impl Backend {
    fn new() -> Self {
        Self {
            identity: Arc::new(InMemoryIdentity::new()),
            documents: Arc::new(InMemoryDocuments::new()),
            blobs: Arc::new(InMemoryBlobs::new()),
        }
    }

    fn app(&self) -> MockApp {
        App::new(
            self.identity.clone(),
            self.documents.clone(),
            self.blobs.clone(),
            "contacts",
            "photos",
        )
    }
}

fn draft(name: &str) -> ContactDraft {
    ContactDraft {
        name: name.to_string(),
        address: "1 Rd".to_string(),
        phone: "555".to_string(),
        gender: Gender::Other,
        image_url: None,
    }
}

#[tokio::test]
async fn test_first_launch_settles_unauthenticated() {
    let backend = Backend::new();
    let mut app = backend.app();

    assert!(app.auth.state().loading);
    let resumed = app.bootstrap().await;

    assert_eq!(resumed, None);
    assert!(!app.auth.is_authenticated());
    assert!(!app.auth.state().loading);
    assert_eq!(app.auth.state().error, None);
}

#[tokio::test]
async fn test_full_contact_lifecycle() {
    let backend = Backend::new();
    let mut app = backend.app();
    app.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();

    let a = app.add_contact(draft("Alpha"), None).await.unwrap();
    let b = app.add_contact(draft("Beta"), None).await.unwrap();
    app.add_contact(draft("Gamma"), None).await.unwrap();

    app.refresh_contacts().await.unwrap();
    let names: Vec<&str> = app.contacts.contacts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Gamma", "Beta", "Alpha"]);

    app.update_contact(&b.id, ContactUpdate::new().with_phone("556"), None)
        .await
        .unwrap();
    app.delete_contact(&a.id).await.unwrap();

    app.refresh_contacts().await.unwrap();
    let names: Vec<&str> = app.contacts.contacts().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Gamma", "Beta"]);
    assert_eq!(app.contacts.contacts()[1].phone, "556");
    assert_eq!(app.contacts.state().phase, RequestPhase::Succeeded);
}

#[tokio::test]
async fn test_users_never_see_each_others_contacts() {
    let backend = Backend::new();

    let mut ada = backend.app();
    ada.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();
    ada.add_contact(draft("AdaFriend"), None).await.unwrap();
    ada.log_out().await;

    let mut bob = backend.app();
    bob.auth.sign_up("bob@x.com", "pw123456", "Bob").await.unwrap();
    bob.add_contact(draft("BobFriend"), None).await.unwrap();
    bob.refresh_contacts().await.unwrap();

    assert_eq!(bob.contacts.contacts().len(), 1);
    assert_eq!(bob.contacts.contacts()[0].name, "BobFriend");
}

#[tokio::test]
async fn test_failed_login_then_successful_retry() {
    let backend = Backend::new();
    backend.identity.register("ada@x.com", "pw123456", "Ada");
    let mut app = backend.app();

    app.auth.log_in("ada@x.com", "wrong").await.unwrap_err();
    assert!(!app.auth.is_authenticated());
    assert!(app.auth.state().error.is_some());
    assert_eq!(app.auth.state().phase, RequestPhase::Failed);

    app.auth.log_in("ada@x.com", "pw123456").await.unwrap();
    assert!(app.auth.is_authenticated());
    assert_eq!(app.auth.state().error, None);
    assert_eq!(app.auth.state().phase, RequestPhase::Succeeded);
}

#[tokio::test]
async fn test_resume_after_restart_restores_contacts_access() {
    let backend = Backend::new();

    let mut first = backend.app();
    first
        .auth
        .sign_up("ada@x.com", "pw123456", "Ada")
        .await
        .unwrap();
    first.add_contact(draft("Friend"), None).await.unwrap();

    // A new app over the same backend stands in for a process restart; the
    // provider still holds the session.
    let mut second = backend.app();
    let resumed = second.bootstrap().await.unwrap();
    assert_eq!(resumed.email, "ada@x.com");

    second.refresh_contacts().await.unwrap();
    assert_eq!(second.contacts.contacts().len(), 1);
}

#[tokio::test]
async fn test_logout_clears_contacts_and_blocks_further_writes() {
    let backend = Backend::new();
    let mut app = backend.app();
    app.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();
    app.add_contact(draft("Friend"), None).await.unwrap();

    app.log_out().await;
    assert!(app.contacts.contacts().is_empty());

    let err = app.add_contact(draft("Another"), None).await.unwrap_err();
    assert_eq!(err, AppError::Store(StoreError::MissingOwner));
}

#[tokio::test]
async fn test_delete_of_remote_unknown_id_is_a_write_error() {
    let backend = Backend::new();
    let mut app = backend.app();
    app.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();
    app.add_contact(draft("Friend"), None).await.unwrap();

    let err = app.delete_contact("no-such-id").await.unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Write(_))));
    // The local collection keeps what the backend still holds.
    assert_eq!(app.contacts.contacts().len(), 1);
}

#[tokio::test]
async fn test_contact_with_photo_round_trips_through_blob_store() {
    let backend = Backend::new();
    let mut app = backend.app();
    app.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();

    let image = Image {
        filename: "ada.png".to_string(),
        bytes: bytes::Bytes::from_static(b"pixels"),
    };
    let contact = app.add_contact(draft("Friend"), Some(image)).await.unwrap();
    let url = contact.image_url.clone().unwrap();
    assert!(url.starts_with("mock://photos/"));

    app.refresh_contacts().await.unwrap();
    assert_eq!(app.contacts.contacts()[0].image_url.as_ref(), Some(&url));
    assert_eq!(backend.blobs.upload_count(), 1);
}

#[tokio::test]
async fn test_created_records_carry_owner_only_permissions() {
    let backend = Backend::new();
    let mut app = backend.app();
    app.auth.sign_up("ada@x.com", "pw123456", "Ada").await.unwrap();
    let contact = app.add_contact(draft("Friend"), None).await.unwrap();

    let owner = app.auth.session().user_id().unwrap().to_string();
    let permissions = backend.documents.permissions_for(&contact.id).unwrap();
    let rendered: Vec<String> = permissions.iter().map(|p| p.to_string()).collect();
    for verb in ["read", "write", "update", "delete"] {
        assert!(rendered.contains(&format!("{}(\"user:{}\")", verb, owner)));
    }
}
