//! Contact store: owns the in-memory contact collection.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::models::{Contact, ContactDraft, ContactUpdate};
use crate::state::RequestPhase;
use crate::traits::documents::{DocumentStore, Filter, Permission, Sort};

/// Document attribute a contact's owner is stored under.
pub const OWNER_ATTRIBUTE: &str = "userId";

/// Observable contact-store state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactsState {
    /// Latest known server state, ordered by creation time descending.
    pub contacts: Vec<Contact>,
    /// True while a request is in flight.
    pub loading: bool,
    /// Message of the last failed request, cleared when a new one starts.
    pub error: Option<String>,
    /// Lifecycle of the most recent contact request.
    pub phase: RequestPhase,
}

/// Coordinator for contact CRUD requests.
///
/// Every operation requires a known owner identifier from the auth
/// coordinator; records are tagged with it on create and filtered by it on
/// fetch, so one user never sees another's contacts.
pub struct ContactStore<D> {
    store: Arc<D>,
    collection_id: String,
    state: ContactsState,
}

impl<D: DocumentStore> ContactStore<D> {
    /// Create a store over the given document backend and collection.
    pub fn new(store: Arc<D>, collection_id: impl Into<String>) -> Self {
        Self {
            store,
            collection_id: collection_id.into(),
            state: ContactsState::default(),
        }
    }

    /// Read-only view of the current state.
    pub fn state(&self) -> &ContactsState {
        &self.state
    }

    /// The in-memory collection, newest first.
    pub fn contacts(&self) -> &[Contact] {
        &self.state.contacts
    }

    fn begin(&mut self) {
        self.state.loading = true;
        self.state.error = None;
        self.state.phase = RequestPhase::Pending;
    }

    fn succeed(&mut self) {
        self.state.loading = false;
        self.state.phase = RequestPhase::Succeeded;
    }

    fn fail(&mut self, err: &StoreError) {
        self.state.error = Some(err.to_string());
        self.state.loading = false;
        self.state.phase = RequestPhase::Failed;
    }

    /// Replace the collection with all records owned by `owner_id`, newest
    /// first. On failure the collection is cleared.
    pub async fn fetch(&mut self, owner_id: &str) -> Result<(), StoreError> {
        self.begin();
        let filters = [Filter::equal(OWNER_ATTRIBUTE, owner_id)];
        let sort = [Sort::newest_first()];
        let outcome = self
            .store
            .list_documents(&self.collection_id, &filters, &sort)
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))
            .and_then(|docs| {
                docs.iter()
                    .map(Contact::from_document)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| StoreError::Fetch(e.to_string()))
            });

        match outcome {
            Ok(contacts) => {
                info!("fetched {} contacts", contacts.len());
                self.state.contacts = contacts;
                self.succeed();
                Ok(())
            }
            Err(err) => {
                warn!("fetch failed: {}", err);
                self.state.contacts.clear();
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Create a record tagged with `owner_id` and owner-only permissions;
    /// on success the created contact is prepended to the collection.
    pub async fn add(&mut self, draft: ContactDraft, owner_id: &str) -> Result<Contact, StoreError> {
        self.begin();
        if owner_id.trim().is_empty() {
            let err = StoreError::MissingOwner;
            self.fail(&err);
            return Err(err);
        }

        let fields = draft.to_fields(owner_id);
        let permissions = Permission::owner_only(owner_id);
        let outcome = self
            .store
            .create_document(&self.collection_id, fields, &permissions)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
            .and_then(|doc| {
                Contact::from_document(&doc).map_err(|e| StoreError::Write(e.to_string()))
            });

        match outcome {
            Ok(contact) => {
                info!("added contact {}", contact.id);
                self.state.contacts.insert(0, contact.clone());
                self.succeed();
                Ok(contact)
            }
            Err(err) => {
                warn!("add failed: {}", err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Replace the given fields of the record identified by `id`.
    ///
    /// On success the matching in-memory entry is replaced in place; when no
    /// entry matches locally the update is not reflected in the collection.
    pub async fn update(&mut self, id: &str, changes: ContactUpdate) -> Result<Contact, StoreError> {
        self.begin();
        let outcome = self
            .store
            .update_document(&self.collection_id, id, changes.to_fields())
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
            .and_then(|doc| {
                Contact::from_document(&doc).map_err(|e| StoreError::Write(e.to_string()))
            });

        match outcome {
            Ok(contact) => {
                info!("updated contact {}", contact.id);
                if let Some(entry) = self.state.contacts.iter_mut().find(|c| c.id == contact.id) {
                    *entry = contact.clone();
                }
                self.succeed();
                Ok(contact)
            }
            Err(err) => {
                warn!("update failed: {}", err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Delete the record identified by `id` and drop the matching in-memory
    /// entry. Deleting an id absent locally leaves the collection unchanged.
    pub async fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.begin();
        match self
            .store
            .delete_document(&self.collection_id, id)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
        {
            Ok(()) => {
                info!("deleted contact {}", id);
                self.state.contacts.retain(|c| c.id != id);
                self.succeed();
                Ok(())
            }
            Err(err) => {
                warn!("delete failed: {}", err);
                self.fail(&err);
                Err(err)
            }
        }
    }

    /// Clear the collection and flags unconditionally.
    ///
    /// Synchronous and infallible; invoked on logout so a previous user's
    /// contacts never leak into the next session.
    pub fn reset(&mut self) {
        self.state = ContactsState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryDocuments;
    use crate::models::Gender;

    const COLLECTION: &str = "contacts";

    fn store() -> ContactStore<InMemoryDocuments> {
        ContactStore::new(Arc::new(InMemoryDocuments::new()), COLLECTION)
    }

    fn draft(name: &str) -> ContactDraft {
        ContactDraft {
            name: name.to_string(),
            address: "1 Rd".to_string(),
            phone: "555".to_string(),
            gender: Gender::Male,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_add_prepends_and_preserves_descending_order() {
        let mut contacts = store();
        contacts.add(draft("First"), "u1").await.unwrap();
        contacts.add(draft("Second"), "u1").await.unwrap();
        contacts.add(draft("Third"), "u1").await.unwrap();

        let names: Vec<&str> = contacts.contacts().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Third", "Second", "First"]);
        assert_eq!(contacts.contacts().len(), 3);
        assert!(contacts
            .contacts()
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
    }

    #[tokio::test]
    async fn test_add_without_owner_is_a_precondition_error() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend.clone(), COLLECTION);

        let err = contacts.add(draft("Bob"), "").await.unwrap_err();
        assert_eq!(err, StoreError::MissingOwner);
        assert!(contacts.contacts().is_empty());
        // The precondition check fires before any backend call.
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_add_tags_record_with_owner() {
        let mut contacts = store();
        let contact = contacts.add(draft("Bob"), "u1").await.unwrap();
        assert_eq!(contact.owner_id, "u1");
        assert_eq!(contacts.contacts()[0].owner_id, "u1");
    }

    #[tokio::test]
    async fn test_fetch_replaces_collection_wholesale() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend.clone(), COLLECTION);
        contacts.add(draft("Mine"), "u1").await.unwrap();

        // Another client writes a record for a different owner.
        let mut other = ContactStore::new(backend.clone(), COLLECTION);
        other.add(draft("Theirs"), "u2").await.unwrap();

        contacts.fetch("u1").await.unwrap();
        assert_eq!(contacts.contacts().len(), 1);
        assert_eq!(contacts.contacts()[0].name, "Mine");
        assert!(contacts.contacts().iter().all(|c| c.owner_id == "u1"));
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_collection() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend.clone(), COLLECTION);
        contacts.add(draft("Bob"), "u1").await.unwrap();

        backend.fail_next("permission denied");
        let err = contacts.fetch("u1").await.unwrap_err();
        assert!(matches!(err, StoreError::Fetch(_)));
        assert!(contacts.contacts().is_empty());
        assert!(contacts.state().error.is_some());
    }

    #[tokio::test]
    async fn test_update_replaces_entry_in_place() {
        let mut contacts = store();
        contacts.add(draft("Ann"), "u1").await.unwrap();
        let target = contacts.add(draft("Bob"), "u1").await.unwrap();
        contacts.add(draft("Cid"), "u1").await.unwrap();

        contacts
            .update(&target.id, ContactUpdate::new().with_phone("556"))
            .await
            .unwrap();

        // Same position, updated field, untouched fields retained.
        assert_eq!(contacts.contacts()[1].id, target.id);
        assert_eq!(contacts.contacts()[1].phone, "556");
        assert_eq!(contacts.contacts()[1].name, "Bob");
        assert_eq!(contacts.contacts()[1].address, "1 Rd");
    }

    #[tokio::test]
    async fn test_update_then_fetch_round_trips() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend, COLLECTION);
        let target = contacts.add(draft("Bob"), "u1").await.unwrap();

        contacts
            .update(
                &target.id,
                ContactUpdate::new().with_name("Robert").with_phone("556"),
            )
            .await
            .unwrap();
        contacts.fetch("u1").await.unwrap();

        let fetched = &contacts.contacts()[0];
        assert_eq!(fetched.name, "Robert");
        assert_eq!(fetched.phone, "556");
        assert_eq!(fetched.address, "1 Rd");
        assert_eq!(fetched.gender, Gender::Male);
    }

    #[tokio::test]
    async fn test_update_of_locally_unknown_record_is_not_inserted() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut writer = ContactStore::new(backend.clone(), COLLECTION);
        let remote = writer.add(draft("Bob"), "u1").await.unwrap();

        // A second store that never fetched still succeeds remotely but its
        // local collection stays empty.
        let mut contacts = ContactStore::new(backend, COLLECTION);
        contacts
            .update(&remote.id, ContactUpdate::new().with_phone("556"))
            .await
            .unwrap();
        assert!(contacts.contacts().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_by_id() {
        let mut contacts = store();
        let first = contacts.add(draft("Ann"), "u1").await.unwrap();
        contacts.add(draft("Bob"), "u1").await.unwrap();

        contacts.delete(&first.id).await.unwrap();
        assert_eq!(contacts.contacts().len(), 1);
        assert_eq!(contacts.contacts()[0].name, "Bob");
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_collection_unchanged() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend.clone(), COLLECTION);
        let contact = contacts.add(draft("Bob"), "u1").await.unwrap();

        backend.fail_next("network down");
        let err = contacts.delete(&contact.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Write(_)));
        assert_eq!(contacts.contacts().len(), 1);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let backend = Arc::new(InMemoryDocuments::new());
        let mut contacts = ContactStore::new(backend.clone(), COLLECTION);
        contacts.add(draft("Bob"), "u1").await.unwrap();
        backend.fail_next("boom");
        let _ = contacts.fetch("u1").await;
        assert!(contacts.state().error.is_some());

        contacts.reset();
        assert!(contacts.contacts().is_empty());
        assert!(!contacts.state().loading);
        assert_eq!(contacts.state().error, None);
        assert_eq!(contacts.state().phase, RequestPhase::Idle);
    }
}
