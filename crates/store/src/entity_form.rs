//! Create / update / delete flow shared by the entity edit pages.
//!
//! An [`EntityForm`] drives one entity's store operations through
//! [`EntityActions`], then reports the outcome to the user and redirects
//! on success.

use async_trait::async_trait;
use gigbook_api::{Api, Festival, FestivalId, Gig, GigId, UpsertFestivalRequest, UpsertGigRequest};

use crate::gig_store::GigStore;
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;

/// Fallback text when a failed save left no error message.
pub const GENERIC_ERROR: &str = "An error occurred";

/// Store operations and state an [`EntityForm`] works against.
#[async_trait]
pub trait EntityActions: Send + Sync {
    type Entity: Clone + Send + Sync;
    type Id: Send + Sync;
    type Payload: Send + Sync;

    async fn get(&self, id: &Self::Id) -> Option<Self::Entity>;

    async fn create(&self, payload: &Self::Payload) -> Option<Self::Entity>;

    async fn update(&self, id: &Self::Id, payload: &Self::Payload) -> Option<Self::Entity>;

    async fn delete(&self, id: &Self::Id);

    /// Entity loaded by the last `get`.
    fn entity(&self) -> Option<Self::Entity>;

    /// Error of the last `get`.
    fn error(&self) -> Option<String>;

    fn loading(&self) -> bool;

    /// Error of the last create, update or delete.
    fn save_error(&self) -> Option<String>;
}

/// Save, remove and fetch with notifications and a redirect.
pub struct EntityForm<'a, E> {
    actions: E,
    notifier: &'a dyn Notifier,
    navigator: &'a dyn Navigator,
    redirect: Route,
}

impl<'a, E: EntityActions> EntityForm<'a, E> {
    pub fn new(
        actions: E,
        notifier: &'a dyn Notifier,
        navigator: &'a dyn Navigator,
        redirect: Route,
    ) -> Self {
        Self {
            actions,
            notifier,
            navigator,
            redirect,
        }
    }

    pub fn actions(&self) -> &E {
        &self.actions
    }

    /// Update when `is_update` and an id is given, create otherwise.
    ///
    /// Success needs both a response and no save error. Returns the saved
    /// entity on success.
    pub async fn save(
        &self,
        id: Option<&E::Id>,
        payload: &E::Payload,
        is_update: bool,
    ) -> Option<E::Entity> {
        let response = match id.filter(|_| is_update) {
            Some(id) => self.actions.update(id, payload).await,
            None => self.actions.create(payload).await,
        };

        match (self.actions.save_error(), response) {
            (None, Some(entity)) => {
                self.navigator.push(self.redirect.clone());
                let verb = if is_update { "Updated" } else { "Created" };
                self.notifier
                    .display_success_notification(&format!("{verb} successfully"));
                Some(entity)
            }
            (error, _) => {
                self.notifier
                    .display_error_notification(error.as_deref().unwrap_or(GENERIC_ERROR));
                None
            }
        }
    }

    /// Delete and redirect. Returns whether the delete succeeded.
    pub async fn remove(&self, id: &E::Id) -> bool {
        self.actions.delete(id).await;

        match self.actions.save_error() {
            None => {
                self.navigator.push(self.redirect.clone());
                self.notifier
                    .display_success_notification("Deleted successfully");
                true
            }
            Some(error) => {
                self.notifier.display_error_notification(&error);
                false
            }
        }
    }

    /// Load the entity, notifying when the load failed.
    pub async fn fetch(&self, id: &E::Id) -> Option<E::Entity> {
        self.actions.get(id).await;
        if let Some(error) = self.actions.error() {
            self.notifier.display_error_notification(&error);
        }
        self.actions.entity()
    }
}

/// Gig operations of a [`GigStore`].
pub struct GigActions<'a, A> {
    store: &'a GigStore<A>,
}

impl<'a, A> GigActions<'a, A> {
    pub fn new(store: &'a GigStore<A>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a, A: Api> EntityActions for GigActions<'a, A> {
    type Entity = Gig;
    type Id = GigId;
    type Payload = UpsertGigRequest;

    async fn get(&self, id: &GigId) -> Option<Gig> {
        self.store.load_gig(id).await
    }

    async fn create(&self, payload: &UpsertGigRequest) -> Option<Gig> {
        self.store.create_gig(payload).await
    }

    async fn update(&self, id: &GigId, payload: &UpsertGigRequest) -> Option<Gig> {
        self.store.update_gig(id, payload).await
    }

    async fn delete(&self, id: &GigId) {
        self.store.delete_gig(id).await;
    }

    fn entity(&self) -> Option<Gig> {
        self.store.gig_detail().data()
    }

    fn error(&self) -> Option<String> {
        self.store.gig_detail().error()
    }

    fn loading(&self) -> bool {
        self.store.gig_detail().is_loading()
    }

    fn save_error(&self) -> Option<String> {
        self.store.save_error()
    }
}

/// Festival operations of a [`GigStore`].
pub struct FestivalActions<'a, A> {
    store: &'a GigStore<A>,
}

impl<'a, A> FestivalActions<'a, A> {
    pub fn new(store: &'a GigStore<A>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<'a, A: Api> EntityActions for FestivalActions<'a, A> {
    type Entity = Festival;
    type Id = FestivalId;
    type Payload = UpsertFestivalRequest;

    async fn get(&self, id: &FestivalId) -> Option<Festival> {
        self.store.load_festival(id).await
    }

    async fn create(&self, payload: &UpsertFestivalRequest) -> Option<Festival> {
        self.store.create_festival(payload).await
    }

    async fn update(&self, id: &FestivalId, payload: &UpsertFestivalRequest) -> Option<Festival> {
        self.store.update_festival(id, payload).await
    }

    async fn delete(&self, id: &FestivalId) {
        self.store.delete_festival(id).await;
    }

    fn entity(&self) -> Option<Festival> {
        self.store.festival_detail().data()
    }

    fn error(&self) -> Option<String> {
        self.store.festival_detail().error()
    }

    fn loading(&self) -> bool {
        self.store.festival_detail().is_loading()
    }

    fn save_error(&self) -> Option<String> {
        self.store.festival_save_error()
    }
}
