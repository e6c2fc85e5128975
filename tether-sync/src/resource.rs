use crate::Entity;
use async_trait::async_trait;
use tether_model::{EntitySchema, SyncState};
use tether_types::{ApiResult, EntityId};
use tracing::warn;

/// A typed object backed by an [`Entity`].
///
/// Implementors supply the schema and access to the wrapped entity. The
/// hooks are optional; most types need none of them.
///
/// Only implement a hook if you need:
/// - Local validation before anything is sent (`validate`)
/// - Dependent fetches, e.g. a referenced picture (`after_fetch`)
/// - Sub-resource saves as part of the parent's save (`save_dependents`)
#[async_trait]
pub trait Resource: Sized + Send + Sync + 'static {
    fn schema() -> &'static EntitySchema;

    fn from_entity(entity: Entity) -> Self;

    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    /// Checks local state before a save. An error stops the save before any
    /// request is made.
    fn validate(&self) -> ApiResult<()> {
        Ok(())
    }

    /// Runs after a successful fetch, before the fetch returns. A failure is
    /// logged and does not change the fetch result.
    async fn after_fetch(&mut self) -> ApiResult<()> {
        Ok(())
    }

    /// Saves sub-resources after the object itself. Every sub-resource save
    /// should be attempted; return the first failure.
    async fn save_dependents(&mut self) -> ApiResult<()> {
        Ok(())
    }

    /// Fetches the object, then runs [`Resource::after_fetch`].
    ///
    /// The entity stays in flight until the hook finishes.
    ///
    /// # Panics
    ///
    /// Panics if the object has no id.
    async fn fetch(&mut self) -> ApiResult<bool> {
        let _guard = self.entity().enter_in_flight();
        let fetched = self.entity_mut().fetch().await?;
        if let Err(e) = self.after_fetch().await {
            warn!(
                "Dependent fetch for {} {} failed: {e}",
                Self::schema().entity_type,
                self.id().map(EntityId::as_str).unwrap_or_default()
            );
        }
        Ok(fetched)
    }

    /// Validates, saves the object, then saves its sub-resources.
    ///
    /// Sub-resources are saved even when the object's own save failed.
    /// Requests that already succeeded are not undone.
    ///
    /// # Errors
    ///
    /// A validation failure is returned before anything is sent. When both
    /// the object's save and a sub-resource save fail, the object's error is
    /// returned and the sub-resource error is dropped.
    async fn save(&mut self) -> ApiResult<bool> {
        self.validate()?;
        let _guard = self.entity().enter_in_flight();
        let saved = self.entity_mut().save().await;
        let dependents = self.save_dependents().await;
        let saved = saved?;
        dependents?;
        Ok(saved)
    }

    /// # Panics
    ///
    /// Panics if the object has no id.
    async fn delete(&mut self) -> ApiResult<bool> {
        self.entity_mut().delete().await
    }

    fn id(&self) -> Option<&EntityId> {
        self.entity().id()
    }

    fn sync_state(&self) -> SyncState {
        self.entity().sync_state()
    }
}
