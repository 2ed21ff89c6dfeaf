pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{ChallengeEntity, UserEntity, WidgetEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for challenges, users and widgets.
pub trait RecordStore: Send + Sync {
    fn insert_challenge(&self, challenge: ChallengeEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ChallengeEntity>>>;
    /// Challenges owned by `owner_id`, newest first.
    fn list_challenges(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<ChallengeEntity>>>;
    /// Replace the stored challenge only if its revision still equals `expected_revision`.
    ///
    /// Returns `false` when the record moved on (or vanished) in the meantime.
    fn replace_challenge(
        &self,
        challenge: ChallengeEntity,
        expected_revision: u64,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn delete_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    /// Create the user with this e-mail, or refresh the name/image of the existing one.
    fn upsert_user(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> BoxFuture<'static, StorageResult<UserEntity>>;
    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>>;

    fn insert_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WidgetEntity>>>;
    /// Widgets owned by `owner_id`, newest first.
    fn list_widgets(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<WidgetEntity>>>;
    fn save_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
