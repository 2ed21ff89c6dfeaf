//! Process-local record store used for development and tests.

use std::{cmp::Reverse, sync::Arc};

use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, ready};
use uuid::Uuid;

use crate::dao::{
    models::{ChallengeEntity, UserEntity, WidgetEntity},
    record_store::RecordStore,
    storage::StorageResult,
};

/// [`RecordStore`] keeping every record in concurrent hash maps.
///
/// Conditional challenge replacement is evaluated while holding the shard
/// lock of the entry, so it behaves like a single-row compare-and-swap.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    challenges: DashMap<Uuid, ChallengeEntity>,
    users: DashMap<Uuid, UserEntity>,
    user_ids_by_email: DashMap<String, Uuid>,
    widgets: DashMap<Uuid, WidgetEntity>,
}

impl MemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn replace_challenge_now(&self, challenge: ChallengeEntity, expected_revision: u64) -> bool {
        match self.inner.challenges.get_mut(&challenge.id) {
            Some(mut stored) if stored.revision == expected_revision => {
                *stored = challenge;
                true
            }
            _ => false,
        }
    }

    fn upsert_user_now(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> UserEntity {
        let id = *self
            .inner
            .user_ids_by_email
            .entry(email.clone())
            .or_insert_with(Uuid::new_v4);

        self.inner
            .users
            .entry(id)
            .and_modify(|user| {
                user.name = name.clone();
                user.image = image.clone();
            })
            .or_insert_with(|| UserEntity {
                id,
                ..UserEntity::new(email, name, image)
            })
            .clone()
    }

    fn list_challenges_now(&self, owner_id: Uuid) -> Vec<ChallengeEntity> {
        let mut challenges: Vec<ChallengeEntity> = self
            .inner
            .challenges
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        challenges.sort_by_key(|challenge| Reverse(challenge.created_at));
        challenges
    }

    fn list_widgets_now(&self, owner_id: Uuid) -> Vec<WidgetEntity> {
        let mut widgets: Vec<WidgetEntity> = self
            .inner
            .widgets
            .iter()
            .filter(|entry| entry.owner_id == owner_id)
            .map(|entry| entry.value().clone())
            .collect();
        widgets.sort_by_key(|widget| Reverse(widget.created_at));
        widgets
    }
}

fn done<T: Send + 'static>(value: T) -> BoxFuture<'static, StorageResult<T>> {
    ready(Ok(value)).boxed()
}

impl RecordStore for MemoryRecordStore {
    fn insert_challenge(&self, challenge: ChallengeEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.challenges.insert(challenge.id, challenge);
        done(())
    }

    fn find_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ChallengeEntity>>> {
        done(self.inner.challenges.get(&id).map(|entry| entry.clone()))
    }

    fn list_challenges(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<ChallengeEntity>>> {
        done(self.list_challenges_now(owner_id))
    }

    fn replace_challenge(
        &self,
        challenge: ChallengeEntity,
        expected_revision: u64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        done(self.replace_challenge_now(challenge, expected_revision))
    }

    fn delete_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        done(self.inner.challenges.remove(&id).is_some())
    }

    fn upsert_user(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> BoxFuture<'static, StorageResult<UserEntity>> {
        done(self.upsert_user_now(email, name, image))
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        done(self.inner.users.get(&id).map(|entry| entry.clone()))
    }

    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.users.insert(user.id, user);
        done(())
    }

    fn insert_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.widgets.insert(widget.id, widget);
        done(())
    }

    fn find_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WidgetEntity>>> {
        done(self.inner.widgets.get(&id).map(|entry| entry.clone()))
    }

    fn list_widgets(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<WidgetEntity>>> {
        done(self.list_widgets_now(owner_id))
    }

    fn save_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.widgets.insert(widget.id, widget);
        done(())
    }

    fn delete_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        done(self.inner.widgets.remove(&id).is_some())
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        done(())
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        done(())
    }
}
