use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Bson, DateTime, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::open_database,
    error::{MongoDaoError, MongoResult},
    models::{
        MongoChallengeDocument, MongoUserDocument, MongoWidgetDocument, doc_id, owner_filter,
        revision_as_i64,
    },
};
use crate::dao::{
    models::{ChallengeEntity, UserEntity, WidgetEntity},
    record_store::RecordStore,
    storage::StorageResult,
};

const CHALLENGE_COLLECTION_NAME: &str = "challenges";
const USER_COLLECTION_NAME: &str = "users";
const WIDGET_COLLECTION_NAME: &str = "widgets";

/// [`RecordStore`] persisting every record in MongoDB collections.
#[derive(Clone)]
pub struct MongoRecordStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    // Kept so the driver pool lives as long as the database handle.
    _client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = open_database(&self.config).await?;
        let mut guard = self.state.write().await;
        guard._client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoRecordStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open_database(&config).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState {
                _client: client,
                database,
            }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let challenge_index = IndexModel::builder()
            .keys(doc! {"owner_id": 1, "created_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("challenge_owner_idx".to_owned()))
                    .build(),
            )
            .build();
        database
            .collection::<Document>(CHALLENGE_COLLECTION_NAME)
            .create_index(challenge_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: CHALLENGE_COLLECTION_NAME,
                index: "owner_id,created_at",
                source,
            })?;

        let widget_index = IndexModel::builder()
            .keys(doc! {"owner_id": 1, "created_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("widget_owner_idx".to_owned()))
                    .build(),
            )
            .build();
        database
            .collection::<Document>(WIDGET_COLLECTION_NAME)
            .create_index(widget_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: WIDGET_COLLECTION_NAME,
                index: "owner_id,created_at",
                source,
            })?;

        let email_index = IndexModel::builder()
            .keys(doc! {"email": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("user_email_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        database
            .collection::<Document>(USER_COLLECTION_NAME)
            .create_index(email_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: USER_COLLECTION_NAME,
                index: "email",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn challenges(&self) -> Collection<MongoChallengeDocument> {
        self.database()
            .await
            .collection::<MongoChallengeDocument>(CHALLENGE_COLLECTION_NAME)
    }

    async fn users(&self) -> Collection<MongoUserDocument> {
        self.database()
            .await
            .collection::<MongoUserDocument>(USER_COLLECTION_NAME)
    }

    async fn widgets(&self) -> Collection<MongoWidgetDocument> {
        self.database()
            .await
            .collection::<MongoWidgetDocument>(WIDGET_COLLECTION_NAME)
    }

    async fn insert_challenge(&self, challenge: ChallengeEntity) -> MongoResult<()> {
        let id = challenge.id;
        let document: MongoChallengeDocument = challenge.into();
        self.challenges()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| write_error(CHALLENGE_COLLECTION_NAME, id, source))?;
        Ok(())
    }

    async fn find_challenge(&self, id: Uuid) -> MongoResult<Option<ChallengeEntity>> {
        let document = self
            .challenges()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| read_error(CHALLENGE_COLLECTION_NAME, source))?;

        document.map(TryInto::try_into).transpose()
    }

    async fn list_challenges(&self, owner_id: Uuid) -> MongoResult<Vec<ChallengeEntity>> {
        let documents: Vec<MongoChallengeDocument> = self
            .challenges()
            .await
            .find(owner_filter(owner_id))
            .sort(doc! {"created_at": -1})
            .await
            .map_err(|source| read_error(CHALLENGE_COLLECTION_NAME, source))?
            .try_collect()
            .await
            .map_err(|source| read_error(CHALLENGE_COLLECTION_NAME, source))?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn replace_challenge(
        &self,
        challenge: ChallengeEntity,
        expected_revision: u64,
    ) -> MongoResult<bool> {
        let id = challenge.id;
        let mut filter = doc_id(id);
        filter.insert("revision", revision_as_i64(expected_revision));

        let document: MongoChallengeDocument = challenge.into();
        let result = self
            .challenges()
            .await
            .replace_one(filter, &document)
            .await
            .map_err(|source| write_error(CHALLENGE_COLLECTION_NAME, id, source))?;

        Ok(result.matched_count == 1)
    }

    async fn delete_challenge(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .challenges()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| write_error(CHALLENGE_COLLECTION_NAME, id, source))?;
        Ok(result.deleted_count > 0)
    }

    /// Single round-trip upsert so concurrent sign-ins of the same e-mail converge on one user.
    async fn upsert_user(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> MongoResult<UserEntity> {
        let fresh = UserEntity::new(email.clone(), None, None);
        let update = doc! {
            "$set": { "name": name, "image": image },
            "$setOnInsert": {
                "_id": fresh.id.to_string(),
                "created_at": DateTime::from_system_time(fresh.created_at),
                "faceit": Bson::Null,
                "faceit_id": Bson::Null,
                "twitch": Bson::Null,
                "kick": Bson::Null,
            },
        };

        let document = self
            .users()
            .await
            .find_one_and_update(doc! {"email": email.as_str()}, update)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: USER_COLLECTION_NAME,
                id: email.clone(),
                source,
            })?
            .ok_or_else(|| MongoDaoError::CorruptDocument {
                id: email,
                reason: "upsert returned no document".into(),
            })?;

        document.try_into()
    }

    async fn find_user(&self, id: Uuid) -> MongoResult<Option<UserEntity>> {
        let document = self
            .users()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| read_error(USER_COLLECTION_NAME, source))?;

        document.map(TryInto::try_into).transpose()
    }

    async fn save_user(&self, user: UserEntity) -> MongoResult<()> {
        let id = user.id;
        let document: MongoUserDocument = user.into();
        self.users()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| write_error(USER_COLLECTION_NAME, id, source))?;
        Ok(())
    }

    async fn insert_widget(&self, widget: WidgetEntity) -> MongoResult<()> {
        let id = widget.id;
        let document: MongoWidgetDocument = widget.into();
        self.widgets()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| write_error(WIDGET_COLLECTION_NAME, id, source))?;
        Ok(())
    }

    async fn find_widget(&self, id: Uuid) -> MongoResult<Option<WidgetEntity>> {
        let document = self
            .widgets()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| read_error(WIDGET_COLLECTION_NAME, source))?;

        document.map(TryInto::try_into).transpose()
    }

    async fn list_widgets(&self, owner_id: Uuid) -> MongoResult<Vec<WidgetEntity>> {
        let documents: Vec<MongoWidgetDocument> = self
            .widgets()
            .await
            .find(owner_filter(owner_id))
            .sort(doc! {"created_at": -1})
            .await
            .map_err(|source| read_error(WIDGET_COLLECTION_NAME, source))?
            .try_collect()
            .await
            .map_err(|source| read_error(WIDGET_COLLECTION_NAME, source))?;

        documents.into_iter().map(TryInto::try_into).collect()
    }

    async fn save_widget(&self, widget: WidgetEntity) -> MongoResult<()> {
        let id = widget.id;
        let document: MongoWidgetDocument = widget.into();
        self.widgets()
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| write_error(WIDGET_COLLECTION_NAME, id, source))?;
        Ok(())
    }

    async fn delete_widget(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .widgets()
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| write_error(WIDGET_COLLECTION_NAME, id, source))?;
        Ok(result.deleted_count > 0)
    }
}

fn read_error(collection: &'static str, source: mongodb::error::Error) -> MongoDaoError {
    MongoDaoError::Read { collection, source }
}

fn write_error(collection: &'static str, id: Uuid, source: mongodb::error::Error) -> MongoDaoError {
    MongoDaoError::Write {
        collection,
        id: id.to_string(),
        source,
    }
}

impl RecordStore for MongoRecordStore {
    fn insert_challenge(&self, challenge: ChallengeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_challenge(challenge).await.map_err(Into::into) })
    }

    fn find_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ChallengeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_challenge(id).await.map_err(Into::into) })
    }

    fn list_challenges(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<ChallengeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_challenges(owner_id).await.map_err(Into::into) })
    }

    fn replace_challenge(
        &self,
        challenge: ChallengeEntity,
        expected_revision: u64,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .replace_challenge(challenge, expected_revision)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_challenge(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_challenge(id).await.map_err(Into::into) })
    }

    fn upsert_user(
        &self,
        email: String,
        name: Option<String>,
        image: Option<String>,
    ) -> BoxFuture<'static, StorageResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .upsert_user(email, name, image)
                .await
                .map_err(Into::into)
        })
    }

    fn find_user(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user(id).await.map_err(Into::into) })
    }

    fn save_user(&self, user: UserEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_user(user).await.map_err(Into::into) })
    }

    fn insert_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_widget(widget).await.map_err(Into::into) })
    }

    fn find_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WidgetEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_widget(id).await.map_err(Into::into) })
    }

    fn list_widgets(&self, owner_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<WidgetEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_widgets(owner_id).await.map_err(Into::into) })
    }

    fn save_widget(&self, widget: WidgetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_widget(widget).await.map_err(Into::into) })
    }

    fn delete_widget(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_widget(id).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
