//! Error types raised by the MongoDB record store.

use thiserror::Error;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// The connection string could not be parsed.
    #[error("invalid MongoDB URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    /// The driver refused to build a client from the options.
    #[error("failed to construct MongoDB client")]
    ClientConstruction {
        #[source]
        source: mongodb::error::Error,
    },
    /// The database never answered the initial ping.
    #[error("MongoDB did not answer after {attempts} ping attempts")]
    InitialPing {
        attempts: u32,
        #[source]
        source: mongodb::error::Error,
    },
    /// A health ping against an established connection failed.
    #[error("MongoDB health ping failed")]
    HealthPing {
        #[source]
        source: mongodb::error::Error,
    },
    /// Index creation failed.
    #[error("failed to ensure index `{index}` on `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// Reading documents failed.
    #[error("failed to read from `{collection}`")]
    Read {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    /// Writing a document failed.
    #[error("failed to write `{id}` into `{collection}`")]
    Write {
        collection: &'static str,
        id: String,
        #[source]
        source: mongodb::error::Error,
    },
    /// A stored document holds values that cannot be mapped onto an entity.
    #[error("corrupted document `{id}`: {reason}")]
    CorruptDocument { id: String, reason: String },
}
