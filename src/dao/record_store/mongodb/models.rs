use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MongoDaoError;
use crate::dao::models::{ChallengeEntity, ColorTheme, UserEntity, WidgetEntity, WidgetKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoChallengeDocument {
    #[serde(rename = "_id")]
    id: String,
    owner_id: String,
    name: String,
    win_goal: i64,
    max_losses: i64,
    current_wins: i64,
    current_losses: i64,
    best_wins: i64,
    best_losses: i64,
    total_attempts: i64,
    #[serde(default)]
    attempt_closed: bool,
    is_active: bool,
    created_at: DateTime,
    updated_at: DateTime,
    revision: i64,
}

impl From<ChallengeEntity> for MongoChallengeDocument {
    fn from(value: ChallengeEntity) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            name: value.name,
            win_goal: value.win_goal.into(),
            max_losses: value.max_losses.into(),
            current_wins: value.current_wins.into(),
            current_losses: value.current_losses.into(),
            best_wins: value.best_wins.into(),
            best_losses: value.best_losses.into(),
            total_attempts: value.total_attempts.into(),
            attempt_closed: value.attempt_closed,
            is_active: value.is_active,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
            revision: revision_as_i64(value.revision),
        }
    }
}

impl TryFrom<MongoChallengeDocument> for ChallengeEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoChallengeDocument) -> Result<Self, Self::Error> {
        let id = &value.id;
        Ok(Self {
            id: parse_uuid(id, id)?,
            owner_id: parse_uuid(id, &value.owner_id)?,
            win_goal: counter(id, "win_goal", value.win_goal)?,
            max_losses: counter(id, "max_losses", value.max_losses)?,
            current_wins: counter(id, "current_wins", value.current_wins)?,
            current_losses: counter(id, "current_losses", value.current_losses)?,
            best_wins: counter(id, "best_wins", value.best_wins)?,
            best_losses: counter(id, "best_losses", value.best_losses)?,
            total_attempts: counter(id, "total_attempts", value.total_attempts)?,
            revision: u64::try_from(value.revision).map_err(|_| corrupt(id, "negative revision"))?,
            attempt_closed: value.attempt_closed,
            name: value.name,
            is_active: value.is_active,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoUserDocument {
    #[serde(rename = "_id")]
    id: String,
    email: String,
    name: Option<String>,
    image: Option<String>,
    created_at: DateTime,
    faceit: Option<String>,
    faceit_id: Option<String>,
    twitch: Option<String>,
    kick: Option<String>,
}

impl From<UserEntity> for MongoUserDocument {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email,
            name: value.name,
            image: value.image,
            created_at: DateTime::from_system_time(value.created_at),
            faceit: value.faceit,
            faceit_id: value.faceit_id,
            twitch: value.twitch,
            kick: value.kick,
        }
    }
}

impl TryFrom<MongoUserDocument> for UserEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoUserDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&value.id, &value.id)?,
            email: value.email,
            name: value.name,
            image: value.image,
            created_at: value.created_at.to_system_time(),
            faceit: value.faceit,
            faceit_id: value.faceit_id,
            twitch: value.twitch,
            kick: value.kick,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoWidgetDocument {
    #[serde(rename = "_id")]
    id: String,
    owner_id: String,
    kind: WidgetKind,
    name: String,
    compact: bool,
    color_theme: ColorTheme,
    show_profile: bool,
    faceit_username: Option<String>,
    widget_url: String,
    created_at: DateTime,
    updated_at: DateTime,
}

impl From<WidgetEntity> for MongoWidgetDocument {
    fn from(value: WidgetEntity) -> Self {
        Self {
            id: value.id.to_string(),
            owner_id: value.owner_id.to_string(),
            kind: value.kind,
            name: value.name,
            compact: value.compact,
            color_theme: value.color_theme,
            show_profile: value.show_profile,
            faceit_username: value.faceit_username,
            widget_url: value.widget_url,
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoWidgetDocument> for WidgetEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoWidgetDocument) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&value.id, &value.id)?,
            owner_id: parse_uuid(&value.id, &value.owner_id)?,
            kind: value.kind,
            name: value.name,
            compact: value.compact,
            color_theme: value.color_theme,
            show_profile: value.show_profile,
            faceit_username: value.faceit_username,
            widget_url: value.widget_url,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

pub fn owner_filter(owner_id: Uuid) -> Document {
    doc! {"owner_id": owner_id.to_string()}
}

pub fn revision_as_i64(revision: u64) -> i64 {
    i64::try_from(revision).unwrap_or(i64::MAX)
}

fn parse_uuid(doc_id: &str, raw: &str) -> Result<Uuid, MongoDaoError> {
    Uuid::parse_str(raw).map_err(|_| corrupt(doc_id, "invalid UUID"))
}

fn counter(doc_id: &str, field: &'static str, raw: i64) -> Result<u32, MongoDaoError> {
    u32::try_from(raw).map_err(|_| corrupt(doc_id, &format!("`{field}` out of range ({raw})")))
}

fn corrupt(doc_id: &str, reason: &str) -> MongoDaoError {
    MongoDaoError::CorruptDocument {
        id: doc_id.to_owned(),
        reason: reason.to_owned(),
    }
}
