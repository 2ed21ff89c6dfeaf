use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Win/loss challenge tracked for a user and displayed by overlay widgets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChallengeEntity {
    /// Primary key of the challenge.
    pub id: Uuid,
    /// Owning user; never changes after creation.
    pub owner_id: Uuid,
    /// Display label.
    pub name: String,
    /// Wins needed for a successful run (advisory only).
    pub win_goal: u32,
    /// Losses allowed before the current attempt ends.
    pub max_losses: u32,
    /// Wins in the attempt in progress.
    pub current_wins: u32,
    /// Losses in the attempt in progress.
    pub current_losses: u32,
    /// Wins of the best finished attempt.
    pub best_wins: u32,
    /// Losses of the best finished attempt.
    pub best_losses: u32,
    /// Number of attempts that have ended.
    pub total_attempts: u32,
    /// The attempt in progress was already counted by the loss that ended it.
    /// Stays set until the next reset, even if `max_losses` is raised afterwards.
    #[serde(default)]
    pub attempt_closed: bool,
    /// Soft enable flag toggled by the owner.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
    /// Monotonic write counter used for conditional replacement.
    pub revision: u64,
}

impl ChallengeEntity {
    /// Fresh challenge with zeroed counters.
    pub fn new(owner_id: Uuid, name: String, win_goal: u32, max_losses: u32) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            win_goal,
            max_losses,
            current_wins: 0,
            current_losses: 0,
            best_wins: 0,
            best_losses: 0,
            total_attempts: 0,
            attempt_closed: false,
            is_active: true,
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }
}

/// Registered user and the gaming/streaming identities linked to the account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEntity {
    /// Primary key of the user.
    pub id: Uuid,
    /// Unique e-mail used by the identity provider.
    pub email: String,
    /// Display name reported by the identity provider.
    pub name: Option<String>,
    /// Avatar URL reported by the identity provider.
    pub image: Option<String>,
    /// Account creation timestamp.
    pub created_at: SystemTime,
    /// Linked FACEIT nickname.
    pub faceit: Option<String>,
    /// Linked FACEIT player id.
    pub faceit_id: Option<String>,
    /// Linked Twitch channel.
    pub twitch: Option<String>,
    /// Linked Kick channel.
    pub kick: Option<String>,
}

impl UserEntity {
    /// Brand-new user without any linked identity.
    pub fn new(email: String, name: Option<String>, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            name,
            image,
            created_at: SystemTime::now(),
            faceit: None,
            faceit_id: None,
            twitch: None,
            kick: None,
        }
    }
}

/// Kind of overlay widget. Only FACEIT stats widgets exist for now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Player statistics card backed by the FACEIT Data API.
    FaceitStats,
}

impl WidgetKind {
    /// Path segment of the public widget page.
    pub fn slug(self) -> &'static str {
        match self {
            WidgetKind::FaceitStats => "faceit-stats",
        }
    }
}

/// Color palette applied by the widget page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Default palette.
    #[default]
    Blue,
    /// Violet palette.
    Violet,
    /// Green palette.
    Green,
    /// Red palette.
    Red,
}

impl ColorTheme {
    /// Query-string value understood by the widget page.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorTheme::Blue => "blue",
            ColorTheme::Violet => "violet",
            ColorTheme::Green => "green",
            ColorTheme::Red => "red",
        }
    }
}

/// Saved widget configuration together with its shareable URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetEntity {
    /// Primary key of the widget.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Widget kind.
    pub kind: WidgetKind,
    /// Display label in the dashboard.
    pub name: String,
    /// Whether the compact layout is used.
    pub compact: bool,
    /// Palette used by the widget page.
    pub color_theme: ColorTheme,
    /// Whether the player profile header is shown.
    pub show_profile: bool,
    /// FACEIT nickname displayed by the widget.
    pub faceit_username: Option<String>,
    /// URL to paste into the broadcast software.
    pub widget_url: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last mutation timestamp.
    pub updated_at: SystemTime,
}
