//! DTO definitions for the FACEIT proxy endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::dao::faceit::models::FaceitPlayer;

/// Query of `GET /faceit`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayerQuery {
    /// FACEIT nickname to look up.
    pub nickname: Option<String>,
}

/// Query of the stats endpoints; the caller's linked nickname is used when omitted.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsernameQuery {
    pub username: Option<String>,
}

/// Condensed FACEIT profile.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaceitPlayerDto {
    pub player_id: String,
    pub nickname: String,
    pub avatar: Option<String>,
    pub country: Option<String>,
    pub faceit_level: Option<u32>,
    pub faceit_elo: Option<u32>,
}

impl From<FaceitPlayer> for FaceitPlayerDto {
    fn from(player: FaceitPlayer) -> Self {
        Self {
            faceit_level: player.skill_level(),
            faceit_elo: player.faceit_elo(),
            player_id: player.player_id,
            nickname: player.nickname,
            avatar: player.avatar.filter(|avatar| !avatar.is_empty()),
            country: player.country,
        }
    }
}

/// Aggregate over the most recent CS2 matches.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentMatchesDto {
    pub kills: u64,
    pub deaths: u64,
    pub wins: u64,
    pub loses: u64,
    pub match_count: u64,
    /// Kill/death ratio rounded to two decimals.
    pub kd: f64,
    /// Average headshot percentage, rounded.
    pub hs_percent: f64,
    /// Percentage of matches won, rounded.
    pub win_rate: f64,
    pub av_kills: f64,
    pub av_deaths: f64,
    pub av_assists: f64,
    /// Elo after the most recent match.
    pub elo: Option<i64>,
    /// Raw stats of the most recent match.
    #[schema(value_type = Option<Object>)]
    pub last_game_stats: Option<Map<String, Value>>,
}
