//! FACEIT lookups exposed to the dashboard and the stats widgets.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    dao::{faceit::models::MatchStatsItem, models::UserEntity},
    dto::{
        faceit::{FaceitPlayerDto, RecentMatchesDto},
        validation::normalize_optional,
    },
    error::ServiceError,
    state::SharedState,
};

/// Matches aggregated by [`recent_matches`].
pub const RECENT_MATCH_LIMIT: u32 = 30;

pub async fn find_player(
    state: &SharedState,
    nickname: Option<String>,
) -> Result<FaceitPlayerDto, ServiceError> {
    let nickname = normalize_optional(nickname)
        .ok_or_else(|| ServiceError::InvalidInput("Nickname parameter is required".into()))?;
    let player = state.faceit().find_player(&nickname).await?;
    Ok(player.into())
}

/// Nickname from the query string, else the one linked to the caller's profile.
pub fn resolve_username(
    query: Option<String>,
    caller: Option<&UserEntity>,
) -> Result<String, ServiceError> {
    if let Some(username) = normalize_optional(query) {
        return Ok(username);
    }

    let Some(caller) = caller else {
        return Err(ServiceError::InvalidInput(
            "Username parameter required or authentication needed".into(),
        ));
    };

    caller
        .faceit
        .as_deref()
        .map(str::trim)
        .filter(|nickname| !nickname.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            ServiceError::InvalidInput(
                "No Faceit username found. Please set your Faceit username in settings or provide username parameter."
                    .into(),
            )
        })
}

/// Lifetime CS2 statistics, passed through untouched.
pub async fn lifetime_stats(state: &SharedState, nickname: &str) -> Result<Value, ServiceError> {
    let player = state.faceit().find_player(nickname).await?;
    let stats = state.faceit().lifetime_stats(&player.player_id).await?;
    Ok(stats)
}

/// Aggregate of the last [`RECENT_MATCH_LIMIT`] CS2 matches.
pub async fn recent_matches(
    state: &SharedState,
    nickname: &str,
) -> Result<RecentMatchesDto, ServiceError> {
    let player = state.faceit().find_player(nickname).await?;
    let items = state
        .faceit()
        .recent_matches(&player.player_id, RECENT_MATCH_LIMIT)
        .await?;
    debug!(nickname, matches = items.len(), "fetched recent FACEIT matches");
    Ok(aggregate_matches(&items))
}

/// Numeric value of a stat; FACEIT sends most of them as strings. Anything unparsable counts as zero.
fn stat(stats: &Map<String, Value>, key: &str) -> f64 {
    let value = match stats.get(key) {
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        Some(Value::Number(number)) => number.as_f64(),
        _ => None,
    };
    value.filter(|value| value.is_finite()).unwrap_or(0.0)
}

fn count(stats: &Map<String, Value>, key: &str) -> u64 {
    stat(stats, key).max(0.0).trunc() as u64
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Sum and average per-match statistics. `items` is ordered newest first.
pub fn aggregate_matches(items: &[MatchStatsItem]) -> RecentMatchesDto {
    let mut kills = 0u64;
    let mut deaths = 0u64;
    let mut assists = 0u64;
    let mut wins = 0u64;
    let mut headshots = 0.0;

    for item in items {
        kills = kills.saturating_add(count(&item.stats, "Kills"));
        deaths = deaths.saturating_add(count(&item.stats, "Deaths"));
        assists = assists.saturating_add(count(&item.stats, "Assists"));
        headshots += stat(&item.stats, "Headshots %");
        if stat(&item.stats, "Result") == 1.0 {
            wins += 1;
        }
    }

    let match_count = items.len() as u64;
    let average = |total: f64| {
        if match_count == 0 {
            0.0
        } else {
            round_to(total / match_count as f64, 0)
        }
    };

    let kd = if deaths == 0 {
        kills as f64
    } else {
        round_to(kills as f64 / deaths as f64, 2)
    };

    let latest = items.first();
    let elo = latest.and_then(|item| match item.stats.get("Elo") {
        Some(Value::String(raw)) => raw.trim().parse::<i64>().ok(),
        Some(Value::Number(number)) => number.as_i64(),
        _ => None,
    });

    RecentMatchesDto {
        kills,
        deaths,
        wins,
        loses: match_count - wins,
        match_count,
        kd,
        hs_percent: average(headshots),
        win_rate: average(wins as f64 * 100.0),
        av_kills: average(kills as f64),
        av_deaths: average(deaths as f64),
        av_assists: average(assists as f64),
        elo,
        last_game_stats: latest.map(|item| item.stats.clone()),
    }
}
