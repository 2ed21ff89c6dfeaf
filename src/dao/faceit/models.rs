use serde::Deserialize;
use serde_json::{Map, Value};

/// Player profile returned by `GET /players?nickname=`.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceitPlayer {
    pub player_id: String,
    pub nickname: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub games: FaceitGames,
}

impl FaceitPlayer {
    /// Skill level on CS2, falling back to the legacy CS:GO entry.
    pub fn skill_level(&self) -> Option<u32> {
        self.games.pick(|game| game.skill_level)
    }

    /// Elo on CS2, falling back to the legacy CS:GO entry.
    pub fn faceit_elo(&self) -> Option<u32> {
        self.games.pick(|game| game.faceit_elo)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FaceitGames {
    #[serde(default)]
    pub cs2: Option<FaceitGameDetails>,
    #[serde(default)]
    pub csgo: Option<FaceitGameDetails>,
}

impl FaceitGames {
    fn pick(&self, field: impl Fn(&FaceitGameDetails) -> Option<u32>) -> Option<u32> {
        let cs2 = self.cs2.as_ref().and_then(&field).filter(|value| *value > 0);
        cs2.or_else(|| self.csgo.as_ref().and_then(&field).filter(|value| *value > 0))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceitGameDetails {
    #[serde(default)]
    pub skill_level: Option<u32>,
    #[serde(default)]
    pub faceit_elo: Option<u32>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Page of per-match statistics returned by `GET /players/{id}/games/cs2/stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchHistory {
    #[serde(default)]
    pub items: Vec<MatchStatsItem>,
}

/// Statistics of one finished match, keyed by FACEIT's display labels ("Kills", "Result"...).
#[derive(Debug, Clone, Deserialize)]
pub struct MatchStatsItem {
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub stats: Map<String, Value>,
}
