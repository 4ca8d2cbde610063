pub mod client;
pub mod wire;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the backend wire format
// ---------------------------------------------------------------------------

/// A Pokemon fielded in a World Cup run, as served by the participate endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Participant {
    pub id: u32,
    pub name: String,        // "pikachu"
    pub korean_name: String, // "피카츄"
    pub types: Vec<String>,
    pub sprite_url: String,
    pub description: String,
    pub generation: u8,
}

impl Participant {
    /// Korean name when present, English name otherwise.
    pub fn display_name(&self) -> &str {
        if self.korean_name.is_empty() {
            &self.name
        } else {
            &self.korean_name
        }
    }

    pub fn type_summary(&self) -> String {
        self.types.join("/")
    }
}

/// Filters and field size sent to the participant source.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentRequest {
    pub title: String,
    /// "all" or "1".."9".
    pub generation: String,
    /// "all" or a type name ("fire", "water", ...).
    pub poke_type: String,
    pub participant_count: usize,
}

impl Default for TournamentRequest {
    fn default() -> Self {
        Self {
            title: "Pokemon World Cup".to_string(),
            generation: "all".to_string(),
            poke_type: "all".to_string(),
            participant_count: 16,
        }
    }
}

/// One row of a completed run's final ranking. Rank 1 is the champion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingEntry {
    pub rank: u32,
    pub participant: Participant,
    /// Matches won in this run.
    pub wins: u32,
    /// Matches played in this run.
    pub total_matches: u32,
    /// Percentage 0-100, rounded.
    pub win_rate: u8,
}

/// A completed run, as produced locally and handed to the result sink.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentResult {
    pub tournament_id: String,
    pub title: String,
    pub conditions: TournamentRequest,
    pub participants: Vec<Participant>,
    /// Winner first, everyone else in original entry order.
    pub final_ranking: Vec<RankingEntry>,
    pub winner: Participant,
    pub created_at: NaiveDateTime,
    pub completed_at: NaiveDateTime,
}

/// A stored run fetched back from the result sink. Server-assigned fields
/// (`id`, timestamps) are optional because older rows may not carry them.
#[derive(Debug, Clone, Default)]
pub struct SavedResult {
    pub id: Option<i64>,
    pub tournament_id: String,
    pub title: String,
    pub tournament_type: String,
    /// Opaque filter map as stored; rendered, never interpreted.
    pub conditions: serde_json::Map<String, serde_json::Value>,
    pub participants: Vec<Participant>,
    pub final_ranking: Vec<RankingEntry>,
    pub winner_id: u32,
    pub winner_name: String,
    pub winner_korean_name: String,
    pub winner_sprite_url: String,
    pub created_at: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}

impl SavedResult {
    pub fn winner_label(&self) -> &str {
        if self.winner_korean_name.is_empty() {
            &self.winner_name
        } else {
            &self.winner_korean_name
        }
    }

    /// One-line filter summary for list views, e.g. "gen 1 | type fire | 16".
    pub fn condition_summary(&self) -> String {
        let get = |key: &str| {
            self.conditions
                .get(key)
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_else(|| "all".to_string())
        };
        let count = self
            .conditions
            .get("participantCount")
            .and_then(|v| v.as_u64())
            .unwrap_or(self.participants.len() as u64);
        format!("gen {} | type {} | {}", get("generation"), get("type"), count)
    }
}

// ---------------------------------------------------------------------------
// Pokedex types
// ---------------------------------------------------------------------------

/// A full Pokedex entry from the pokemon endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub korean_name: String,
    /// Decimetres, as PokeAPI reports it.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub sprite_url: String,
    pub types: Vec<String>,
    pub korean_types: Vec<String>,
    pub stats: Vec<StatLine>,
    pub description: String,
    pub abilities: Vec<String>,
    pub generation: u8,
}

impl Pokemon {
    pub fn display_name(&self) -> &str {
        if self.korean_name.is_empty() {
            &self.name
        } else {
            &self.korean_name
        }
    }

    pub fn stat(&self, name: &str) -> Option<u16> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.base)
    }

    pub fn stat_total(&self) -> u32 {
        self.stats.iter().map(|s| u32::from(s.base)).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    pub name: String, // "hp", "attack", "defense", "speed", ...
    pub base: u16,
}

/// One page of the paged Pokedex listing.
#[derive(Debug, Clone, Default)]
pub struct PokemonPage {
    pub content: Vec<Pokemon>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub generation: u8,
    pub has_next: bool,
    pub has_previous: bool,
}

// ---------------------------------------------------------------------------
// Statistics types
// ---------------------------------------------------------------------------

/// Lifetime World Cup statistics for one Pokemon, aggregated server-side.
#[derive(Debug, Clone, Default)]
pub struct PokemonStats {
    pub pokemon_id: u32,
    pub pokemon_name: String,
    pub pokemon_korean_name: String,
    pub sprite_url: String,
    pub types: Vec<String>,
    pub generation: u8,
    pub total_participations: u32,
    pub total_wins: u32,
    pub total_top3: u32,
    pub average_rank: u32,
    /// Percentage 0-100.
    pub win_rate: u8,
    /// Percentage 0-100.
    pub top3_rate: u8,
    pub last_updated: Option<NaiveDateTime>,
}

impl PokemonStats {
    pub fn display_name(&self) -> &str {
        if self.pokemon_korean_name.is_empty() {
            &self.pokemon_name
        } else {
            &self.pokemon_korean_name
        }
    }
}
