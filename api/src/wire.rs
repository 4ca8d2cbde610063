/// Backend wire types — serde shapes for the pokeapi-backend JSON (camelCase).
/// These map to our clean domain types via the mapping fns in client.rs.
/// The result DTO is symmetric: the same shape is POSTed on save and returned
/// by the result endpoints, so it derives both Serialize and Deserialize.
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// World Cup — participate / result
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldCupRequestDto {
    pub title: String,
    pub generation: String,
    #[serde(rename = "type")]
    pub poke_type: String,
    pub participant_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldCupParticipantDto {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub korean_name: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub sprite_url: Option<String>,
    pub description: Option<String>,
    pub generation: Option<u8>,
    /// Live-run bookkeeping the web client tracks in place; unused here.
    pub rank: Option<u32>,
    pub wins: Option<u32>,
    pub total_matches: Option<u32>,
    pub win_rate: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldCupRankingDto {
    pub rank: Option<u32>,
    pub pokemon_id: Option<u32>,
    pub pokemon_name: Option<String>,
    pub pokemon_korean_name: Option<String>,
    pub sprite_url: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub generation: Option<u8>,
    pub wins: Option<u32>,
    pub total_matches: Option<u32>,
    /// Percentage 0-100.
    pub win_rate: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldCupResultDto {
    /// Server-assigned row id; absent on the outbound save payload.
    pub id: Option<i64>,
    pub tournament_id: Option<String>,
    pub title: Option<String>,
    pub tournament_type: Option<String>,
    pub conditions: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub participants: Vec<WorldCupParticipantDto>,
    #[serde(default)]
    pub final_ranking: Vec<WorldCupRankingDto>,
    pub winner_id: Option<u32>,
    pub winner_name: Option<String>,
    pub winner_korean_name: Option<String>,
    pub winner_sprite_url: Option<String>,
    /// ISO-8601 local datetime, e.g. "2026-03-01T18:22:05".
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
}

// ---------------------------------------------------------------------------
// World Cup — statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WorldCupStatisticsDto {
    pub id: Option<i64>,
    pub pokemon_id: Option<u32>,
    pub pokemon_name: Option<String>,
    pub pokemon_korean_name: Option<String>,
    pub sprite_url: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub generation: Option<u8>,
    pub total_participations: Option<u32>,
    pub total_wins: Option<u32>,
    pub total_top3: Option<u32>,
    pub average_rank: Option<u32>,
    pub win_rate: Option<u32>,
    pub top3_rate: Option<u32>,
    /// "yyyy-MM-dd HH:mm:ss" per the backend's JSON format.
    pub last_updated: Option<String>,
}

// ---------------------------------------------------------------------------
// Pokedex — list / search / detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PokemonDto {
    /// Database row id; the dex number lives in pokemon_id.
    pub id: Option<i64>,
    pub pokemon_id: Option<u32>,
    pub name: Option<String>,
    pub korean_name: Option<String>,
    pub base_experience: Option<u32>,
    pub height: Option<u32>,
    pub weight: Option<u32>,
    pub sprite_url: Option<String>,
    pub shiny_sprite_url: Option<String>,
    pub official_artwork_url: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub korean_types: Vec<String>,
    #[serde(default)]
    pub stats: Vec<StatDto>,
    pub description: Option<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    pub generation: Option<u8>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatDto {
    pub name: Option<String>,
    pub base_stat: Option<u16>,
    pub effort: Option<u16>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PokemonPageDto {
    #[serde(default)]
    pub content: Vec<PokemonDto>,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub total_elements: Option<u64>,
    pub total_pages: Option<u32>,
    pub generation: Option<u8>,
    pub has_next: Option<bool>,
    pub has_previous: Option<bool>,
}
