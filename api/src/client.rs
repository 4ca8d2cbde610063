use crate::wire::{
    PokemonDto, PokemonPageDto, StatDto, WorldCupParticipantDto, WorldCupRankingDto,
    WorldCupRequestDto, WorldCupResultDto, WorldCupStatisticsDto,
};
use crate::{
    Participant, Pokemon, PokemonPage, PokemonStats, RankingEntry, SavedResult, StatLine,
    TournamentRequest, TournamentResult,
};
use chrono::NaiveDateTime;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// World Cup API client backed by the pokeapi-backend REST endpoints.
#[derive(Debug, Clone)]
pub struct WorldCupApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for WorldCupApi {
    fn default() -> Self {
        let base_url = std::env::var("POKECUP_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self::with_base_url(base_url)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl WorldCupApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client against a specific server root, e.g. a mock server in tests.
    /// `new()` reads `POKECUP_API_URL` instead, falling back to localhost:8080.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pokecup/0.1 (terminal bracket runner)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Draw the participant field for a new run. The server samples its pool
    /// by the request's generation and type filters and returns the drawn
    /// field in bracket order.
    pub async fn fetch_participants(
        &self,
        request: &TournamentRequest,
    ) -> ApiResult<Vec<Participant>> {
        let url = format!("{}/worldcup/participate", self.base_url);
        let raw: Vec<WorldCupParticipantDto> =
            self.post_json(&url, &request_payload(request)).await?;
        Ok(raw.iter().map(map_participant).collect())
    }

    /// Persist a completed run. The server assigns the row id and echoes the
    /// stored row back.
    pub async fn save_result(&self, result: &TournamentResult) -> ApiResult<SavedResult> {
        let url = format!("{}/worldcup/result", self.base_url);
        let raw: WorldCupResultDto = self.post_json(&url, &result_payload(result)).await?;
        Ok(map_saved_result(raw))
    }

    /// Fetch stored runs, newest first per the server's ordering.
    pub async fn fetch_results(&self) -> ApiResult<Vec<SavedResult>> {
        let url = format!("{}/worldcup/results", self.base_url);
        let raw: Vec<WorldCupResultDto> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_saved_result).collect())
    }

    /// Fetch one stored run by its tournament id.
    pub async fn fetch_result(&self, tournament_id: &str) -> ApiResult<SavedResult> {
        let url = format!("{}/worldcup/result/{tournament_id}", self.base_url);
        let raw: WorldCupResultDto = self.get(&url).await?;
        if raw.tournament_id.is_none() {
            return Err(ApiError::NotFound(format!("no stored run for {tournament_id}")));
        }
        Ok(map_saved_result(raw))
    }

    /// Fetch per-pokemon win and placement statistics. At least one filter is
    /// required; the server exposes no unfiltered listing.
    pub async fn fetch_statistics(
        &self,
        generation: Option<u8>,
        poke_type: Option<&str>,
    ) -> ApiResult<Vec<PokemonStats>> {
        let url = match (generation, poke_type) {
            (Some(g), Some(t)) => {
                format!("{}/worldcup/statistics/generation/{g}/type/{t}", self.base_url)
            }
            (Some(g), None) => format!("{}/worldcup/statistics/generation/{g}", self.base_url),
            (None, Some(t)) => format!("{}/worldcup/statistics/type/{t}", self.base_url),
            (None, None) => {
                return Err(ApiError::Other(
                    "statistics need a generation or type filter".into(),
                ));
            }
        };
        let raw: Vec<WorldCupStatisticsDto> = self.get(&url).await?;
        Ok(raw.into_iter().map(map_statistics).collect())
    }

    /// Fetch one pokedex page for a generation.
    pub async fn fetch_pokemon_page(
        &self,
        page: u32,
        size: u32,
        generation: u8,
    ) -> ApiResult<PokemonPage> {
        let url = format!(
            "{}/pokemon/list?page={page}&size={size}&generation={generation}",
            self.base_url
        );
        let raw: PokemonPageDto = self.get(&url).await?;
        Ok(map_pokemon_page(raw))
    }

    /// Look up a single pokemon by name (english or korean).
    pub async fn search_pokemon(&self, name: &str) -> ApiResult<Pokemon> {
        let url = format!("{}/pokemon/search?name={name}", self.base_url);
        let raw: PokemonDto = self.get(&url).await?;
        if raw.pokemon_id.is_none() && raw.id.is_none() {
            return Err(ApiError::NotFound(format!("no pokemon named {name}")));
        }
        Ok(map_pokemon(raw))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        Self::decode(response, url).await
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> ApiResult<T>
    where
        B: serde::Serialize,
        T: Default + serde::de::DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        Self::decode(response, url).await
    }

    /// 4xx means "nothing there" for this backend, so it decodes to the
    /// type's default; callers that need a row distinguish via NotFound.
    async fn decode<T: Default + serde::de::DeserializeOwned>(
        response: reqwest::Response,
        url: &str,
    ) -> ApiResult<T> {
        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: backend wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_participant(dto: &WorldCupParticipantDto) -> Participant {
    Participant {
        id: dto.id.unwrap_or_default(),
        name: dto.name.clone().unwrap_or_default(),
        korean_name: dto.korean_name.clone().unwrap_or_default(),
        types: dto.types.clone(),
        sprite_url: dto.sprite_url.clone().unwrap_or_default(),
        description: dto.description.clone().unwrap_or_default(),
        generation: dto.generation.unwrap_or_default(),
    }
}

fn map_ranking_entry(dto: &WorldCupRankingDto) -> RankingEntry {
    RankingEntry {
        rank: dto.rank.unwrap_or_default(),
        participant: Participant {
            id: dto.pokemon_id.unwrap_or_default(),
            name: dto.pokemon_name.clone().unwrap_or_default(),
            korean_name: dto.pokemon_korean_name.clone().unwrap_or_default(),
            types: dto.types.clone(),
            sprite_url: dto.sprite_url.clone().unwrap_or_default(),
            description: dto.description.clone().unwrap_or_default(),
            generation: dto.generation.unwrap_or_default(),
        },
        wins: dto.wins.unwrap_or_default(),
        total_matches: dto.total_matches.unwrap_or_default(),
        win_rate: dto.win_rate.unwrap_or_default().min(100) as u8,
    }
}

fn map_saved_result(dto: WorldCupResultDto) -> SavedResult {
    SavedResult {
        id: dto.id,
        tournament_id: dto.tournament_id.unwrap_or_default(),
        title: dto.title.unwrap_or_default(),
        tournament_type: dto.tournament_type.unwrap_or_default(),
        conditions: dto.conditions.unwrap_or_default(),
        participants: dto.participants.iter().map(map_participant).collect(),
        final_ranking: dto.final_ranking.iter().map(map_ranking_entry).collect(),
        winner_id: dto.winner_id.unwrap_or_default(),
        winner_name: dto.winner_name.unwrap_or_default(),
        winner_korean_name: dto.winner_korean_name.unwrap_or_default(),
        winner_sprite_url: dto.winner_sprite_url.unwrap_or_default(),
        created_at: dto.created_at.as_deref().and_then(parse_local_datetime),
        completed_at: dto.completed_at.as_deref().and_then(parse_local_datetime),
    }
}

fn map_statistics(dto: WorldCupStatisticsDto) -> PokemonStats {
    PokemonStats {
        pokemon_id: dto.pokemon_id.unwrap_or_default(),
        pokemon_name: dto.pokemon_name.unwrap_or_default(),
        pokemon_korean_name: dto.pokemon_korean_name.unwrap_or_default(),
        sprite_url: dto.sprite_url.unwrap_or_default(),
        types: dto.types,
        generation: dto.generation.unwrap_or_default(),
        total_participations: dto.total_participations.unwrap_or_default(),
        total_wins: dto.total_wins.unwrap_or_default(),
        total_top3: dto.total_top3.unwrap_or_default(),
        average_rank: dto.average_rank.unwrap_or_default(),
        win_rate: dto.win_rate.unwrap_or_default().min(100) as u8,
        top3_rate: dto.top3_rate.unwrap_or_default().min(100) as u8,
        last_updated: dto.last_updated.as_deref().and_then(parse_local_datetime),
    }
}

fn map_pokemon(dto: PokemonDto) -> Pokemon {
    Pokemon {
        // pokemon_id is the dex number; the plain id is the database row.
        id: dto
            .pokemon_id
            .or_else(|| dto.id.and_then(|v| u32::try_from(v).ok()))
            .unwrap_or_default(),
        name: dto.name.unwrap_or_default(),
        korean_name: dto.korean_name.unwrap_or_default(),
        height: dto.height.unwrap_or_default(),
        weight: dto.weight.unwrap_or_default(),
        sprite_url: dto.sprite_url.unwrap_or_default(),
        types: dto.types,
        korean_types: dto.korean_types,
        stats: dto.stats.iter().map(map_stat_line).collect(),
        description: dto.description.unwrap_or_default(),
        abilities: dto.abilities,
        generation: dto.generation.unwrap_or_default(),
    }
}

fn map_stat_line(dto: &StatDto) -> StatLine {
    StatLine {
        name: dto.name.clone().unwrap_or_default(),
        base: dto.base_stat.unwrap_or_default(),
    }
}

fn map_pokemon_page(dto: PokemonPageDto) -> PokemonPage {
    PokemonPage {
        content: dto.content.into_iter().map(map_pokemon).collect(),
        page: dto.page.unwrap_or_default(),
        size: dto.size.unwrap_or_default(),
        total_elements: dto.total_elements.unwrap_or_default(),
        total_pages: dto.total_pages.unwrap_or_default(),
        generation: dto.generation.unwrap_or_default(),
        has_next: dto.has_next.unwrap_or_default(),
        has_previous: dto.has_previous.unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Payloads: domain types → outbound wire types
// ---------------------------------------------------------------------------

fn request_payload(request: &TournamentRequest) -> WorldCupRequestDto {
    WorldCupRequestDto {
        title: request.title.clone(),
        generation: request.generation.clone(),
        poke_type: request.poke_type.clone(),
        participant_count: request.participant_count,
    }
}

fn participant_payload(p: &Participant) -> WorldCupParticipantDto {
    WorldCupParticipantDto {
        id: Some(p.id),
        name: Some(p.name.clone()),
        korean_name: Some(p.korean_name.clone()),
        types: p.types.clone(),
        sprite_url: Some(p.sprite_url.clone()),
        description: Some(p.description.clone()),
        generation: Some(p.generation),
        rank: None,
        wins: None,
        total_matches: None,
        win_rate: None,
    }
}

fn ranking_payload(entry: &RankingEntry) -> WorldCupRankingDto {
    WorldCupRankingDto {
        rank: Some(entry.rank),
        pokemon_id: Some(entry.participant.id),
        pokemon_name: Some(entry.participant.name.clone()),
        pokemon_korean_name: Some(entry.participant.korean_name.clone()),
        sprite_url: Some(entry.participant.sprite_url.clone()),
        types: entry.participant.types.clone(),
        generation: Some(entry.participant.generation),
        wins: Some(entry.wins),
        total_matches: Some(entry.total_matches),
        win_rate: Some(u32::from(entry.win_rate)),
        description: None,
    }
}

/// The statistics updater on the server reads pokemonId and rank out of
/// finalRanking, so the full ranking rows ride along with the save.
fn result_payload(result: &TournamentResult) -> WorldCupResultDto {
    let mut conditions = serde_json::Map::new();
    conditions.insert("generation".into(), result.conditions.generation.clone().into());
    conditions.insert("type".into(), result.conditions.poke_type.clone().into());
    conditions.insert(
        "participantCount".into(),
        result.conditions.participant_count.into(),
    );

    WorldCupResultDto {
        id: None,
        tournament_id: Some(result.tournament_id.clone()),
        title: Some(result.title.clone()),
        tournament_type: Some("vote".into()),
        conditions: Some(conditions),
        participants: result.participants.iter().map(participant_payload).collect(),
        final_ranking: result.final_ranking.iter().map(ranking_payload).collect(),
        winner_id: Some(result.winner.id),
        winner_name: Some(result.winner.name.clone()),
        winner_korean_name: Some(result.winner.korean_name.clone()),
        winner_sprite_url: Some(result.winner.sprite_url.clone()),
        created_at: Some(format_local_datetime(&result.created_at)),
        completed_at: Some(format_local_datetime(&result.completed_at)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn participant(id: u32, name: &str) -> Participant {
        Participant {
            id,
            name: name.into(),
            korean_name: format!("kr-{name}"),
            types: vec!["electric".into()],
            sprite_url: format!("https://sprites.example/{id}.png"),
            description: String::new(),
            generation: 1,
        }
    }

    #[test]
    fn request_payload_uses_the_backend_type_key() {
        let json = serde_json::to_value(request_payload(&TournamentRequest::default()))
            .expect("request payload should serialize");
        assert_eq!(json["type"], "all");
        assert_eq!(json["participantCount"], 16);
        assert!(json.get("pokeType").is_none());
    }

    #[test]
    fn result_payload_is_typed_vote_with_iso_timestamps() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(18, 22, 5)
            .unwrap();
        let result = TournamentResult {
            tournament_id: "worldcup-20260301182205".into(),
            winner: participant(25, "pikachu"),
            created_at: at,
            completed_at: at,
            ..Default::default()
        };
        let payload = result_payload(&result);
        assert_eq!(payload.tournament_type.as_deref(), Some("vote"));
        assert_eq!(payload.created_at.as_deref(), Some("2026-03-01T18:22:05"));
        assert!(payload.id.is_none(), "row id is server-assigned");
        let conditions = payload.conditions.unwrap();
        assert_eq!(conditions["participantCount"], 16);
    }

    #[test]
    fn parse_local_datetime_accepts_both_backend_renderings() {
        let plain = parse_local_datetime("2026-03-01T18:22:05").unwrap();
        let fractional = parse_local_datetime("2026-03-01T18:22:05.123456").unwrap();
        let spaced = parse_local_datetime("2026-03-01 18:22:05").unwrap();
        assert_eq!(plain, spaced);
        assert_eq!(plain.date(), fractional.date());
        assert!(parse_local_datetime("not a date").is_none());
    }

    #[test]
    fn ranking_win_rate_is_clamped_to_percent() {
        let dto = WorldCupRankingDto {
            rank: Some(1),
            pokemon_id: Some(25),
            win_rate: Some(250),
            ..Default::default()
        };
        assert_eq!(map_ranking_entry(&dto).win_rate, 100);
    }

    #[test]
    fn pokemon_id_prefers_dex_number_over_row_id() {
        let dto = PokemonDto {
            id: Some(9001),
            pokemon_id: Some(25),
            name: Some("pikachu".into()),
            ..Default::default()
        };
        assert_eq!(map_pokemon(dto).id, 25);

        let row_only = PokemonDto {
            id: Some(151),
            ..Default::default()
        };
        assert_eq!(map_pokemon(row_only).id, 151);
    }

    #[tokio::test]
    async fn statistics_filter_is_required() {
        let api = WorldCupApi::with_base_url("http://localhost:0");
        let err = api.fetch_statistics(None, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Other(_)), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_participants_maps_the_drawn_field() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/worldcup/participate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": 25, "name": "pikachu", "koreanName": "피카츄",
                     "types": ["electric"], "spriteUrl": "s/25.png",
                     "description": "mouse", "generation": 1},
                    {"id": 6, "name": "charizard", "types": ["fire", "flying"]}
                ]"#,
            )
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let field = api
            .fetch_participants(&TournamentRequest::default())
            .await
            .unwrap();

        assert_eq!(field.len(), 2);
        assert_eq!(field[0].id, 25);
        assert_eq!(field[0].display_name(), "피카츄");
        assert_eq!(field[1].display_name(), "charizard", "missing korean name falls back");
        assert_eq!(field[1].types, vec!["fire", "flying"]);
    }

    #[tokio::test]
    async fn save_result_returns_the_stored_row() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/worldcup/result")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 7, "tournamentId": "worldcup-20260301182205",
                    "title": "Pokemon World Cup", "tournamentType": "vote",
                    "winnerId": 25, "winnerName": "pikachu",
                    "createdAt": "2026-03-01T18:22:05"}"#,
            )
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let result = TournamentResult {
            tournament_id: "worldcup-20260301182205".into(),
            winner: participant(25, "pikachu"),
            ..Default::default()
        };
        let saved = api.save_result(&result).await.unwrap();

        assert_eq!(saved.id, Some(7));
        assert_eq!(saved.tournament_id, "worldcup-20260301182205");
        assert_eq!(saved.winner_id, 25);
        assert!(saved.created_at.is_some());
        assert!(saved.completed_at.is_none());
    }

    #[tokio::test]
    async fn fetch_results_treats_client_errors_as_empty() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/worldcup/results")
            .with_status(404)
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let rows = api.fetch_results().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn fetch_result_for_unknown_id_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/worldcup/result/worldcup-nope")
            .with_status(404)
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let err = api.fetch_result("worldcup-nope").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got: {err}");
    }

    #[tokio::test]
    async fn fetch_statistics_builds_the_combined_path() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/worldcup/statistics/generation/1/type/electric")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"pokemonId": 25, "pokemonName": "pikachu",
                     "totalParticipations": 12, "totalWins": 4, "totalTop3": 7,
                     "winRate": 33, "top3Rate": 58,
                     "lastUpdated": "2026-03-01 18:22:05"}]"#,
            )
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let stats = api.fetch_statistics(Some(1), Some("electric")).await.unwrap();

        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].pokemon_id, 25);
        assert_eq!(stats[0].total_top3, 7);
        assert_eq!(stats[0].win_rate, 33);
        assert!(stats[0].last_updated.is_some());
    }

    #[tokio::test]
    async fn fetch_pokemon_page_maps_paging_metadata() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pokemon/list?page=0&size=20&generation=1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content": [{"id": 1, "pokemonId": 25, "name": "pikachu",
                                "stats": [{"name": "hp", "baseStat": 35, "effort": 0}]}],
                    "page": 0, "size": 20, "totalElements": 151, "totalPages": 8,
                    "generation": 1, "hasNext": true, "hasPrevious": false}"#,
            )
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let page = api.fetch_pokemon_page(0, 20, 1).await.unwrap();

        assert_eq!(page.total_elements, 151);
        assert!(page.has_next);
        assert!(!page.has_previous);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].stat("hp"), Some(35));
    }

    #[tokio::test]
    async fn search_pokemon_unknown_name_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/pokemon/search?name=missingno")
            .with_status(404)
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let err = api.search_pokemon("missingno").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)), "got: {err}");
    }

    #[tokio::test]
    async fn malformed_body_is_a_parsing_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/worldcup/results")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json at all")
            .create_async()
            .await;

        let api = WorldCupApi::with_base_url(server.url());
        let err = api.fetch_results().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got: {err}");
    }
}

/// Jackson renders LocalDateTime as ISO-8601, with fractional seconds when
/// the value carries nanos; statistics lastUpdated uses the spaced pattern.
fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
}

fn format_local_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}
