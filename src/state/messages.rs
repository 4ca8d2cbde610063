use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use pokecup_api::{
    Participant, Pokemon, PokemonPage, PokemonStats, SavedResult, TournamentRequest,
    TournamentResult,
};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    DrawField { request: TournamentRequest },
    SaveResult { result: TournamentResult },
    LoadHistory,
    LoadResultDetail { tournament_id: String },
    LoadStatistics { generation: Option<u8>, poke_type: Option<String> },
    LoadPokedexPage { page: u32, size: u32, generation: u8 },
    SearchPokemon { name: String },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    FieldDrawn { field: Vec<Participant> },
    ResultSaved { saved: SavedResult },
    /// Save failures are recoverable: the completed run stays in memory for a
    /// resubmit, so they arrive as their own response instead of Error.
    SaveFailed { message: String },
    HistoryLoaded { results: Vec<SavedResult> },
    ResultDetailLoaded { result: SavedResult },
    StatisticsLoaded { rows: Vec<PokemonStats> },
    PokedexPageLoaded { page: PokemonPage },
    PokemonFound { pokemon: Pokemon },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
    /// The vote settle timer fired; the bracket may advance.
    MatchSettled,
}
