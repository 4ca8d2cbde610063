use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use pokecup_api::TournamentRequest;
use pokecup_api::TournamentResult;
use pokecup_api::client::{ApiError, WorldCupApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: WorldCupApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: WorldCupApi::new(),
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::DrawField { request } => self.handle_draw_field(request).await,
                NetworkRequest::SaveResult { result } => self.handle_save_result(result).await,
                NetworkRequest::LoadHistory => self.handle_load_history().await,
                NetworkRequest::LoadResultDetail { tournament_id } => {
                    self.handle_load_result_detail(tournament_id).await
                }
                NetworkRequest::LoadStatistics { generation, poke_type } => {
                    self.handle_load_statistics(generation, poke_type).await
                }
                NetworkRequest::LoadPokedexPage { page, size, generation } => {
                    self.handle_load_pokedex_page(page, size, generation).await
                }
                NetworkRequest::SearchPokemon { name } => self.handle_search_pokemon(name).await,
            };

            debug!("network request complete");
            let is_ok = !matches!(&result, Ok(NetworkResponse::SaveFailed { .. }) | Err(_));
            self.stop_loading_animation(is_ok).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_draw_field(
        &self,
        request: TournamentRequest,
    ) -> Result<NetworkResponse, ApiError> {
        debug!(
            "drawing {} participants (gen {}, type {})",
            request.participant_count, request.generation, request.poke_type
        );
        let field = self.client.fetch_participants(&request).await?;
        if field.is_empty() {
            return Err(ApiError::NotFound(
                "server returned an empty participant field".into(),
            ));
        }
        Ok(NetworkResponse::FieldDrawn { field })
    }

    /// A failed save must not tear down the completed run, so the error is
    /// folded into a soft response and the caller may resubmit.
    async fn handle_save_result(
        &self,
        result: TournamentResult,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("saving result {}", result.tournament_id);
        match self.client.save_result(&result).await {
            Ok(saved) => Ok(NetworkResponse::ResultSaved { saved }),
            Err(err) => Ok(NetworkResponse::SaveFailed { message: err.to_string() }),
        }
    }

    async fn handle_load_history(&self) -> Result<NetworkResponse, ApiError> {
        debug!("loading result history");
        let results = self.client.fetch_results().await?;
        Ok(NetworkResponse::HistoryLoaded { results })
    }

    async fn handle_load_result_detail(
        &self,
        tournament_id: String,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading stored result {tournament_id}");
        let result = self.client.fetch_result(&tournament_id).await?;
        Ok(NetworkResponse::ResultDetailLoaded { result })
    }

    async fn handle_load_statistics(
        &self,
        generation: Option<u8>,
        poke_type: Option<String>,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading statistics (gen {generation:?}, type {poke_type:?})");
        let rows = self
            .client
            .fetch_statistics(generation, poke_type.as_deref())
            .await?;
        Ok(NetworkResponse::StatisticsLoaded { rows })
    }

    async fn handle_load_pokedex_page(
        &self,
        page: u32,
        size: u32,
        generation: u8,
    ) -> Result<NetworkResponse, ApiError> {
        debug!("loading pokedex page {page} for generation {generation}");
        let page = self.client.fetch_pokemon_page(page, size, generation).await?;
        Ok(NetworkResponse::PokedexPageLoaded { page })
    }

    async fn handle_search_pokemon(&self, name: String) -> Result<NetworkResponse, ApiError> {
        debug!("searching pokedex for {name}");
        let pokemon = self.client.search_pokemon(&name).await?;
        Ok(NetworkResponse::PokemonFound { pokemon })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
