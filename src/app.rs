use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, POKEDEX_PAGE_SIZE, SaveStatus};
use crate::state::messages::NetworkRequest;
use crate::state::tournament::Phase;
use pokecup_api::{Participant, Pokemon, PokemonPage, PokemonStats, SavedResult};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    WorldCup,
    Bracket,
    Pokedex,
    History,
    Stats,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let mut app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }
        app.state.worldcup.tournament.set_pairing(app.settings.pairing);

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_field_drawn(&mut self, field: Vec<Participant>) {
        self.state.last_error = None;
        self.state.worldcup.waiting_for_field = false;
        let conditions = self.state.worldcup.request.clone();
        match self.state.worldcup.tournament.start(field, conditions) {
            Ok(()) => {
                self.state.worldcup.highlight = Default::default();
                self.state.worldcup.save = SaveStatus::Idle;
                self.state.worldcup.bracket_scroll = 0;
            }
            // the server sent a field the bracket cannot pair; stay in Setup
            Err(e) => self.state.last_error = Some(e.to_string()),
        }
    }

    pub fn on_result_saved(&mut self, saved: SavedResult) {
        self.state.last_error = None;
        self.state.worldcup.save = SaveStatus::Saved { row_id: saved.id };
        // stale once a new run is stored; reload on next visit
        self.state.history.results.clear();
    }

    pub fn on_save_failed(&mut self, message: String) {
        self.state.worldcup.save = SaveStatus::Failed { message };
    }

    pub fn on_history_loaded(&mut self, results: Vec<SavedResult>) {
        self.state.last_error = None;
        self.state.history.load(results);
    }

    pub fn on_result_detail_loaded(&mut self, result: SavedResult) {
        self.state.last_error = None;
        self.state.history.detail = Some(result);
    }

    pub fn on_statistics_loaded(&mut self, rows: Vec<PokemonStats>) {
        self.state.last_error = None;
        self.state.stats.load(rows);
    }

    pub fn on_pokedex_page_loaded(&mut self, page: PokemonPage) {
        self.state.last_error = None;
        self.state.pokedex.load(page);
    }

    pub fn on_pokemon_found(&mut self, pokemon: Pokemon) {
        self.state.last_error = None;
        self.state.pokedex.search_result = Some(pokemon);
    }

    pub fn on_error(&mut self, message: String) {
        // a failed draw must unblock the setup form
        self.state.worldcup.waiting_for_field = false;
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::History {
            self.state.history.scroll_offset = 0;
        }
    }

    /// Request needed to populate a tab whose data is missing. Tabs already
    /// holding server data come back None so switching stays cheap.
    pub fn tab_load_request(&self, tab: MenuItem) -> Option<NetworkRequest> {
        match tab {
            MenuItem::Pokedex if self.state.pokedex.page.is_none() => {
                Some(NetworkRequest::LoadPokedexPage {
                    page: 0,
                    size: POKEDEX_PAGE_SIZE,
                    generation: self.state.pokedex.generation,
                })
            }
            MenuItem::History if self.state.history.results.is_empty() => {
                Some(NetworkRequest::LoadHistory)
            }
            MenuItem::Stats if self.state.stats.rows.is_empty() => Some(self.stats_request()),
            _ => None,
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // World cup flow
    // -----------------------------------------------------------------------

    /// Enter on the setup form. Returns the draw request once per submission;
    /// the field lands via on_field_drawn.
    pub fn worldcup_submit_setup(&mut self) -> Option<NetworkRequest> {
        let wc = &mut self.state.worldcup;
        if wc.tournament.phase() != Phase::Setup || wc.waiting_for_field {
            return None;
        }
        wc.waiting_for_field = true;
        Some(NetworkRequest::DrawField {
            request: wc.request.clone(),
        })
    }

    /// Cast the vote for the highlighted entrant. True means a vote was
    /// recorded and the settle timer should be armed. A vote landing inside
    /// the settle window is rejected by the bracket and dropped here.
    pub fn worldcup_vote(&mut self) -> bool {
        let Some(winner_id) = self.state.worldcup.highlighted_id() else {
            return false;
        };
        let match_id = match self.state.worldcup.tournament.current_match() {
            Some(m) => m.id.clone(),
            None => return false,
        };
        self.state
            .worldcup
            .tournament
            .select_winner(&match_id, winner_id)
            .is_ok()
    }

    /// Settle timer fired. Advances the bracket; if that finished the run,
    /// returns the upload request for the result store.
    pub fn on_match_settled(&mut self) -> Option<NetworkRequest> {
        self.state.worldcup.tournament.settle();
        self.state.worldcup.highlight = Default::default();
        self.worldcup_save_request()
    }

    /// Re-send a completed run whose upload failed.
    pub fn worldcup_retry_save(&mut self) -> Option<NetworkRequest> {
        if !matches!(self.state.worldcup.save, SaveStatus::Failed { .. }) {
            return None;
        }
        self.state.worldcup.save = SaveStatus::Idle;
        self.worldcup_save_request()
    }

    /// Throw the current run away and return to the setup form. Also the
    /// path for "new cup" after completion.
    pub fn worldcup_abort(&mut self) {
        self.state.worldcup.tournament.abort();
        self.state.worldcup.waiting_for_field = false;
        self.state.worldcup.save = SaveStatus::Idle;
        self.state.worldcup.highlight = Default::default();
        self.state.worldcup.setup_row = Default::default();
        self.state.worldcup.bracket_scroll = 0;
    }

    fn worldcup_save_request(&mut self) -> Option<NetworkRequest> {
        if self.state.worldcup.save != SaveStatus::Idle {
            return None;
        }
        let result = self.state.worldcup.tournament.result()?.clone();
        self.state.worldcup.save = SaveStatus::Saving;
        Some(NetworkRequest::SaveResult { result })
    }

    // -----------------------------------------------------------------------
    // Pokedex flow
    // -----------------------------------------------------------------------

    pub fn pokedex_next_page(&self) -> Option<NetworkRequest> {
        let page = self.state.pokedex.page.as_ref()?;
        page.has_next.then(|| NetworkRequest::LoadPokedexPage {
            page: page.page + 1,
            size: POKEDEX_PAGE_SIZE,
            generation: page.generation,
        })
    }

    pub fn pokedex_prev_page(&self) -> Option<NetworkRequest> {
        let page = self.state.pokedex.page.as_ref()?;
        page.has_previous.then(|| NetworkRequest::LoadPokedexPage {
            page: page.page.saturating_sub(1),
            size: POKEDEX_PAGE_SIZE,
            generation: page.generation,
        })
    }

    pub fn pokedex_cycle_generation(&mut self) -> NetworkRequest {
        self.state.pokedex.cycle_generation();
        NetworkRequest::LoadPokedexPage {
            page: 0,
            size: POKEDEX_PAGE_SIZE,
            generation: self.state.pokedex.generation,
        }
    }

    /// Finish search entry; Some when there is a name to look up.
    pub fn pokedex_submit_search(&mut self) -> Option<NetworkRequest> {
        let name = self.state.pokedex.submit_search()?;
        Some(NetworkRequest::SearchPokemon { name })
    }

    // -----------------------------------------------------------------------
    // History / statistics flow
    // -----------------------------------------------------------------------

    /// Returns the detail request if the user pressed Enter on a stored run.
    pub fn history_select(&self) -> Option<NetworkRequest> {
        let tournament_id = self.state.history.selected_tournament_id()?;
        Some(NetworkRequest::LoadResultDetail { tournament_id })
    }

    pub fn stats_cycle_generation(&mut self) -> NetworkRequest {
        self.state.stats.cycle_generation();
        self.stats_request()
    }

    pub fn stats_cycle_type(&mut self) -> NetworkRequest {
        self.state.stats.cycle_type();
        self.stats_request()
    }

    fn stats_request(&self) -> NetworkRequest {
        NetworkRequest::LoadStatistics {
            generation: self.state.stats.generation,
            poke_type: self.state.stats.poke_type.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Animation tick — called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokecup_api::Participant;

    fn entrant(id: u32) -> Participant {
        Participant {
            id,
            name: format!("poke{id}"),
            ..Default::default()
        }
    }

    fn app_with_field(n: u32) -> App {
        let mut app = App::new();
        app.state.worldcup.waiting_for_field = true;
        app.on_field_drawn((1..=n).map(entrant).collect());
        app
    }

    #[test]
    fn setup_submit_fires_once_until_the_field_arrives() {
        let mut app = App::new();
        assert!(app.worldcup_submit_setup().is_some());
        assert!(app.worldcup_submit_setup().is_none());

        app.on_field_drawn((1..=4).map(entrant).collect());
        assert_eq!(app.state.worldcup.tournament.phase(), Phase::InProgress);
        assert!(!app.state.worldcup.waiting_for_field);
    }

    #[test]
    fn bad_field_reports_and_stays_in_setup() {
        let mut app = App::new();
        app.state.worldcup.waiting_for_field = true;
        app.on_field_drawn((1..=6).map(entrant).collect());

        assert_eq!(app.state.worldcup.tournament.phase(), Phase::Setup);
        assert!(app.state.last_error.is_some());
        // the form must accept another submit
        assert!(app.worldcup_submit_setup().is_some());
    }

    #[test]
    fn vote_arms_the_timer_only_once_per_match() {
        let mut app = app_with_field(4);
        assert!(app.worldcup_vote());
        // second Enter inside the settle window
        assert!(!app.worldcup_vote());

        assert!(app.on_match_settled().is_none());
        assert!(app.worldcup_vote());
    }

    #[test]
    fn completed_run_is_saved_exactly_once() {
        let mut app = app_with_field(2);
        assert!(app.worldcup_vote());
        let save = app.on_match_settled();
        assert!(matches!(save, Some(NetworkRequest::SaveResult { .. })));
        assert_eq!(app.state.worldcup.save, SaveStatus::Saving);

        // a stray settle after completion must not resend
        assert!(app.on_match_settled().is_none());
    }

    #[test]
    fn failed_save_can_be_retried() {
        let mut app = app_with_field(2);
        assert!(app.worldcup_vote());
        let _ = app.on_match_settled();
        app.on_save_failed("connection refused".to_string());

        let retry = app.worldcup_retry_save();
        assert!(matches!(retry, Some(NetworkRequest::SaveResult { .. })));
        assert_eq!(app.state.worldcup.save, SaveStatus::Saving);

        app.on_result_saved(SavedResult {
            id: Some(7),
            ..Default::default()
        });
        assert_eq!(app.state.worldcup.save, SaveStatus::Saved { row_id: Some(7) });
        // nothing left to retry
        assert!(app.worldcup_retry_save().is_none());
    }

    #[test]
    fn tab_loads_fire_only_while_empty() {
        let mut app = App::new();
        assert!(matches!(
            app.tab_load_request(MenuItem::History),
            Some(NetworkRequest::LoadHistory)
        ));

        app.on_history_loaded(vec![SavedResult::default()]);
        assert!(app.tab_load_request(MenuItem::History).is_none());
        assert!(app.tab_load_request(MenuItem::WorldCup).is_none());
    }
}
