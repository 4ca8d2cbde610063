use crate::app::MenuItem;
use crate::state::tournament::{PairingRule, Tournament};
use pokecup_api::{Pokemon, PokemonPage, PokemonStats, SavedResult, TournamentRequest};

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter — drives color cycling and the triangle-wave offset.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// World cup state (setup form + running bracket)
// ---------------------------------------------------------------------------

/// Draw filters offered on the setup form. "all" must stay first; the
/// statistics tab reuses the tail of TYPES where None plays the "all" role.
pub const GENERATIONS: [&str; 10] = ["all", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
pub const TYPES: [&str; 19] = [
    "all", "normal", "fire", "water", "electric", "grass", "ice", "fighting", "poison", "ground",
    "flying", "psychic", "bug", "rock", "ghost", "dragon", "dark", "steel", "fairy",
];
pub const FIELD_SIZES: [usize; 5] = [4, 8, 16, 32, 64];

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum SetupRow {
    #[default]
    Generation,
    Type,
    FieldSize,
    Pairing,
}

impl SetupRow {
    pub fn next(self) -> Self {
        match self {
            Self::Generation => Self::Type,
            Self::Type => Self::FieldSize,
            Self::FieldSize => Self::Pairing,
            Self::Pairing => Self::Generation,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Generation => Self::Pairing,
            Self::Type => Self::Generation,
            Self::FieldSize => Self::Type,
            Self::Pairing => Self::FieldSize,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum VoteSide {
    #[default]
    Left,
    Right,
}

/// Where the result upload stands once a run completes. Failed keeps the
/// server's message so the completion screen can show it next to the retry
/// hint; the bracket itself is never torn down by a failed save.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved { row_id: Option<i64> },
    Failed { message: String },
}

#[derive(Debug, Default)]
pub struct WorldCupState {
    pub tournament: Tournament,
    /// Draw conditions shown on the setup form, sent verbatim to the server.
    pub request: TournamentRequest,
    pub setup_row: SetupRow,
    pub highlight: VoteSide,
    pub save: SaveStatus,
    /// A draw request is in flight; blocks a second Enter on the setup form.
    pub waiting_for_field: bool,
    /// Vertical scroll on the bracket tab for fields taller than the
    /// terminal.
    pub bracket_scroll: u16,
}

impl WorldCupState {
    pub fn setup_row_down(&mut self) {
        self.setup_row = self.setup_row.next();
    }

    pub fn setup_row_up(&mut self) {
        self.setup_row = self.setup_row.prev();
    }

    /// Step the value in the highlighted form row. The pairing row writes
    /// straight onto the tournament so the rule is already in place when
    /// start() fires.
    pub fn cycle_value(&mut self, forward: bool) {
        match self.setup_row {
            SetupRow::Generation => {
                let idx = GENERATIONS
                    .iter()
                    .position(|g| *g == self.request.generation)
                    .unwrap_or(0);
                self.request.generation = GENERATIONS[cycle(idx, GENERATIONS.len(), forward)].to_string();
            }
            SetupRow::Type => {
                let idx = TYPES
                    .iter()
                    .position(|t| *t == self.request.poke_type)
                    .unwrap_or(0);
                self.request.poke_type = TYPES[cycle(idx, TYPES.len(), forward)].to_string();
            }
            SetupRow::FieldSize => {
                let idx = FIELD_SIZES
                    .iter()
                    .position(|n| *n == self.request.participant_count)
                    .unwrap_or(2);
                self.request.participant_count = FIELD_SIZES[cycle(idx, FIELD_SIZES.len(), forward)];
            }
            SetupRow::Pairing => {
                let flipped = match self.tournament.pairing() {
                    PairingRule::ReseedById => PairingRule::Positional,
                    PairingRule::Positional => PairingRule::ReseedById,
                };
                self.tournament.set_pairing(flipped);
            }
        }
    }

    pub fn toggle_highlight(&mut self) {
        self.highlight = match self.highlight {
            VoteSide::Left => VoteSide::Right,
            VoteSide::Right => VoteSide::Left,
        };
    }

    /// Entrant the vote highlight sits on, if a match is up.
    pub fn highlighted_id(&self) -> Option<u32> {
        let m = self.tournament.current_match()?;
        Some(match self.highlight {
            VoteSide::Left => m.left.id,
            VoteSide::Right => m.right.id,
        })
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    }
}

// ---------------------------------------------------------------------------
// Pokedex state
// ---------------------------------------------------------------------------

pub const POKEDEX_PAGE_SIZE: u32 = 20;

#[derive(Debug)]
pub struct PokedexState {
    pub page: Option<PokemonPage>,
    /// Generation whose pages are being browsed (1–9; the list endpoint has
    /// no "all" view).
    pub generation: u8,
    pub selected: usize,
    pub search_input: String,
    pub composing: bool,
    pub search_result: Option<Pokemon>,
}

impl Default for PokedexState {
    fn default() -> Self {
        Self {
            page: None,
            generation: 1,
            selected: 0,
            search_input: String::new(),
            composing: false,
            search_result: None,
        }
    }
}

impl PokedexState {
    pub fn load(&mut self, page: PokemonPage) {
        self.generation = page.generation;
        self.selected = 0;
        self.page = Some(page);
    }

    pub fn navigate_down(&mut self) {
        let max = self.entries().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_generation(&mut self) {
        self.generation = if self.generation >= 9 { 1 } else { self.generation + 1 };
    }

    pub fn selected_pokemon(&self) -> Option<&Pokemon> {
        self.page.as_ref()?.content.get(self.selected)
    }

    /// Finish search entry. Empty input just leaves composing mode.
    pub fn submit_search(&mut self) -> Option<String> {
        let name = self.search_input.trim().to_string();
        self.composing = false;
        self.search_input.clear();
        if name.is_empty() {
            return None;
        }
        Some(name)
    }

    pub fn clear_search(&mut self) {
        self.composing = false;
        self.search_input.clear();
        self.search_result = None;
    }

    fn entries(&self) -> usize {
        self.page.as_ref().map(|p| p.content.len()).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// History state (stored runs on the server)
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HistoryState {
    pub results: Vec<SavedResult>,
    pub selected: usize,
    /// Full row for the run the user opened with Enter.
    pub detail: Option<SavedResult>,
    pub scroll_offset: u16,
}

impl HistoryState {
    pub fn load(&mut self, results: Vec<SavedResult>) {
        self.selected = 0;
        self.scroll_offset = 0;
        self.detail = None;
        self.results = results;
    }

    pub fn navigate_down(&mut self) {
        let max = self.results.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Return the tournament ID of the currently selected row, if any.
    pub fn selected_tournament_id(&self) -> Option<String> {
        self.results.get(self.selected).map(|r| r.tournament_id.clone())
    }
}

// ---------------------------------------------------------------------------
// Statistics state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct StatsState {
    pub rows: Vec<PokemonStats>,
    /// None means all generations. The server only answers filtered queries,
    /// so generation and poke_type are never both None.
    pub generation: Option<u8>,
    pub poke_type: Option<String>,
    pub selected: usize,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            generation: Some(1),
            poke_type: None,
            selected: 0,
        }
    }
}

impl StatsState {
    pub fn load(&mut self, rows: Vec<PokemonStats>) {
        self.selected = 0;
        self.rows = rows;
    }

    pub fn navigate_down(&mut self) {
        let max = self.rows.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_generation(&mut self) {
        self.generation = match self.generation {
            None => Some(1),
            Some(g) if g < 9 => Some(g + 1),
            // wrapping past 9: drop the filter unless that would leave both
            // filters empty
            Some(_) if self.poke_type.is_some() => None,
            Some(_) => Some(1),
        };
    }

    pub fn cycle_type(&mut self) {
        let concrete = &TYPES[1..];
        let idx = self
            .poke_type
            .as_deref()
            .and_then(|t| concrete.iter().position(|c| *c == t));
        self.poke_type = match idx {
            None => Some(concrete[0].to_string()),
            Some(i) if i + 1 < concrete.len() => Some(concrete[i + 1].to_string()),
            Some(_) if self.generation.is_some() => None,
            Some(_) => Some(concrete[0].to_string()),
        };
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub worldcup: WorldCupState,
    pub pokedex: PokedexState,
    pub history: HistoryState,
    pub stats: StatsState,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_intro: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_form_cycles_wrap_both_ways() {
        let mut wc = WorldCupState::default();
        assert_eq!(wc.request.generation, "all");

        wc.cycle_value(false);
        assert_eq!(wc.request.generation, "9");
        wc.cycle_value(true);
        assert_eq!(wc.request.generation, "all");

        wc.setup_row_down();
        assert_eq!(wc.setup_row, SetupRow::Type);
        wc.cycle_value(true);
        assert_eq!(wc.request.poke_type, "normal");

        wc.setup_row_down();
        wc.cycle_value(true);
        assert_eq!(wc.request.participant_count, 32);
        wc.cycle_value(false);
        wc.cycle_value(false);
        assert_eq!(wc.request.participant_count, 8);
    }

    #[test]
    fn pairing_row_flips_the_rule_on_the_tournament() {
        let mut wc = WorldCupState::default();
        assert_eq!(wc.tournament.pairing(), PairingRule::ReseedById);

        wc.setup_row = SetupRow::Pairing;
        wc.cycle_value(true);
        assert_eq!(wc.tournament.pairing(), PairingRule::Positional);
        wc.cycle_value(true);
        assert_eq!(wc.tournament.pairing(), PairingRule::ReseedById);
    }

    #[test]
    fn stats_filters_never_go_both_empty() {
        let mut stats = StatsState::default();
        assert_eq!(stats.generation, Some(1));
        assert_eq!(stats.poke_type, None);

        // cycle generation all the way around with no type filter
        for _ in 0..9 {
            stats.cycle_generation();
        }
        assert_eq!(stats.generation, Some(1));

        // with a type filter set, the generation may drop to "all"
        stats.cycle_type();
        assert_eq!(stats.poke_type.as_deref(), Some("normal"));
        for _ in 0..9 {
            stats.cycle_generation();
        }
        assert_eq!(stats.generation, None);

        // now the type filter refuses to drop
        for _ in 0..18 {
            stats.cycle_type();
        }
        assert_eq!(stats.poke_type.as_deref(), Some("normal"));
    }

    #[test]
    fn search_submit_trims_and_skips_empty_input() {
        let mut dex = PokedexState::default();
        dex.composing = true;
        dex.search_input = "  ".to_string();
        assert_eq!(dex.submit_search(), None);
        assert!(!dex.composing);

        dex.composing = true;
        dex.search_input = " pikachu ".to_string();
        assert_eq!(dex.submit_search(), Some("pikachu".to_string()));
        assert!(dex.search_input.is_empty());
    }
}
