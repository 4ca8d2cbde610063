use crate::app::{App, MenuItem};
use crate::state::app_state::VoteSide;
use crate::state::messages::{NetworkRequest, UiEvent};
use crate::state::tournament::Phase;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};

/// Pause between a vote landing and the bracket advancing. Long enough to
/// read the winner before the next pairing comes up.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    ui_events: &mpsc::Sender<UiEvent>,
) {
    let mut guard = app.lock().await;
    let mut request = None;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    // Search entry captures every printable key, so it runs before the
    // regular bindings.
    if guard.state.active_tab == MenuItem::Pokedex && guard.state.pokedex.composing {
        match (key_event.code, key_event.modifiers) {
            (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Enter, _) => request = guard.pokedex_submit_search(),
            (KeyCode::Esc, _) => guard.state.pokedex.clear_search(),
            (KeyCode::Backspace, _) => {
                guard.state.pokedex.search_input.pop();
            }
            (Char(c), _) => guard.state.pokedex.search_input.push(c),
            _ => {}
        }
        if let Some(request) = request {
            drop(guard);
            let _ = network_requests.send(request).await;
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching; tabs backed by the server load on first visit
        (_, Char('1'), _) => guard.update_tab(MenuItem::WorldCup),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('3'), _) => {
            guard.update_tab(MenuItem::Pokedex);
            request = guard.tab_load_request(MenuItem::Pokedex);
        }
        (_, Char('4'), _) => {
            guard.update_tab(MenuItem::History);
            request = guard.tab_load_request(MenuItem::History);
        }
        (_, Char('5'), _) => {
            guard.update_tab(MenuItem::Stats);
            request = guard.tab_load_request(MenuItem::Stats);
        }
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // World cup: setup form
        (MenuItem::WorldCup, Char('j') | KeyCode::Down, _) if in_setup(&guard) => {
            guard.state.worldcup.setup_row_down();
        }
        (MenuItem::WorldCup, Char('k') | KeyCode::Up, _) if in_setup(&guard) => {
            guard.state.worldcup.setup_row_up();
        }
        (MenuItem::WorldCup, Char('l') | KeyCode::Right, _) if in_setup(&guard) => {
            guard.state.worldcup.cycle_value(true);
        }
        (MenuItem::WorldCup, Char('h') | KeyCode::Left, _) if in_setup(&guard) => {
            guard.state.worldcup.cycle_value(false);
        }
        (MenuItem::WorldCup, KeyCode::Enter, _) if in_setup(&guard) => {
            request = guard.worldcup_submit_setup();
        }

        // World cup: voting
        (MenuItem::WorldCup, Char('h') | KeyCode::Left, _) if voting(&guard) => {
            guard.state.worldcup.highlight = VoteSide::Left;
        }
        (MenuItem::WorldCup, Char('l') | KeyCode::Right, _) if voting(&guard) => {
            guard.state.worldcup.highlight = VoteSide::Right;
        }
        (MenuItem::WorldCup, KeyCode::Tab, _) if voting(&guard) => {
            guard.state.worldcup.toggle_highlight();
        }
        (MenuItem::WorldCup, KeyCode::Enter, _) if voting(&guard) => {
            // the timer is only armed for the vote that took; re-entry
            // during the settle window is dropped by the bracket
            if guard.worldcup_vote() {
                let events = ui_events.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(SETTLE_DELAY).await;
                    let _ = events.send(UiEvent::MatchSettled).await;
                });
            }
        }
        (MenuItem::WorldCup, Char('x'), _) if voting(&guard) => guard.worldcup_abort(),

        // World cup: completion screen
        (MenuItem::WorldCup, Char('s'), _) => request = guard.worldcup_retry_save(),
        (MenuItem::WorldCup, Char('n'), _) if completed(&guard) => guard.worldcup_abort(),

        // Bracket tree
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => {
            guard.state.worldcup.bracket_scroll =
                guard.state.worldcup.bracket_scroll.saturating_add(1);
        }
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => {
            guard.state.worldcup.bracket_scroll =
                guard.state.worldcup.bracket_scroll.saturating_sub(1);
        }

        // Pokedex
        (MenuItem::Pokedex, Char('j') | KeyCode::Down, _) => guard.state.pokedex.navigate_down(),
        (MenuItem::Pokedex, Char('k') | KeyCode::Up, _) => guard.state.pokedex.navigate_up(),
        (MenuItem::Pokedex, Char('l') | KeyCode::Right, _) => request = guard.pokedex_next_page(),
        (MenuItem::Pokedex, Char('h') | KeyCode::Left, _) => request = guard.pokedex_prev_page(),
        (MenuItem::Pokedex, Char('g'), _) => request = Some(guard.pokedex_cycle_generation()),
        (MenuItem::Pokedex, Char('/'), _) => guard.state.pokedex.composing = true,
        (MenuItem::Pokedex, KeyCode::Esc, _) => guard.state.pokedex.clear_search(),

        // History
        (MenuItem::History, Char('j') | KeyCode::Down, _) => guard.state.history.navigate_down(),
        (MenuItem::History, Char('k') | KeyCode::Up, _) => guard.state.history.navigate_up(),
        (MenuItem::History, KeyCode::Enter, _) => request = guard.history_select(),
        (MenuItem::History, KeyCode::Esc, _) => guard.state.history.detail = None,
        (MenuItem::History, Char('r'), _) => request = Some(NetworkRequest::LoadHistory),

        // Statistics
        (MenuItem::Stats, Char('j') | KeyCode::Down, _) => guard.state.stats.navigate_down(),
        (MenuItem::Stats, Char('k') | KeyCode::Up, _) => guard.state.stats.navigate_up(),
        (MenuItem::Stats, Char('g'), _) => request = Some(guard.stats_cycle_generation()),
        (MenuItem::Stats, Char('t'), _) => request = Some(guard.stats_cycle_type()),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(request) = request {
        drop(guard);
        let _ = network_requests.send(request).await;
    }
}

fn in_setup(app: &App) -> bool {
    app.state.worldcup.tournament.phase() == Phase::Setup
}

fn voting(app: &App) -> bool {
    app.state.worldcup.tournament.phase() == Phase::InProgress
}

fn completed(app: &App) -> bool {
    app.state.worldcup.tournament.phase() == Phase::Completed
}
