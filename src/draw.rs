use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::banner::AnimatedBanner;
use crate::components::banner_frames::BannerTheme;
use crate::components::bracket::{BracketGrid, BracketTreeView};
use crate::components::match_card::{MatchCard, wrap_text};
use crate::state::app_state::{PokedexState, SaveStatus, SetupRow, VoteSide};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::tournament::{PairingRule, Phase, Tournament};
use crate::ui::layout::LayoutAreas;
use pokecup_api::{Participant, Pokemon, SavedResult};

static TABS: &[&str; 5] = &["World Cup", "Bracket", "Pokedex", "History", "Stats"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            if app.state.show_intro {
                draw_intro(f, f.area(), app);
                return;
            }

            layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::WorldCup => draw_worldcup(f, layout.main, app),
                MenuItem::Bracket => draw_bracket_tree(f, layout.main, app),
                MenuItem::Pokedex => draw_pokedex(f, layout.main, app),
                MenuItem::History => draw_history(f, layout.main, app),
                MenuItem::Stats => draw_stats(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Help: q=quit  1-5=tabs  ?=help  f=fullscreen  \"=logs\n\
                     World Cup: j/k=row  h/l=change  Enter=start | h/l/Tab=side  Enter=vote  x=abort | s=retry save  n=new cup\n\
                     Bracket: j/k=scroll\n\
                     Pokedex: j/k=move  h/l=page  g=generation  /=search  Esc=clear\n\
                     History: j/k=move  Enter=detail  Esc=back  r=reload\n\
                     Stats: j/k=move  g=generation  t=type",
                ),
            }

            if let Some(logs) = layout.logs {
                draw_logs(f, logs);
            }

            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Pokemon World Cup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        AnimatedBanner {
            frame: app.state.animation.frame,
            tick: app.state.animation.tick,
            theme: BannerTheme::Dark,
            subtitle: banner_subtitle(&app.state.worldcup.tournament),
        },
        banner_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to start")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn banner_subtitle(tournament: &Tournament) -> String {
    match tournament.phase() {
        Phase::Setup => String::new(),
        Phase::InProgress => tournament.round_label(),
        Phase::Completed => tournament
            .result()
            .map(|r| format!("CHAMPION {}", r.winner.display_name()))
            .unwrap_or_default(),
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::WorldCup => 0,
        MenuItem::Bracket => 1,
        MenuItem::Pokedex => 2,
        MenuItem::History => 3,
        MenuItem::Stats => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// World Cup tab
// ---------------------------------------------------------------------------

fn draw_worldcup(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" World Cup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.state.worldcup.tournament.phase() {
        Phase::Setup => draw_setup_form(f, inner, app),
        Phase::InProgress => draw_vote_screen(f, inner, app),
        Phase::Completed => draw_completion(f, inner, app),
    }
}

fn draw_setup_form(f: &mut Frame, area: Rect, app: &App) {
    let wc = &app.state.worldcup;
    let request = &wc.request;

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from("Set the field, then Enter to draw it"));
    lines.push(Line::from(Span::styled(
        "Keys: j/k=row  h/l=change  Enter=start  q=quit",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let pairing_label = match wc.tournament.pairing() {
        PairingRule::ReseedById => "reseed by id",
        PairingRule::Positional => "positional",
    };
    let rows = [
        (SetupRow::Generation, "Generation", request.generation.clone()),
        (SetupRow::Type, "Type", request.poke_type.clone()),
        (SetupRow::FieldSize, "Field size", request.participant_count.to_string()),
        (SetupRow::Pairing, "Pairing", pairing_label.to_string()),
    ];
    for (row, label, value) in rows {
        let style = if wc.setup_row == row {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if wc.setup_row == row { '>' } else { ' ' };
        lines.push(Line::from(Span::styled(
            format!("{marker} {label:<12} < {value} >"),
            style,
        )));
    }

    lines.push(Line::from(""));
    if wc.waiting_for_field {
        lines.push(Line::from(Span::styled(
            "Drawing field from the server...",
            Style::default().fg(Color::Yellow),
        )));
    }
    if let Some(err) = app.state.last_error.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_vote_screen(f: &mut Frame, area: Rect, app: &App) {
    let wc = &app.state.worldcup;
    let tournament = &wc.tournament;
    let Some(current) = tournament.current_match() else {
        f.render_widget(
            Paragraph::new("No match to show")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let [header, key_legend, cards, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let header_text = format!(
        "{} | {} | Match {}/{} | {}/{} played",
        tournament.conditions().title,
        tournament.round_label(),
        current.match_number,
        tournament.round_matches(current.round).len(),
        tournament.matches_played(),
        tournament.matches_total(),
    );
    f.render_widget(Paragraph::new(header_text), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=side  Tab=switch  Enter=vote  x=abort  2=bracket")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let [left_area, vs_area, right_area] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(6),
        Constraint::Fill(1),
    ])
    .areas(cards);

    let decided = tournament.winner_of(&current.id);
    draw_vote_card(
        f,
        left_area,
        &current.left,
        wc.highlight == VoteSide::Left,
        decided == Some(current.left.id),
    );
    draw_vote_card(
        f,
        right_area,
        &current.right,
        wc.highlight == VoteSide::Right,
        decided == Some(current.right.id),
    );

    if vs_area.height > 0 {
        let vs = if tournament.is_transitioning() { "..." } else { "VS" };
        f.render_widget(
            Paragraph::new(vs)
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .alignment(Alignment::Center),
            Rect::new(vs_area.x, vs_area.y + vs_area.height / 2, vs_area.width, 1),
        );
    }

    if let Some(err) = app.state.last_error.as_deref() {
        f.render_widget(
            Paragraph::new(format!("Error: {err}")).style(Style::default().fg(Color::Red)),
            footer,
        );
    }
}

fn draw_vote_card(f: &mut Frame, area: Rect, participant: &Participant, highlighted: bool, chosen: bool) {
    let border = if chosen {
        Color::Green
    } else if highlighted {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let block = default_border(border).title(format!(" {} ", participant.display_name()));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        MatchCard {
            participant,
            chosen,
            theme: BannerTheme::Dark,
        },
        inner,
    );
}

fn draw_completion(f: &mut Frame, area: Rect, app: &App) {
    let wc = &app.state.worldcup;
    let Some(result) = wc.tournament.result() else {
        f.render_widget(
            Paragraph::new("No result yet")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "CHAMPION  {}  ({})",
            result.winner.display_name(),
            result.winner.type_summary()
        ),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!("{} | {} entrants", result.title, result.participants.len()),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    let max_rows = area.height.saturating_sub(6) as usize;
    for entry in result.final_ranking.iter().take(max_rows.max(4)) {
        let losses = entry.total_matches - entry.wins;
        lines.push(Line::from(format!(
            "{:>2}. #{:03} {:<14} {}W-{}L  {}%",
            entry.rank,
            entry.participant.id,
            entry.participant.display_name(),
            entry.wins,
            losses,
            entry.win_rate,
        )));
    }
    lines.push(Line::from(""));

    let (save_line, save_style) = match &wc.save {
        SaveStatus::Idle => (
            "Result not saved".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        SaveStatus::Saving => (
            "Saving result...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        SaveStatus::Saved { row_id } => (
            match row_id {
                Some(id) => format!("Result saved (#{id})"),
                None => "Result saved".to_string(),
            },
            Style::default().fg(Color::Green),
        ),
        SaveStatus::Failed { message } => (
            format!("Save failed: {message}  (s to retry)"),
            Style::default().fg(Color::Red),
        ),
    };
    lines.push(Line::from(Span::styled(save_line, save_style)));
    lines.push(Line::from(Span::styled(
        "Keys: n=new cup  4=history  q=quit",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Bracket tab
// ---------------------------------------------------------------------------

fn draw_bracket_tree(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Bracket ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let tournament = &app.state.worldcup.tournament;
    if tournament.total_rounds() == 0 {
        f.render_widget(
            Paragraph::new("No bracket yet. Start a cup on the World Cup tab.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [header, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let phase_label = match tournament.phase() {
        Phase::Setup => "setup",
        Phase::InProgress => "live",
        Phase::Completed => "done",
    };
    f.render_widget(
        Paragraph::new(format!(
            "{} | {}/{} played | {} | j/k=scroll",
            tournament.conditions().title,
            tournament.matches_played(),
            tournament.matches_total(),
            phase_label,
        ))
        .style(Style::default().fg(Color::DarkGray)),
        header,
    );

    let grid = BracketGrid::compute(tournament.total_rounds() as usize, content.width);
    let max_scroll = grid.total_height.saturating_sub(content.height);
    f.render_widget(
        BracketTreeView {
            tournament,
            grid: &grid,
            scroll_offset: app.state.worldcup.bracket_scroll.min(max_scroll),
            theme: BannerTheme::Dark,
        },
        content,
    );
}

// ---------------------------------------------------------------------------
// Pokedex tab
// ---------------------------------------------------------------------------

fn draw_pokedex(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Pokedex ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height < 4 {
        return;
    }

    let pokedex = &app.state.pokedex;
    let [header, key_legend, content, search_bar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let header_text = match pokedex.page.as_ref() {
        Some(page) => format!(
            "Generation {} | page {}/{} | {} species",
            page.generation,
            page.page + 1,
            page.total_pages.max(1),
            page.total_elements,
        ),
        None => format!("Generation {} | loading...", pokedex.generation),
    };
    f.render_widget(Paragraph::new(header_text), header);
    f.render_widget(
        Paragraph::new("Keys: j/k=move  h/l=page  g=generation  /=search  Esc=clear")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );
    draw_search_bar(f, search_bar, pokedex);

    let (list_area, detail_area) = if content.width >= 70 {
        let [l, r] = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .areas(content);
        (l, Some(r))
    } else {
        (content, None)
    };

    let Some(page) = pokedex.page.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading pokedex...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            list_area,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    let visible = list_area.height as usize;
    let start = (pokedex.selected + 1).saturating_sub(visible.max(1));
    for (idx, p) in page.content.iter().enumerate().skip(start).take(visible.max(1)) {
        let marker = if idx == pokedex.selected { '>' } else { ' ' };
        let style = if idx == pokedex.selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} #{:03} {}", p.id, p.display_name()),
            style,
        )));
    }
    if page.content.is_empty() {
        lines.push(Line::from(Span::styled(
            "No species on this page",
            Style::default().fg(Color::DarkGray),
        )));
    }
    f.render_widget(Paragraph::new(lines), list_area);

    if let Some(detail_area) = detail_area {
        // search hits win over the list selection until cleared
        let shown = pokedex.search_result.as_ref().or_else(|| pokedex.selected_pokemon());
        draw_pokemon_detail(f, detail_area, shown);
    }
}

fn draw_search_bar(f: &mut Frame, area: Rect, pokedex: &PokedexState) {
    let (text, style) = if pokedex.composing {
        (
            format!("> {}_", pokedex.search_input),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(found) = pokedex.search_result.as_ref() {
        (
            format!("Found {} (Esc to clear)", found.display_name()),
            Style::default().fg(Color::Green),
        )
    } else {
        (
            "Press / to search by name".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}

fn draw_pokemon_detail(f: &mut Frame, area: Rect, pokemon: Option<&Pokemon>) {
    let block = default_border(Color::DarkGray).title(" Detail ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(p) = pokemon else {
        f.render_widget(
            Paragraph::new("Select a species")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("#{:03} ", p.id), Style::default().fg(Color::DarkGray)),
        Span::styled(
            p.display_name().to_string(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ]));
    if !p.korean_name.is_empty() {
        lines.push(Line::from(Span::styled(
            p.name.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    let types = if p.korean_types.is_empty() {
        p.types.join("/")
    } else {
        p.korean_types.join("/")
    };
    lines.push(Line::from(format!("Type {types}  GEN {}", p.generation)));
    // height in decimetres, weight in hectograms
    lines.push(Line::from(format!(
        "{:.1} m  {:.1} kg",
        p.height as f32 / 10.0,
        p.weight as f32 / 10.0,
    )));
    if !p.abilities.is_empty() {
        lines.push(Line::from(format!("Abilities: {}", p.abilities.join(", "))));
    }
    lines.push(Line::from(""));

    let bar_max = u32::from(inner.width.saturating_sub(21));
    for stat in &p.stats {
        let filled = (u32::from(stat.base) * bar_max / 255).min(bar_max) as usize;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<16}{:>4} ", stat.name, stat.base),
                Style::default().fg(Color::Gray),
            ),
            Span::styled("█".repeat(filled), Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("{:<16}{:>4}", "total", p.stat_total()),
        Style::default().fg(Color::White),
    )));
    lines.push(Line::from(""));

    for row in wrap_text(&p.description, inner.width.saturating_sub(2) as usize) {
        lines.push(Line::from(Span::styled(row, Style::default().fg(Color::DarkGray))));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// History tab
// ---------------------------------------------------------------------------

fn draw_history(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" History ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if let Some(detail) = app.state.history.detail.as_ref() {
        draw_history_detail(f, inner, detail);
        return;
    }

    if app.state.history.results.is_empty() {
        f.render_widget(
            Paragraph::new("No saved cups yet. Finish one on the World Cup tab.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let mut lines: Vec<Line> = Vec::with_capacity(app.state.history.results.len() + 2);
    lines.push(Line::from(Span::styled(
        "Keys: j/k=move  Enter=detail  r=reload",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    let visible = inner.height.saturating_sub(2) as usize;
    let start = (app.state.history.selected + 1).saturating_sub(visible.max(1));
    for (idx, result) in app
        .state
        .history
        .results
        .iter()
        .enumerate()
        .skip(start)
        .take(visible.max(1))
    {
        let marker = if idx == app.state.history.selected { '>' } else { ' ' };
        let when = result
            .completed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let style = if idx == app.state.history.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker} {} {} {} {when}",
                truncate_name(&result.title, 24),
                truncate_name(result.winner_label(), 12),
                truncate_name(&result.condition_summary(), 28),
            ),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_history_detail(f: &mut Frame, area: Rect, detail: &SavedResult) {
    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            detail.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", detail.condition_summary()),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(Span::styled(
        format!("Winner: {}", detail.winner_label()),
        Style::default().fg(Color::Green),
    )));
    if let Some(done) = detail.completed_at {
        lines.push(Line::from(Span::styled(
            format!("Completed {}", done.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Final ranking (Esc to go back):"));

    let max_rows = area.height.saturating_sub(6) as usize;
    for entry in detail.final_ranking.iter().take(max_rows.max(4)) {
        lines.push(Line::from(format!(
            "{:>2}. #{:03} {:<14} {}W  {}%",
            entry.rank,
            entry.participant.id,
            entry.participant.display_name(),
            entry.wins,
            entry.win_rate,
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

// ---------------------------------------------------------------------------
// Statistics tab
// ---------------------------------------------------------------------------

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Statistics ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let stats = &app.state.stats;
    let generation = stats
        .generation
        .map(|g| g.to_string())
        .unwrap_or_else(|| "all".to_string());
    let poke_type = stats.poke_type.clone().unwrap_or_else(|| "all".to_string());

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(format!("Generation: {generation}   Type: {poke_type}")));
    lines.push(Line::from(Span::styled(
        "Keys: j/k=move  g=generation  t=type",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if stats.rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No statistics for this filter yet",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(Paragraph::new(lines), inner);
        return;
    }

    lines.push(Line::from(Span::styled(
        format!(
            "   {} {:>5} {:>5} {:>5} {:>5} {:>6} {:>5}",
            truncate_name("name", 16),
            "runs",
            "wins",
            "top3",
            "win%",
            "top3%",
            "rank"
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let visible = inner.height.saturating_sub(4) as usize;
    let start = (stats.selected + 1).saturating_sub(visible.max(1));
    for (idx, row) in stats.rows.iter().enumerate().skip(start).take(visible.max(1)) {
        let marker = if idx == stats.selected { '>' } else { ' ' };
        let style = if idx == stats.selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{marker}  {} {:>5} {:>5} {:>5} {:>4}% {:>5}% {:>5}",
                truncate_name(row.display_name(), 16),
                row.total_participations,
                row.total_wins,
                row.total_top3,
                row.win_rate,
                row.top3_rate,
                row.average_rank,
            ),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn truncate_name(name: &str, max: usize) -> String {
    let mut s: String = name.chars().take(max).collect();
    while s.chars().count() < max {
        s.push(' ');
    }
    s
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .style_trace(Style::default().fg(Color::DarkGray))
        .output_separator(' ')
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(widget, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
