use pokecup_api::Participant;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};
use crate::state::tournament::{Match, Tournament};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: top-entrant line, status line, bottom-entrant line.
pub const MATCH_HEIGHT: u16 = 3;

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 22;

// ---------------------------------------------------------------------------
// MatchCellPos — pre-computed position for one match
// ---------------------------------------------------------------------------

/// Pre-computed layout position for one match within the bracket grid.
#[derive(Debug, Clone)]
pub struct MatchCellPos {
    /// Bracket-space row of the status line (entrant lines sit at +/-1).
    pub center_row: u16,
    /// Column of the cell's left edge, relative to the grid origin.
    pub col: u16,
    pub cell_width: u16,
    /// 0-based round index: depth 0 is round 1, the last depth is the final.
    pub depth: usize,
    /// Index of the match within its round, top to bottom.
    pub match_idx: usize,
}

// ---------------------------------------------------------------------------
// BracketGrid — full layout for a single-elimination tree
// ---------------------------------------------------------------------------

/// Pre-computed bracket layout. Columns run left to right from round 1 to the
/// final, with a connector zone between adjacent rounds.
#[derive(Debug, Clone)]
pub struct BracketGrid {
    pub cells: Vec<MatchCellPos>,
    /// cells[depth_offsets[d]..depth_offsets[d + 1]] are the depth-d cells.
    depth_offsets: Vec<usize>,
    pub round_cols: Vec<u16>,
    pub cell_width: u16,
    pub total_width: u16,
    pub total_height: u16,
}

impl BracketGrid {
    /// Lays out a bracket of `depths` rounds for the given terminal width.
    ///
    /// Slot heights nest by doubling: sh[0] = MATCH_HEIGHT and
    /// sh[d] = 2 * sh[d-1] + 1, so the status row of match i at depth d sits at
    ///
    ///   center[d][i] = sh[d] / 2 + i * (sh[d+1] - sh[d])
    ///
    /// which keeps every match vertically centered between the two matches
    /// that feed it.
    pub fn compute(depths: usize, terminal_width: u16) -> Self {
        let depths = depths.max(1);
        let mut sh = vec![MATCH_HEIGHT; depths + 1];
        for d in 1..=depths {
            sh[d] = 2 * sh[d - 1] + 1;
        }

        let connector_total = CONNECTOR_WIDTH * (depths as u16 - 1);
        let per_column = terminal_width.saturating_sub(connector_total) / depths as u16;
        let cell_width = per_column.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols: Vec<u16> = (0..depths as u16).map(|d| d * stride).collect();

        let mut cells = Vec::with_capacity((1 << depths) - 1);
        let mut depth_offsets = Vec::with_capacity(depths + 1);
        for d in 0..depths {
            depth_offsets.push(cells.len());
            let spacing = sh[d + 1] - sh[d];
            for i in 0..1usize << (depths - 1 - d) {
                cells.push(MatchCellPos {
                    center_row: sh[d] / 2 + i as u16 * spacing,
                    col: round_cols[d],
                    cell_width,
                    depth: d,
                    match_idx: i,
                });
            }
        }
        depth_offsets.push(cells.len());

        Self {
            cells,
            depth_offsets,
            round_cols,
            cell_width,
            total_width: (depths as u16 - 1) * stride + cell_width,
            total_height: sh[depths - 1],
        }
    }

    pub fn depths(&self) -> usize {
        self.round_cols.len()
    }

    pub fn cells_for_depth(&self, depth: usize) -> &[MatchCellPos] {
        &self.cells[self.depth_offsets[depth]..self.depth_offsets[depth + 1]]
    }
}

// ---------------------------------------------------------------------------
// BracketTreeView — widget
// ---------------------------------------------------------------------------

/// Renders the whole tree from round 1 to the final. Rounds the tournament
/// has not reached yet show as bare connector skeleton.
pub struct BracketTreeView<'a> {
    pub tournament: &'a Tournament,
    pub grid: &'a BracketGrid,
    /// Bracket-space row shown at the top of the viewport.
    pub scroll_offset: u16,
    pub theme: BannerTheme,
}

impl Widget for BracketTreeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 16 || area.height < MATCH_HEIGHT {
            return;
        }
        let current = self.tournament.current_match();

        // Pass 1: match cells.
        for cell in &self.grid.cells {
            let round = cell.depth as u32 + 1;
            let m = self.tournament.round_matches(round).get(cell.match_idx);
            let winner_id = m.and_then(|m| self.tournament.winner_of(&m.id));
            let is_current = matches!((m, current), (Some(m), Some(c)) if m.id == c.id);
            draw_match_cell(
                m,
                winner_id,
                is_current,
                is_current && self.tournament.is_transitioning(),
                cell,
                area,
                self.scroll_offset,
                self.theme,
                buf,
            );
        }

        // Pass 2: box-drawing connectors from each pair of matches to the
        // match their winners meet in.
        for depth in 0..self.grid.depths().saturating_sub(1) {
            let children = self.grid.cells_for_depth(depth);
            let parents = self.grid.cells_for_depth(depth + 1);
            let conn_x = area.x + self.grid.round_cols[depth] + self.grid.cell_width;
            for (j, parent) in parents.iter().enumerate() {
                draw_connector(
                    children[2 * j].center_row,
                    parent.center_row,
                    children[2 * j + 1].center_row,
                    conn_x,
                    area,
                    self.scroll_offset,
                    self.theme,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cell rendering
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn draw_match_cell(
    m: Option<&Match>,
    winner_id: Option<u32>,
    is_current: bool,
    settling: bool,
    cell: &MatchCellPos,
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail = (area.x + area.width - x) as usize;

    let primary = resolve(BannerColor::Primary, theme);
    let winner_style = resolve(BannerColor::Winner, theme);
    let dim = resolve(BannerColor::Dim, theme);
    let base = if is_current {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let rows = [
        (cell.center_row.saturating_sub(1), CellRow::Top),
        (cell.center_row, CellRow::Status),
        (cell.center_row + 1, CellRow::Bottom),
    ];
    for (bracket_row, which) in rows {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };
        let line = format_cell_row(m, winner_id, is_current, settling, which, cell.cell_width as usize);
        let clipped: String = line.chars().take(avail).collect();

        let style = match which {
            CellRow::Status => {
                if is_current {
                    primary
                } else {
                    dim
                }
            }
            CellRow::Top | CellRow::Bottom => {
                let entrant = m.map(|m| match which {
                    CellRow::Top => m.left.id,
                    _ => m.right.id,
                });
                if entrant.is_some() && entrant == winner_id {
                    winner_style
                } else {
                    base
                }
            }
        };
        buf.set_string(x, sy, &clipped, style);
    }
}

#[derive(Clone, Copy)]
enum CellRow {
    Top,
    Status,
    Bottom,
}

fn format_cell_row(
    m: Option<&Match>,
    winner_id: Option<u32>,
    is_current: bool,
    settling: bool,
    which: CellRow,
    width: usize,
) -> String {
    let Some(m) = m else {
        return " ".repeat(width);
    };
    match which {
        CellRow::Top => format_entrant_line(&m.left, width),
        CellRow::Bottom => format_entrant_line(&m.right, width),
        CellRow::Status => {
            let label = if settling {
                " SETTLING"
            } else if winner_id.is_some() {
                " FINAL"
            } else if is_current {
                " VOTE"
            } else {
                " PENDING"
            };
            format!("{label:<width$}").chars().take(width).collect()
        }
    }
}

/// "#025 Pikachu" padded to exactly `width` characters.
fn format_entrant_line(p: &Participant, width: usize) -> String {
    let tag = format!("#{:03}", p.id);
    let name_w = width.saturating_sub(tag.chars().count() + 2);
    let name: String = p.display_name().chars().take(name_w).collect();
    format!("{tag} {name:<name_w$} ")
}

// ---------------------------------------------------------------------------
// Scroll and connector helpers
// ---------------------------------------------------------------------------

/// Maps a bracket-space row to a screen row, or None when scrolled out of the
/// viewport.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if bracket_row < scroll {
        return None;
    }
    let rel = bracket_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_x: u16,
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Dim, theme);
    let limit_x = area.x + area.width;

    macro_rules! put {
        ($x:expr, $row:expr, $ch:expr) => {
            if $x < limit_x {
                if let Some(sy) = screen_y($row, scroll, area) {
                    put_char(buf, $x, sy, $ch, style);
                }
            }
        };
    }

    let col_a = conn_x;
    let col_b = conn_x + 1;
    let col_c = conn_x + 2;

    put!(col_a, r_top, '─');
    put!(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put!(col_b, row, '│');
    }
    put!(col_a, r_mid, '─');
    put!(col_b, r_mid, '├');
    put!(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put!(col_b, row, '│');
    }
    put!(col_a, r_bot, '─');
    put!(col_b, r_bot, '┘');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entrant(id: u32, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            ..Participant::default()
        }
    }

    #[test]
    fn grid_covers_the_whole_field() {
        let grid = BracketGrid::compute(3, 80);
        assert_eq!(grid.cells.len(), 7);
        assert_eq!(grid.cells_for_depth(0).len(), 4);
        assert_eq!(grid.cells_for_depth(1).len(), 2);
        assert_eq!(grid.cells_for_depth(2).len(), 1);
        assert_eq!(grid.depths(), 3);
    }

    #[test]
    fn slot_heights_nest_by_doubling() {
        assert_eq!(BracketGrid::compute(1, 80).total_height, 3);
        assert_eq!(BracketGrid::compute(2, 80).total_height, 7);
        assert_eq!(BracketGrid::compute(3, 80).total_height, 15);
        assert_eq!(BracketGrid::compute(4, 80).total_height, 31);
        assert_eq!(BracketGrid::compute(6, 80).total_height, 127);
    }

    #[test]
    fn first_round_centers_are_evenly_spaced() {
        let grid = BracketGrid::compute(4, 120);
        let first: Vec<u16> = grid.cells_for_depth(0).iter().map(|c| c.center_row).collect();
        assert_eq!(first, vec![1, 5, 9, 13, 17, 21, 25, 29]);
        let second: Vec<u16> = grid.cells_for_depth(1).iter().map(|c| c.center_row).collect();
        assert_eq!(second, vec![3, 11, 19, 27]);
        let final_cell: Vec<u16> = grid.cells_for_depth(3).iter().map(|c| c.center_row).collect();
        assert_eq!(final_cell, vec![15]);
    }

    #[test]
    fn every_match_sits_between_the_two_that_feed_it() {
        for depths in 2..=6 {
            let grid = BracketGrid::compute(depths, 200);
            for depth in 0..depths - 1 {
                let children = grid.cells_for_depth(depth);
                let parents = grid.cells_for_depth(depth + 1);
                for (j, parent) in parents.iter().enumerate() {
                    let top = children[2 * j].center_row;
                    let bot = children[2 * j + 1].center_row;
                    assert_eq!(
                        parent.center_row,
                        (top + bot) / 2,
                        "depths={depths} depth={depth} match={j}"
                    );
                }
            }
        }
    }

    #[test]
    fn round_columns_advance_by_cell_plus_connector() {
        let grid = BracketGrid::compute(3, 80);
        let stride = grid.cell_width + CONNECTOR_WIDTH;
        assert_eq!(grid.round_cols, vec![0, stride, 2 * stride]);
        assert_eq!(grid.total_width, 2 * stride + grid.cell_width);
    }

    #[test]
    fn cell_width_shrinks_with_the_terminal_and_caps_wide() {
        let tight = BracketGrid::compute(4, 60);
        assert_eq!(tight.cell_width, (60 - 3 * CONNECTOR_WIDTH) / 4);
        let wide = BracketGrid::compute(4, 300);
        assert_eq!(wide.cell_width, CELL_W_FULL);
    }

    #[test]
    fn entrant_line_is_exactly_cell_width() {
        let short = entrant(25, "pikachu");
        assert_eq!(format_entrant_line(&short, 14).chars().count(), 14);
        assert_eq!(format_entrant_line(&short, 22).chars().count(), 22);
        // Four-digit dex ids widen the tag without breaking the line width.
        let late = entrant(1008, "miraidon");
        assert_eq!(format_entrant_line(&late, 22).chars().count(), 22);
    }

    #[test]
    fn entrant_line_truncates_long_names() {
        let long = entrant(3, "venusaur-gmax-something");
        let line = format_entrant_line(&long, 14);
        assert_eq!(line.chars().count(), 14);
        assert!(line.starts_with("#003 "));
    }

    #[test]
    fn status_line_tracks_the_match_lifecycle() {
        let m = Match {
            id: "round-1-match-1".into(),
            round: 1,
            match_number: 1,
            left: entrant(1, "bulbasaur"),
            right: entrant(4, "charmander"),
        };
        let pending = format_cell_row(Some(&m), None, false, false, CellRow::Status, 10);
        assert_eq!(pending.trim(), "PENDING");
        let vote = format_cell_row(Some(&m), None, true, false, CellRow::Status, 10);
        assert_eq!(vote.trim(), "VOTE");
        let settling = format_cell_row(Some(&m), Some(1), true, true, CellRow::Status, 10);
        assert_eq!(settling.trim(), "SETTLING");
        let done = format_cell_row(Some(&m), Some(1), false, false, CellRow::Status, 10);
        assert_eq!(done.trim(), "FINAL");
    }

    #[test]
    fn unreached_rounds_render_blank() {
        let m = format_cell_row(None, None, false, false, CellRow::Top, 8);
        assert_eq!(m, "        ");
    }

    #[test]
    fn screen_y_clips_to_the_viewport() {
        let area = Rect::new(0, 2, 40, 10);
        assert_eq!(screen_y(0, 0, area), Some(2));
        assert_eq!(screen_y(9, 0, area), Some(11));
        assert_eq!(screen_y(10, 0, area), None);
        assert_eq!(screen_y(3, 4, area), None);
        assert_eq!(screen_y(14, 5, area), Some(11));
    }
}
