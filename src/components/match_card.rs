use pokecup_api::Participant;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

/// One side of the running match, rendered inside a border owned by the
/// caller. Shows the dex tag, Korean-first name, typing and flavor text.
pub struct MatchCard<'a> {
    pub participant: &'a Participant,
    /// Set during the settle pause when this entrant took the vote.
    pub chosen: bool,
    pub theme: BannerTheme,
}

impl Widget for MatchCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 4 {
            return;
        }
        let p = self.participant;
        let w = area.width as usize;

        let dim = resolve(BannerColor::Dim, self.theme);
        let accent = resolve(BannerColor::Accent, self.theme);
        let winner = resolve(BannerColor::Winner, self.theme);
        let name_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        // Header row: dex tag left, generation right.
        let tag = format!("#{:03}", p.id);
        buf.set_string(area.x, area.y, &tag, dim);
        let r#gen = format!("GEN {}", p.generation);
        if tag.chars().count() + r#gen.chars().count() + 2 <= w {
            let gx = area.x + area.width - r#gen.chars().count() as u16;
            buf.set_string(gx, area.y, &r#gen, dim);
        }

        let mut lines: Vec<(String, Style)> = vec![(p.display_name().to_string(), name_style)];
        if !p.korean_name.is_empty() {
            lines.push((p.name.clone(), Style::default().fg(Color::Gray)));
        }
        lines.push((p.type_summary(), accent));
        lines.push((String::new(), dim));
        for row in wrap_text(&p.description, w.saturating_sub(2)) {
            lines.push((row, dim));
        }

        let bottom = area.y + area.height;
        let footer_rows: u16 = if self.chosen { 1 } else { 0 };
        let mut y = area.y + 1;
        for (text, style) in lines {
            if y + footer_rows >= bottom {
                break;
            }
            let clipped: String = text.chars().take(w).collect();
            buf.set_string(area.x, y, &clipped, style);
            y += 1;
        }

        if self.chosen {
            let label = "★ YOUR PICK ★";
            let lx = area.x + area.width.saturating_sub(label.chars().count() as u16) / 2;
            buf.set_string(lx, bottom - 1, label, winner);
        }
    }
}

/// Greedy word wrap by char count. Words longer than a row get hard-split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut rows: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = word.chars().count() + if line.is_empty() { 0 } else { 1 };
        if !line.is_empty() && line.chars().count() + needed > width {
            rows.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        for ch in word.chars() {
            if line.chars().count() >= width {
                rows.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
    }
    if !line.is_empty() {
        rows.push(line);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_the_width() {
        let text = "Mouse Pokemon. When several of these gather, their electricity \
                    could build and cause lightning storms.";
        let rows = wrap_text(text, 20);
        assert!(rows.iter().all(|r| r.chars().count() <= 20));
        assert_eq!(rows[0], "Mouse Pokemon. When");
    }

    #[test]
    fn wrap_splits_words_longer_than_the_row() {
        assert_eq!(wrap_text("thunderbolt", 5), vec!["thund", "erbol", "t"]);
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap_text("", 12).is_empty());
        assert!(wrap_text("anything", 0).is_empty());
    }
}
