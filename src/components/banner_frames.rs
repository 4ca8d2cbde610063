use tui::style::{Color, Modifier, Style};

pub const FRAME_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BannerColor {
    Primary,
    Secondary,
    Accent,
    Shadow,
    Dim,
    Winner,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BannerTheme {
    #[default]
    Dark,
}

pub fn resolve(color: BannerColor, _theme: BannerTheme) -> Style {
    match color {
        // logo yellow / pokeball red / logo blue
        BannerColor::Primary => Style::default().fg(Color::Rgb(255, 203, 5)),
        BannerColor::Secondary => Style::default().fg(Color::Rgb(204, 0, 0)),
        BannerColor::Accent => Style::default()
            .fg(Color::Rgb(61, 125, 202))
            .add_modifier(Modifier::BOLD),
        BannerColor::Shadow | BannerColor::Dim => Style::default().fg(Color::Indexed(240)),
        BannerColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

/// Triangle-wave bounce row for the pokeball, 0..height-1 and back.
pub fn ball_row(tick: u64, height: u16) -> u16 {
    if height == 0 {
        return 0;
    }
    let h = u64::from(height.saturating_sub(1));
    if h == 0 {
        return 0;
    }
    let period = 2 * h;
    let t = tick % period;
    (h.abs_diff(t)) as u16
}

pub fn pokeball_frame(frame: usize) -> [&'static str; 4] {
    // the center button blinks across the four frames
    const FRAMES: [[&str; 4]; FRAME_COUNT] = [
        [" .----. ", "/ .--. \\", "|-(oo)-|", " '----' "],
        [" .----. ", "/ .--. \\", "|-(o.)-|", " '----' "],
        [" .----. ", "/ .--. \\", "|-(..)-|", " '----' "],
        [" .----. ", "/ .--. \\", "|-(.o)-|", " '----' "],
    ];
    FRAMES[frame % FRAME_COUNT]
}

pub fn title_rows() -> [&'static str; 4] {
    [
        " ___   ___   _  __ ___   ___  _   _  ___ ",
        "| _ \\ / _ \\ | |/ /| __| / __|| | | || _ \\",
        "|  _/| (_) || ' < | _| | (__ | |_| ||  _/",
        "|_|   \\___/ |_|\\_\\|___| \\___| \\___/ |_|  ",
    ]
}
