//! Startup banner for the terminal menu.

use crossterm::style::{Color, Stylize};
use figlet_rs::FIGfont;

const ACCENT: Color = Color::Rgb {
    r: 0x2e,
    g: 0xc4,
    b: 0xb6,
};

const TAGLINE: &str = "therapy session summaries, concerns and breakthroughs";

/// Title art followed by the version line. Falls back to plain text if the font fails.
fn banner_lines() -> Vec<String> {
    let art = FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("INSIGHT").map(|f| f.to_string()))
        .unwrap_or_else(|| "SESSION INSIGHT\n".to_string());
    let mut lines: Vec<String> = art
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect();
    lines.push(format!(
        "session-insight v{}  {}",
        env!("CARGO_PKG_VERSION"),
        TAGLINE
    ));
    lines
}

pub fn print_welcome() {
    let lines = banner_lines();
    let (art, footer) = lines.split_at(lines.len() - 1);
    for line in art {
        println!("{}", line.as_str().with(ACCENT).bold());
    }
    println!("{}\n", footer[0].as_str().dim());
}
