use crate::ui::Icons;
use console::Term;
use owo_colors::{OwoColorize, Style};
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `CAOSDB_QUIET=1` (or `true`) silences everything but warnings
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("CAOSDB_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

fn colour_enabled(term: &Term) -> bool {
    term.is_term() && std::env::var_os("NO_COLOR").is_none()
}

fn paint(term: &Term, text: &str, style: Style) -> String {
    styled(colour_enabled(term), text, style)
}

fn styled(colour: bool, text: &str, style: Style) -> String {
    if colour {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

fn say(line: String) {
    if !is_quiet() {
        println!("{}", line);
    }
}

pub fn header(text: &str) {
    let out = Term::stdout();
    say(format!("{} {}", Icons::ROCKET, paint(&out, text, Style::new().cyan().bold())));
}

pub fn success(label: &str) {
    let out = Term::stdout();
    say(format!("{} {}", Icons::CHECK, paint(&out, label, Style::new().green().bold())));
}

// Warnings go to stderr and ignore quiet mode.
pub fn warn(label: &str) {
    let err = Term::stderr();
    eprintln!("{} {}", Icons::WARN, paint(&err, label, Style::new().yellow().bold()));
}

/// `icon label: value`, e.g. the database path or a reviewer
pub fn info(icon: &str, label: &str, value: &str) {
    let out = Term::stdout();
    say(format!(
        "{} {}: {}",
        paint(&out, icon, Style::new().magenta()),
        paint(&out, label, Style::new().dimmed()),
        value
    ));
}

pub fn section(title: &str) {
    let out = Term::stdout();
    say(String::new());
    say(format!("━{}━", paint(&out, title, Style::new().cyan().bold())));
}

/// A rendered table, unless quiet
pub fn print_table(rendered: &str) {
    if !rendered.is_empty() {
        say(rendered.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_when_colour_disabled() {
        let style = Style::new().yellow().bold();
        assert_eq!(styled(false, "msgcat.txt is not found", style), "msgcat.txt is not found");
    }

    #[test]
    fn test_ansi_when_colour_enabled() {
        let painted = styled(true, "caos.db", Style::new().cyan().bold());
        assert!(painted.contains("caos.db"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
