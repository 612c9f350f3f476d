//! Text output for the `list` and `chains` subcommands

use std::fmt::Write;

use anstyle::{AnsiColor, Reset, Style};

use crate::application::Application;

const NAME_COLOR: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Green)));
const HEADER_STYLE: Style = Style::new().bold();
const DIM_STYLE: Style = Style::new().dimmed();

fn paint(style: Style, text: &str, color: bool) -> String {
    if color {
        format!("{style}{text}{Reset}")
    } else {
        text.to_string()
    }
}

/// Display name for an id, falling back to the raw id for unknown commands
fn label<'a>(app: &'a Application, id: &'a str) -> &'a str {
    app.display_name(id).unwrap_or(id)
}

/// All commands sorted by name, with descriptions and chain membership.
#[must_use]
pub fn render_list(app: &Application, color: bool) -> String {
    let commands = app.commands();
    let mut rows: Vec<(&str, Option<&str>, Option<&str>)> = commands
        .ids()
        .filter_map(|id| {
            let runnable = commands.get(id)?;
            let parent = app
                .registry()
                .parent_of(id)
                .map(|parent| label(app, parent));
            Some((runnable.name(), runnable.description(), parent))
        })
        .collect();
    rows.sort_by_key(|(name, _, _)| *name);

    let width = rows.iter().map(|(name, _, _)| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "{}", paint(HEADER_STYLE, "Available commands:", color));
    for (name, description, parent) in rows {
        let mut line = format!("  {}", paint(NAME_COLOR, &format!("{name:<width$}"), color));
        if let Some(description) = description {
            line.push_str("  ");
            line.push_str(description);
        }
        if let Some(parent) = parent {
            line.push_str("  ");
            line.push_str(&paint(DIM_STYLE, &format!("(member of {parent})"), color));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

/// Every chain parent in declaration order, followed by its numbered members.
#[must_use]
pub fn render_chains(app: &Application, color: bool) -> String {
    let mut out = String::new();
    if app.parents().is_empty() {
        let _ = writeln!(out, "{}", paint(DIM_STYLE, "No command chains configured.", color));
        return out;
    }

    for parent in app.parents() {
        let header = match app.display_name(parent) {
            Some(name) => paint(HEADER_STYLE, name, color),
            None => format!(
                "{} {}",
                paint(HEADER_STYLE, parent, color),
                paint(DIM_STYLE, "(unknown command)", color)
            ),
        };
        let _ = writeln!(out, "{header}");
        for (index, member) in app.registry().members_of(parent).iter().enumerate() {
            let name = paint(NAME_COLOR, label(app, member), color);
            let _ = writeln!(out, "  {}. {name}", index + 1);
        }
    }
    out
}
