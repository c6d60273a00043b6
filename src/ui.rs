//! Terminal output for envy.
//!
//! stdout carries results: the script file path from `load`/`unload` (which
//! the calling shell sources), profile names, `inspect` tables and the
//! `doctor` report. Warnings and `--verbose` traces go to stderr so they never
//! end up in `source "$(envy load work)"`.

use anstream::{eprintln, println};
use anstyle::{AnsiColor, Style};
use clap::ValueEnum;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};

use crate::pathvar::EnvSnapshot;

pub const BOLD: Style = Style::new().bold();
pub const DIM: Style = fg(AnsiColor::BrightBlack);
pub const ALERT: Style = fg(AnsiColor::Red).bold();
const WARN_LABEL: Style = fg(AnsiColor::Yellow).bold();

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}

/// `--color` values
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Always,
    #[default]
    Auto,
    Never,
}

/// Decide whether to colour output.
///
/// `--no-color`, any `NO_COLOR` value and `TERM=dumb` override `mode`.
/// `Auto` colours only when stdout is a terminal.
pub fn use_color(mode: ColorMode, no_color_flag: bool, env: &EnvSnapshot, stdout_tty: bool) -> bool {
    if no_color_flag || env.get("NO_COLOR").is_some() || env.get("TERM") == Some("dumb") {
        return false;
    }
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stdout_tty,
    }
}

/// Status marks in the `doctor` report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Pass,
    Warn,
    Fail,
    Note,
}

impl Mark {
    fn glyph(self, color: bool) -> (&'static str, Style) {
        match (self, color) {
            (Mark::Pass, true) => ("✓", fg(AnsiColor::Green)),
            (Mark::Warn, true) => ("⚠", fg(AnsiColor::Yellow)),
            (Mark::Fail, true) => ("✗", fg(AnsiColor::Red)),
            (Mark::Note, true) => ("•", DIM),
            (Mark::Pass, false) => ("[OK]", Style::new()),
            (Mark::Warn, false) => ("[!]", Style::new()),
            (Mark::Fail, false) => ("[X]", Style::new()),
            (Mark::Note, false) => ("-", Style::new()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ui {
    pub color: bool,
    pub verbose: bool,
}

impl Ui {
    pub fn new(mode: ColorMode, no_color_flag: bool, verbose: bool, env: &EnvSnapshot) -> Self {
        use std::io::IsTerminal;

        let color = use_color(mode, no_color_flag, env, std::io::stdout().is_terminal());
        if !color {
            anstream::ColorChoice::write_global(anstream::ColorChoice::Never);
        }
        Self { color, verbose }
    }

    /// Uncoloured output, for tests
    #[cfg(test)]
    pub fn plain(verbose: bool) -> Self {
        Self {
            color: false,
            verbose,
        }
    }

    pub fn paint(&self, text: impl AsRef<str>, style: Style) -> String {
        if self.color {
            format!("{style}{}{style:#}", text.as_ref())
        } else {
            text.as_ref().to_string()
        }
    }

    pub fn mark(&self, mark: Mark) -> String {
        let (glyph, style) = mark.glyph(self.color);
        self.paint(glyph, style)
    }

    // stdout

    pub fn out(&self, line: impl AsRef<str>) {
        println!("{}", line.as_ref());
    }

    pub fn blank(&self) {
        println!();
    }

    pub fn heading(&self, title: impl AsRef<str>) {
        println!("{}", self.paint(title, BOLD));
    }

    // stderr

    pub fn warn_line(&self, msg: impl AsRef<str>) -> String {
        format!("{} {}", self.paint("WARN", WARN_LABEL), msg.as_ref())
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        eprintln!("{}", self.warn_line(msg));
    }

    /// The line `verbose` would print, or `None` without `--verbose`
    pub fn verbose_line(&self, msg: impl AsRef<str>) -> Option<String> {
        self.verbose.then(|| self.paint(msg, DIM))
    }

    pub fn verbose(&self, msg: impl AsRef<str>) {
        if let Some(line) = self.verbose_line(msg) {
            eprintln!("{line}");
        }
    }

    // tables

    /// A bordered table with a header row
    pub fn table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.load_preset(if self.color {
            presets::UTF8_FULL_CONDENSED
        } else {
            presets::ASCII_MARKDOWN
        });
        table.set_header(headers.iter().map(|h| {
            let cell = Cell::new(h);
            if self.color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        }));
        table
    }

    /// Cell for a name column (variable, function, alias)
    pub fn key_cell(&self, text: impl ToString) -> Cell {
        self.tinted(Cell::new(text), Color::Cyan)
    }

    /// Cell for a placeholder such as an unset hook
    pub fn faint_cell(&self, text: impl ToString) -> Cell {
        self.tinted(Cell::new(text), Color::DarkGrey)
    }

    fn tinted(&self, cell: Cell, color: Color) -> Cell {
        if self.color { cell.fg(color) } else { cell }
    }
}
