use breakroll_core::{Catalog, DrawRecord, ItemEntry, LayoutPlacer, Placement, ReconciledState};
use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use std::collections::HashMap;
use std::io::{self, Write};

use crate::color::channels;

const CELL_WIDTH: usize = 12;
const PRIMARY_KEY: &str = "--primary";
const ACCENT_KEY: &str = "--accent";

fn fit(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

fn centered(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:^width$}")
}

fn themed(text: String, state: &ReconciledState, key: &str) -> ColoredString {
    match state.settings.colors.get(key) {
        Some(hex) => {
            let (r, g, b) = channels(hex);
            text.truecolor(r, g, b)
        }
        None => text.normal(),
    }
}

fn cell_text(entry: &ItemEntry, state: &ReconciledState) -> ColoredString {
    if entry.is_taken() {
        let label = format!("{} {}", entry.item.short_label, entry.status.taken_by);
        fit(&label, CELL_WIDTH - 1).dimmed().strikethrough()
    } else {
        themed(fit(&entry.item.short_label, CELL_WIDTH - 1), state, PRIMARY_KEY).bold()
    }
}

fn banner_lines(state: &ReconciledState) -> [String; 2] {
    let title = if state.settings.label.is_empty() {
        String::from("BREAKROLL")
    } else {
        state.settings.label.to_uppercase()
    };
    let remaining = format!("{}/{} left", state.available_count(), state.items.len());
    [title, remaining]
}

/// Draw the board: items in their placed cells, the banner across its block.
pub fn write_grid<W: Write>(
    out: &mut W,
    state: &ReconciledState,
    placer: &LayoutPlacer,
    placements: &[Placement<'_, ItemEntry>],
) -> io::Result<()> {
    let by_index: HashMap<usize, &ItemEntry> =
        placements.iter().map(|p| (p.cell.index, p.item)).collect();
    let banner = placer.banner();
    let banner_width = banner.column_span * CELL_WIDTH;
    let lines = banner_lines(state);

    for row in 1..=placer.rows() {
        let mut column = 1;
        while column <= placer.columns() {
            let in_banner_rows =
                row >= banner.row_start && row < banner.row_start + banner.row_span;
            if in_banner_rows && column == banner.column_start {
                let text = lines
                    .get(row - banner.row_start)
                    .map_or_else(String::new, |line| centered(line, banner_width - 1));
                write!(out, "{} ", themed(text, state, ACCENT_KEY).bold())?;
                column += banner.column_span;
                continue;
            }
            let index = (row - 1) * placer.columns() + (column - 1);
            match by_index.get(&index) {
                Some(entry) => write!(out, "{} ", cell_text(entry, state))?,
                None => write!(out, "{} ", fit("", CELL_WIDTH - 1))?,
            }
            column += 1;
        }
        writeln!(out)?;
    }

    let hidden = state.items.len().saturating_sub(placements.len());
    if hidden > 0 {
        writeln!(out, "{}", format!("({hidden} item(s) do not fit the board)").yellow())?;
    }
    Ok(())
}

/// `HH:MM` in local time.
#[must_use]
pub fn format_time(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms).map_or_else(
        || String::from("--:--"),
        |utc| utc.with_timezone(&Local).format("%H:%M").to_string(),
    )
}

pub fn write_history<W: Write>(out: &mut W, history: &[DrawRecord]) -> io::Result<()> {
    if history.is_empty() {
        writeln!(out, "No draws yet.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{}",
        format!("{:>3}  {:<20} {:<26} {}", "#", "Participant", "Item", "Time").bold()
    )?;
    for (idx, record) in history.iter().enumerate() {
        writeln!(
            out,
            "{:>3}  {:<20} {:<26} {}",
            idx + 1,
            fit(&record.participant, 20),
            fit(&record.item_display_name, 26),
            format_time(record.timestamp_ms)
        )?;
    }
    Ok(())
}

pub fn write_catalog<W: Write>(
    out: &mut W,
    catalog: &Catalog,
    state: &ReconciledState,
) -> io::Result<()> {
    for item in catalog.items() {
        let owner = state
            .entry(&item.id)
            .filter(|entry| entry.is_taken())
            .map(|entry| entry.status.taken_by.as_str());
        let status = match owner {
            Some(name) => format!("taken by {name}").red(),
            None => "available".green(),
        };
        writeln!(
            out,
            "{:<6} {:<5} {:<26} {}",
            item.id,
            item.short_label,
            fit(&item.display_name, 26),
            status
        )?;
    }
    Ok(())
}
