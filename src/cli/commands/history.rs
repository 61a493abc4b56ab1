//! History and statistics command handlers.

use anyhow::Result;
use std::path::Path;

use crate::history::{ExportFormat, HistoryStore};
use crate::status;
use crate::ui::Style;

/// Longest source/translation excerpt shown per history line.
const PREVIEW_CHARS: usize = 60;

pub fn print_history(limit: usize) -> Result<()> {
    let store = HistoryStore::open()?;
    let entries = store.recent(limit)?;

    if entries.is_empty() {
        println!("No translations recorded yet.");
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {} {} → {}  {}",
            Style::secondary(&entry.created_at),
            Style::value(&entry.model_id),
            Style::code(&entry.source_lang),
            Style::code(&entry.target_lang),
            Style::cost(entry.cost)
        );
        println!("  {}", preview(&entry.original_text));
        println!("  {}", Style::secondary(preview(&entry.translated_text)));
    }

    Ok(())
}

pub fn clear_history() -> Result<()> {
    let removed = HistoryStore::open()?.clear()?;
    status!(
        "{} Removed {removed} history entries",
        Style::success("✓")
    );
    Ok(())
}

pub fn export_history(format: ExportFormat, output: &str) -> Result<()> {
    let written = HistoryStore::open()?.export(format, Path::new(output))?;
    status!(
        "{} Exported {written} history entries to {}",
        Style::success("✓"),
        Style::secondary(output)
    );
    Ok(())
}

pub fn print_statistics() -> Result<()> {
    let stats = HistoryStore::open()?.statistics()?;

    println!("{}", Style::header("Totals"));
    println!("  {}  {}", Style::label("translations"), stats.total_translations);
    println!("  {}        {}", Style::label("tokens"), stats.total_tokens);
    println!("  {}          {}", Style::label("cost"), Style::cost(stats.total_cost));

    if !stats.by_model.is_empty() {
        println!("\n{}", Style::header("By model"));
        for model in &stats.by_model {
            println!(
                "  {:24} {:>6} {:>10}  {}",
                Style::value(&model.model_id),
                model.translations,
                model.tokens,
                Style::cost(model.cost)
            );
        }
    }

    if !stats.by_day.is_empty() {
        println!("\n{}", Style::header("Recent days"));
        for day in &stats.by_day {
            println!(
                "  {}  {:>6} {:>10}  {}",
                day.day,
                day.translations,
                day.tokens,
                Style::cost(day.cost)
            );
        }
    }

    Ok(())
}

/// First line of `text`, cut to `PREVIEW_CHARS` characters.
fn preview(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or_default();
    let mut out: String = first_line.chars().take(PREVIEW_CHARS).collect();
    if first_line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        out.push('…');
    }
    out
}
