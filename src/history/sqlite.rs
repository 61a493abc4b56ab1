use anyhow::{Context, Result};
use rusqlite::{Connection, Row, params};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::paths;
use crate::translation::TranslationResult;

/// Rows kept in the history table; older ones are pruned on insert.
pub const HISTORY_LIMIT: usize = 1000;

/// Days shown in the per-day statistics.
const DAILY_WINDOW: usize = 30;

/// File formats for `HistoryStore::export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed array of entries.
    Json,
    /// Header row plus one quoted row per entry.
    Csv,
    /// One readable block per entry.
    Txt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    /// UTC timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub created_at: String,
    pub source_lang: String,
    pub target_lang: String,
    pub original_text: String,
    pub translated_text: String,
    pub model_id: String,
    pub total_tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub model_id: String,
    pub translations: u64,
    pub tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    /// UTC date, `YYYY-MM-DD`.
    pub day: String,
    pub translations: u64,
    pub tokens: u64,
    pub cost: f64,
}

/// Usage totals. Survive both history pruning and `clear`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub total_translations: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub by_model: Vec<ModelStats>,
    /// Most recent days first.
    pub by_day: Vec<DailyStats>,
}

/// Translation history and usage statistics in `SQLite`.
pub struct HistoryStore {
    db_path: PathBuf,
}

impl HistoryStore {
    /// Opens the store at `$XDG_DATA_HOME/clip-tl/history.db`.
    pub fn open() -> Result<Self> {
        let data_dir = paths::data_dir()?;

        std::fs::create_dir_all(&data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;

        Self::open_at(data_dir.join("history.db"))
    }

    pub fn open_at(db_path: PathBuf) -> Result<Self> {
        let store = Self { db_path };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connect()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                source_lang TEXT NOT NULL,
                target_lang TEXT NOT NULL,
                original_text TEXT NOT NULL,
                translated_text TEXT NOT NULL,
                model TEXT NOT NULL,
                total_tokens INTEGER NOT NULL DEFAULT 0,
                cost REAL NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS daily_stats (
                day TEXT NOT NULL,
                model TEXT NOT NULL,
                translations INTEGER NOT NULL DEFAULT 0,
                tokens INTEGER NOT NULL DEFAULT 0,
                cost REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (day, model)
            );",
        )
        .context("Failed to create history tables")?;

        Ok(())
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).with_context(|| {
            format!(
                "Failed to open history database: {}",
                self.db_path.display()
            )
        })
    }

    /// Stores a finished translation and adds it to today's statistics.
    pub fn record(&self, result: &TranslationResult, cost: f64) -> Result<()> {
        let tokens = to_sql_int(result.usage.as_ref().map_or(0, |u| u.total_tokens));
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO history
             (source_lang, target_lang, original_text, translated_text, model, total_tokens, cost)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                result.source_lang,
                result.target_lang,
                result.original_text,
                result.translated_text,
                result.model_id,
                tokens,
                cost,
            ],
        )
        .context("Failed to insert history entry")?;

        tx.execute(
            "INSERT INTO daily_stats (day, model, translations, tokens, cost)
             VALUES (date('now'), ?1, 1, ?2, ?3)
             ON CONFLICT(day, model) DO UPDATE SET
                translations = translations + 1,
                tokens = tokens + excluded.tokens,
                cost = cost + excluded.cost",
            params![result.model_id, tokens, cost],
        )
        .context("Failed to update statistics")?;

        tx.execute(
            "DELETE FROM history WHERE id NOT IN
             (SELECT id FROM history ORDER BY id DESC LIMIT ?1)",
            params![to_sql_int(HISTORY_LIMIT as u64)],
        )
        .context("Failed to prune history")?;

        tx.commit()?;
        Ok(())
    }

    /// Newest entries first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, created_at, source_lang, target_lang, original_text,
                    translated_text, model, total_tokens, cost
             FROM history ORDER BY id DESC LIMIT ?1",
        )?;

        let entries = stmt
            .query_map(params![to_sql_int(limit as u64)], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read history")?;

        Ok(entries)
    }

    /// Writes every entry, oldest first, to `path`. Returns the entry count.
    pub fn export(&self, format: ExportFormat, path: &Path) -> Result<usize> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, created_at, source_lang, target_lang, original_text,
                    translated_text, model, total_tokens, cost
             FROM history ORDER BY id",
        )?;
        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read history")?;

        let contents = match format {
            ExportFormat::Json => serde_json::to_string_pretty(&entries)?,
            ExportFormat::Csv => render_csv(&entries),
            ExportFormat::Txt => render_txt(&entries),
        };

        crate::fs::atomic_write(path, &contents)
            .with_context(|| format!("Failed to write export: {}", path.display()))?;

        Ok(entries.len())
    }

    pub fn statistics(&self) -> Result<Statistics> {
        let conn = self.connect()?;

        let mut stmt = conn.prepare(
            "SELECT model, SUM(translations), SUM(tokens), SUM(cost)
             FROM daily_stats GROUP BY model ORDER BY SUM(translations) DESC, model",
        )?;
        let by_model = stmt
            .query_map([], |row| {
                Ok(ModelStats {
                    model_id: row.get(0)?,
                    translations: from_sql_int(row.get(1)?),
                    tokens: from_sql_int(row.get(2)?),
                    cost: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read model statistics")?;

        let mut stmt = conn.prepare(
            "SELECT day, SUM(translations), SUM(tokens), SUM(cost)
             FROM daily_stats GROUP BY day ORDER BY day DESC LIMIT ?1",
        )?;
        let by_day = stmt
            .query_map(params![to_sql_int(DAILY_WINDOW as u64)], |row| {
                Ok(DailyStats {
                    day: row.get(0)?,
                    translations: from_sql_int(row.get(1)?),
                    tokens: from_sql_int(row.get(2)?),
                    cost: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read daily statistics")?;

        Ok(Statistics {
            total_translations: by_model.iter().map(|m| m.translations).sum(),
            total_tokens: by_model.iter().map(|m| m.tokens).sum(),
            total_cost: by_model.iter().map(|m| m.cost).sum(),
            by_model,
            by_day,
        })
    }

    /// Deletes all history entries. Statistics are kept.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.connect()?;
        let removed = conn
            .execute("DELETE FROM history", [])
            .context("Failed to clear history")?;
        Ok(removed)
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    Ok(HistoryEntry {
        id: row.get(0)?,
        created_at: row.get(1)?,
        source_lang: row.get(2)?,
        target_lang: row.get(3)?,
        original_text: row.get(4)?,
        translated_text: row.get(5)?,
        model_id: row.get(6)?,
        total_tokens: from_sql_int(row.get(7)?),
        cost: row.get(8)?,
    })
}

/// Quotes every field and doubles embedded quotes.
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render_csv(entries: &[HistoryEntry]) -> String {
    let mut out = String::from(
        "Timestamp,Source Language,Target Language,Original Text,Translated Text,Model,Tokens,Cost\n",
    );
    for entry in entries {
        let fields = [
            csv_field(&entry.created_at),
            csv_field(&entry.source_lang),
            csv_field(&entry.target_lang),
            csv_field(&entry.original_text),
            csv_field(&entry.translated_text),
            csv_field(&entry.model_id),
            csv_field(&entry.total_tokens.to_string()),
            csv_field(&format!("{:.6}", entry.cost)),
        ];
        let _ = writeln!(out, "{}", fields.join(","));
    }
    out
}

fn render_txt(entries: &[HistoryEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "=== {} ===", entry.created_at);
        let _ = writeln!(out, "Model: {}", entry.model_id);
        let _ = writeln!(out, "Languages: {} → {}", entry.source_lang, entry.target_lang);
        let _ = writeln!(out, "Original: {}", entry.original_text);
        let _ = writeln!(out, "Translation: {}", entry.translated_text);
        let _ = writeln!(out, "Cost: ${:.6}\n", entry.cost);
    }
    out
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql_int(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
