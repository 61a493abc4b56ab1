mod sqlite;

pub use sqlite::{
    DailyStats, ExportFormat, HISTORY_LIMIT, HistoryEntry, HistoryStore, ModelStats, Statistics,
};
