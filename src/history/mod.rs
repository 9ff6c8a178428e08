use crate::{errors::EngineError, models::HistoryEntry};
use rusqlite::{params, Connection};
use std::sync::Mutex;

/// Most-recent entries retained; anything older is dropped on append.
pub const CAPACITY: usize = 10;

/// Persisted log of completed downloads. Write-once-per-entry, truncate-only:
/// no update or delete surface beyond the capacity enforcement.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl HistoryStore {
    pub fn new(path: &str) -> Result<Self, EngineError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS download_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                thumbnail TEXT NOT NULL,
                downloaded_at TEXT NOT NULL,
                format TEXT
            );
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Prepend `entry`, drop rows beyond the capacity, and return the
    /// post-append sequence, newest first.
    pub fn append(&self, entry: &HistoryEntry) -> Result<Vec<HistoryEntry>, EngineError> {
        {
            let conn = self.conn.lock().expect("history mutex poisoned");
            conn.execute(
                "
                INSERT INTO download_history (title, thumbnail, downloaded_at, format)
                VALUES (?1, ?2, ?3, ?4)
                ",
                params![entry.title, entry.thumbnail, entry.downloaded_at, entry.format],
            )?;
            conn.execute(
                "
                DELETE FROM download_history
                WHERE id NOT IN (SELECT id FROM download_history ORDER BY id DESC LIMIT ?1)
                ",
                params![CAPACITY as i64],
            )?;
        }
        self.recent()
    }

    /// The retained entries, newest first.
    pub fn recent(&self) -> Result<Vec<HistoryEntry>, EngineError> {
        let conn = self.conn.lock().expect("history mutex poisoned");
        let mut stmt = conn.prepare(
            "
            SELECT title, thumbnail, downloaded_at, format
            FROM download_history ORDER BY id DESC LIMIT ?1
            ",
        )?;

        let rows = stmt.query_map(params![CAPACITY as i64], |row| {
            Ok(HistoryEntry {
                title: row.get(0)?,
                thumbnail: row.get(1)?,
                downloaded_at: row.get(2)?,
                format: row.get(3)?,
            })
        })?;

        Ok(rows.filter_map(Result::ok).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            title: format!("video {n}"),
            thumbnail: format!("https://img.example/{n}.jpg"),
            downloaded_at: format!("2026-08-30T00:00:{n:02}+00:00"),
            format: Some("720p".into()),
        }
    }

    #[test]
    fn caps_at_ten_newest_first() {
        let store = HistoryStore::new(":memory:").expect("store");
        for n in 0..11 {
            store.append(&entry(n)).expect("append");
        }

        let entries = store.recent().expect("recent");
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].title, "video 10");
        assert_eq!(entries[9].title, "video 1");
        assert!(!entries.iter().any(|e| e.title == "video 0"));
    }

    #[test]
    fn append_returns_post_append_view() {
        let store = HistoryStore::new(":memory:").expect("store");
        let after = store
            .append(&HistoryEntry {
                format: None,
                ..entry(0)
            })
            .expect("append");

        assert_eq!(after.len(), 1);
        assert_eq!(after[0].title, "video 0");
        assert!(after[0].format.is_none());
    }
}
