use crate::template::Template;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{debug, warn};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS fingerprints (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    template TEXT NOT NULL
)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTemplate {
    pub id: i64,
    pub name: String,
    pub template: Template,
}

/// Enrolled templates kept in a single SQLite table, as hex text.
pub struct TemplateStore {
    conn: Connection,
}

impl TemplateStore {
    pub fn open(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening template store");

        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> crate::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> crate::Result<Self> {
        conn.execute(SCHEMA, [])?;

        Ok(TemplateStore { conn })
    }

    pub fn insert(&self, name: &str, template: &Template) -> crate::Result<i64> {
        self.conn.execute(
            "INSERT INTO fingerprints (name, template) VALUES (?1, ?2)",
            params![name, template.to_text()],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, name, bytes = template.len(), "template stored");

        Ok(id)
    }

    /// Every stored template in insertion order. Rows whose text does not
    /// decode are skipped.
    pub fn load_all(&self) -> crate::Result<Vec<StoredTemplate>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, template FROM fingerprints ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let name: String = row.get(1)?;
                let text: String = row.get(2)?;

                Ok((id, name, text))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let templates = rows
            .into_iter()
            .filter_map(|(id, name, text)| match Template::from_text(&text) {
                Ok(template) => Some(StoredTemplate { id, name, template }),
                Err(error) => {
                    warn!(id, %error, "skipping undecodable template");
                    None
                }
            })
            .collect();

        Ok(templates)
    }

    pub fn count(&self) -> crate::Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM fingerprints", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    /// Enrolled names with their number of templates, alphabetically.
    pub fn names(&self) -> crate::Result<Vec<(String, usize)>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, COUNT(*) FROM fingerprints GROUP BY name ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| {
                let name: String = row.get(0)?;
                let count: i64 = row.get(1)?;

                Ok((name, count as usize))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }

    /// Removes every template stored under `name`, returning how many were removed.
    pub fn delete(&self, name: &str) -> crate::Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM fingerprints WHERE name = ?1", params![name])?;
        debug!(name, removed, "templates removed");

        Ok(removed)
    }
}
