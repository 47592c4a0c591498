//! Cache generation lifecycle.
//!
//! A generation is a named store of entries. Exactly one is current per
//! deployment; every other generation is garbage awaiting deletion.

use super::connection::CacheDb;
use super::entries::{CacheEntry, upsert_entry};
use crate::Error;
use tokio_rusqlite::params;

/// Handle to one named cache generation.
#[derive(Clone, Debug)]
pub struct Generation {
    db: CacheDb,
    name: String,
}

impl Generation {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store an entry, replacing any previous entry for the same key.
    pub async fn put(&self, entry: &CacheEntry) -> Result<(), Error> {
        self.db.put_entry(&self.name, entry).await
    }

    pub async fn get(&self, key: &str) -> Result<Option<CacheEntry>, Error> {
        self.db.get_entry(&self.name, key).await
    }

    pub async fn urls(&self) -> Result<Vec<String>, Error> {
        self.db.entry_urls(&self.name).await
    }

    pub async fn len(&self) -> Result<u64, Error> {
        self.db.count_entries(&self.name).await
    }

    pub async fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len().await? == 0)
    }
}

impl CacheDb {
    /// Open (or create) the named generation.
    pub async fn open_generation(&self, name: &str) -> Result<Generation, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![owned, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(self.generation(name))
    }

    /// Handle to a generation without creating it.
    ///
    /// Reads through the handle see an empty store until something is written.
    pub fn generation(&self, name: &str) -> Generation {
        Generation { db: self.clone(), name: name.to_string() }
    }

    /// Names of all existing generations, oldest first.
    pub async fn generation_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM generations ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn has_generation(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM generations WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a generation and all of its entries.
    ///
    /// Returns whether the generation existed.
    pub async fn delete_generation(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM generations WHERE name = ?1", params![name])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Create a generation and write every entry in a single transaction.
    ///
    /// Either all entries become visible or none do; a failure leaves the
    /// store exactly as it was.
    pub async fn install_generation(&self, name: &str, entries: Vec<CacheEntry>) -> Result<Generation, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
                    params![&owned, chrono::Utc::now().to_rfc3339()],
                )?;
                for entry in &entries {
                    upsert_entry(&tx, &owned, entry)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(self.generation(name))
    }
}
