//! Cache entry CRUD operations.
//!
//! Entries live inside a generation and are keyed by request identity.
//! Writes are upserts: a later successful fetch replaces the earlier one.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite::{self, Row, Transaction};
use tokio_rusqlite::params;

/// A stored response together with the request it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheEntry {
    /// Request identity (see [`compute_request_key`](super::hash::compute_request_key)).
    pub key: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    /// Header names with their raw values, in response order; repeated names are kept.
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl CacheEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<(CacheEntry, String)> {
        let headers_json: String = row.get(5)?;
        let entry = CacheEntry {
            key: row.get(0)?,
            method: row.get(1)?,
            url: row.get(2)?,
            status: row.get(3)?,
            status_text: row.get(4)?,
            headers: Vec::new(),
            body: row.get(6)?,
            stored_at: row.get(7)?,
        };
        Ok((entry, headers_json))
    }

    fn decode(row: (CacheEntry, String)) -> Result<CacheEntry, Error> {
        let (mut entry, headers_json) = row;
        entry.headers = serde_json::from_str(&headers_json)?;
        Ok(entry)
    }
}

/// Write one entry inside an open transaction, creating the generation row if needed.
pub(crate) fn upsert_entry(tx: &Transaction<'_>, generation: &str, entry: &CacheEntry) -> Result<(), Error> {
    if !entry.method.eq_ignore_ascii_case("GET") {
        return Err(Error::Rejected(format!("{} requests are not cacheable", entry.method)));
    }

    let headers_json = serde_json::to_string(&entry.headers)?;

    tx.execute(
        "INSERT OR IGNORE INTO generations (name, created_at) VALUES (?1, ?2)",
        params![generation, chrono::Utc::now().to_rfc3339()],
    )?;
    tx.execute(
        "INSERT INTO entries (generation, key, method, url, status, status_text, headers_json, body, stored_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
         ON CONFLICT(generation, key) DO UPDATE SET
            method = excluded.method,
            url = excluded.url,
            status = excluded.status,
            status_text = excluded.status_text,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![
            generation,
            &entry.key,
            &entry.method,
            &entry.url,
            entry.status,
            &entry.status_text,
            headers_json,
            &entry.body,
            &entry.stored_at,
        ],
    )?;
    Ok(())
}

impl CacheDb {
    /// Insert or replace an entry in the named generation.
    ///
    /// The generation is created if it does not exist yet.
    pub async fn put_entry(&self, generation: &str, entry: &CacheEntry) -> Result<(), Error> {
        let generation = generation.to_string();
        let entry = entry.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                upsert_entry(&tx, &generation, &entry)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get an entry by request identity.
    ///
    /// Returns None if the generation or the key doesn't exist.
    pub async fn get_entry(&self, generation: &str, key: &str) -> Result<Option<CacheEntry>, Error> {
        let generation = generation.to_string();
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CacheEntry>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT key, method, url, status, status_text, headers_json, body, stored_at
                     FROM entries WHERE generation = ?1 AND key = ?2",
                )?;

                match stmt.query_row(params![generation, key], CacheEntry::from_row) {
                    Ok(row) => CacheEntry::decode(row).map(Some),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List the URLs stored in a generation, oldest first.
    pub async fn entry_urls(&self, generation: &str) -> Result<Vec<String>, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT url FROM entries WHERE generation = ?1 ORDER BY stored_at, key")?;
                let urls = stmt
                    .query_map(params![generation], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(urls)
            })
            .await
            .map_err(Error::from)
    }

    /// Count the entries in a generation.
    pub async fn count_entries(&self, generation: &str) -> Result<u64, Error> {
        let generation = generation.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE generation = ?1", params![generation], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
