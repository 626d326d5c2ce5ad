//! [`SqliteStore`] — the SQLite implementation of [`PrimaryStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use pinfo_core::{
  person::{PersonInfo, PrimaryRecord, SortDirection},
  store::PrimaryStore,
};

use crate::{
  encode::{COLUMNS, EncodedInfo, RawRow, encode_dt},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// The primary store, backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a throwaway in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn select_one(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawRow>> {
  conn
    .query_row(
      &format!("SELECT {COLUMNS} FROM personal_informations WHERE id = ?1"),
      rusqlite::params![id],
      RawRow::from_row,
    )
    .optional()
}

// ─── PrimaryStore impl ───────────────────────────────────────────────────────

impl PrimaryStore for SqliteStore {
  type Error = Error;

  async fn insert(&self, info: &PersonInfo) -> Result<PrimaryRecord> {
    let enc = EncodedInfo::new(info);
    let now = encode_dt(Utc::now());

    let (id, raw) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO personal_informations (
             correlation_id, first_name, last_name, email, date_of_birth,
             state, city, country, image, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
          rusqlite::params![
            enc.correlation_id,
            enc.first_name,
            enc.last_name,
            enc.email,
            enc.date_of_birth,
            enc.state,
            enc.city,
            enc.country,
            enc.image,
            now,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok((id, select_one(conn, id)?))
      })
      .await?;

    raw.ok_or(Error::NotFound(id))?.into_record()
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<PrimaryRecord>> {
    let raw = self
      .conn
      .call(move |conn| Ok(select_one(conn, id)?))
      .await?;

    raw.map(RawRow::into_record).transpose()
  }

  async fn list(&self, direction: SortDirection) -> Result<Vec<PrimaryRecord>> {
    let dir = direction.as_sql();
    let sql = format!(
      "SELECT {COLUMNS} FROM personal_informations
       ORDER BY first_name {dir}, last_name {dir}, id ASC"
    );

    let raws: Vec<RawRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRow::into_record).collect()
  }

  async fn update(&self, id: i64, info: &PersonInfo) -> Result<PrimaryRecord> {
    let enc = EncodedInfo::new(info);
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE personal_informations SET
             correlation_id = ?1, first_name = ?2, last_name = ?3, email = ?4,
             date_of_birth = ?5, state = ?6, city = ?7, country = ?8,
             image = ?9, updated_at = ?10
           WHERE id = ?11",
          rusqlite::params![
            enc.correlation_id,
            enc.first_name,
            enc.last_name,
            enc.email,
            enc.date_of_birth,
            enc.state,
            enc.city,
            enc.country,
            enc.image,
            now,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_one(conn, id)?)
      })
      .await?;

    raw.ok_or(Error::NotFound(id))?.into_record()
  }

  async fn delete(&self, id: i64) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM personal_informations WHERE id = ?1",
          rusqlite::params![id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id));
    }
    Ok(())
  }
}
