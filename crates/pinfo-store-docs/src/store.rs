//! [`DocumentStore`] — the SQLite-backed implementation of [`SecondaryStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pinfo_core::{
  correlate::Correlation,
  person::{PersonInfo, SecondaryRecord, SortDirection},
  store::SecondaryStore,
};

use crate::{Error, Result, schema::SCHEMA};

/// Collection holding mirrored person records.
pub const PERSONAL_INFORMATIONS: &str = "personal_informations";

// ─── Document body ───────────────────────────────────────────────────────────

/// The JSON object stored in `documents.body`. The id lives in its own
/// column.
#[derive(Serialize, Deserialize)]
struct Body {
  #[serde(flatten)]
  info:       PersonInfo,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

/// A live document as read from the table.
struct RawDoc {
  id:   String,
  body: String,
}

impl RawDoc {
  fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:   row.get(0)?,
      body: row.get(1)?,
    })
  }

  fn into_record(self) -> Result<SecondaryRecord> {
    let body: Body = serde_json::from_str(&self.body)?;
    Ok(SecondaryRecord {
      id:         self.id,
      info:       body.info,
      created_at: body.created_at,
      updated_at: body.updated_at,
    })
  }
}

/// Translate a lookup filter into a `WHERE` fragment and its parameters.
/// `?1` is reserved for the collection name.
fn filter_sql(filter: &Correlation) -> (&'static str, Vec<String>) {
  match filter {
    Correlation::Key(key) => (
      "json_extract(body, '$.correlation_id') = ?2",
      vec![key.hyphenated().to_string()],
    ),
    Correlation::Fields {
      first_name,
      last_name,
      email,
    } => (
      "json_extract(body, '$.correlation_id') IS NULL
       AND json_extract(body, '$.first_name') = ?2
       AND json_extract(body, '$.last_name') = ?3
       AND json_extract(body, '$.email') = ?4",
      vec![first_name.clone(), last_name.clone(), email.clone()],
    ),
  }
}

fn select_live(
  conn: &rusqlite::Connection,
  collection: &str,
  id: &str,
) -> rusqlite::Result<Option<RawDoc>> {
  conn
    .query_row(
      "SELECT id, body FROM documents
       WHERE collection = ?1 AND id = ?2 AND deleted_at IS NULL",
      rusqlite::params![collection, id],
      RawDoc::from_row,
    )
    .optional()
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// One collection of a document database kept in its own SQLite file.
///
/// Cloning is cheap; clones share the connection.
#[derive(Clone)]
pub struct DocumentStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  collection:      String,
}

impl DocumentStore {
  /// Open (or create) the database at `path` and bind to `collection`.
  pub async fn open(
    path: impl AsRef<Path>,
    collection: impl Into<String>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, collection.into()).await
  }

  /// Open a throwaway in-memory database.
  pub async fn open_in_memory(collection: impl Into<String>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, collection.into()).await
  }

  async fn init(conn: tokio_rusqlite::Connection, collection: String) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, collection })
  }
}

#[cfg(test)]
impl DocumentStore {
  pub(crate) fn collection(&self) -> &str { &self.collection }

  /// A handle on another collection of the same database.
  pub(crate) fn with_collection(&self, collection: impl Into<String>) -> Self {
    Self {
      conn:       self.conn.clone(),
      collection: collection.into(),
    }
  }

  /// Fetch a live document by id.
  pub(crate) async fn find_by_id(&self, id: &str) -> Result<Option<SecondaryRecord>> {
    let collection = self.collection.clone();
    let id = id.to_owned();
    let raw = self
      .conn
      .call(move |conn| Ok(select_live(conn, &collection, &id)?))
      .await?;

    raw.map(RawDoc::into_record).transpose()
  }
}

// ─── SecondaryStore impl ─────────────────────────────────────────────────────

impl SecondaryStore for DocumentStore {
  type Error = Error;

  async fn insert(&self, info: &PersonInfo) -> Result<SecondaryRecord> {
    let now = Utc::now();
    let record = SecondaryRecord {
      id:         Uuid::new_v4().simple().to_string(),
      info:       info.clone(),
      created_at: now,
      updated_at: now,
    };
    let body = serde_json::to_string(&Body {
      info:       record.info.clone(),
      created_at: now,
      updated_at: now,
    })?;

    let collection = self.collection.clone();
    let id = record.id.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (id, collection, body) VALUES (?1, ?2, ?3)",
          rusqlite::params![id, collection, body],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn find_by_filter(
    &self,
    filter: &Correlation,
  ) -> Result<Option<SecondaryRecord>> {
    let (clause, values) = filter_sql(filter);
    let sql = format!(
      "SELECT id, body FROM documents
       WHERE collection = ?1 AND deleted_at IS NULL AND {clause}
       ORDER BY seq ASC LIMIT 1"
    );
    let collection = self.collection.clone();

    let raw = self
      .conn
      .call(move |conn| {
        let params = std::iter::once(collection).chain(values);
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawDoc::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDoc::into_record).transpose()
  }

  async fn list(&self, direction: SortDirection) -> Result<Vec<SecondaryRecord>> {
    let dir = direction.as_sql();
    let sql = format!(
      "SELECT id, body FROM documents
       WHERE collection = ?1 AND deleted_at IS NULL
       ORDER BY json_extract(body, '$.first_name') {dir},
                json_extract(body, '$.last_name') {dir},
                seq ASC"
    );
    let collection = self.collection.clone();

    let raws: Vec<RawDoc> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![collection], RawDoc::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDoc::into_record).collect()
  }

  async fn update(&self, id: &str, info: &PersonInfo) -> Result<SecondaryRecord> {
    let now = Utc::now();
    // created_at is carried over from the stored body by the UPDATE itself.
    let body = serde_json::to_string(&Body {
      info:       info.clone(),
      created_at: now,
      updated_at: now,
    })?;

    let collection = self.collection.clone();
    let doc_id = id.to_owned();
    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE documents
           SET body = json_set(?1, '$.created_at', json_extract(body, '$.created_at'))
           WHERE collection = ?2 AND id = ?3 AND deleted_at IS NULL",
          rusqlite::params![body, collection, doc_id],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_live(conn, &collection, &doc_id)?)
      })
      .await?;

    raw.ok_or_else(|| Error::NotFound(id.to_owned()))?.into_record()
  }

  async fn delete(&self, id: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    let collection = self.collection.clone();
    let doc_id = id.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET deleted_at = ?1
           WHERE collection = ?2 AND id = ?3 AND deleted_at IS NULL",
          rusqlite::params![now, collection, doc_id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotFound(id.to_owned()));
    }
    Ok(())
  }
}
