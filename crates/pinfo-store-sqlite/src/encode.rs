//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, UUIDs as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use pinfo_core::person::{PersonInfo, PrimaryRecord};
use uuid::Uuid;

use crate::{Error, Result};

/// Column list shared by every `SELECT`, in [`RawRow`] field order.
pub const COLUMNS: &str = "id, correlation_id, first_name, last_name, email, \
                           date_of_birth, state, city, country, image, \
                           created_at, updated_at";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for an `INSERT` or `UPDATE`, already encoded.
pub struct EncodedInfo {
  pub correlation_id: Option<String>,
  pub first_name:     String,
  pub last_name:      String,
  pub email:          String,
  pub date_of_birth:  String,
  pub state:          String,
  pub city:           String,
  pub country:        String,
  pub image:          Option<String>,
}

impl EncodedInfo {
  pub fn new(info: &PersonInfo) -> Self {
    Self {
      correlation_id: info.correlation_id.map(encode_uuid),
      first_name:     info.first_name.clone(),
      last_name:      info.last_name.clone(),
      email:          info.email.clone(),
      date_of_birth:  encode_date(info.date_of_birth),
      state:          info.state.clone(),
      city:           info.city.clone(),
      country:        info.country.clone(),
      image:          info.image.clone(),
    }
  }
}

/// Raw values read directly from a `personal_informations` row.
pub struct RawRow {
  pub id:             i64,
  pub correlation_id: Option<String>,
  pub first_name:     String,
  pub last_name:      String,
  pub email:          String,
  pub date_of_birth:  String,
  pub state:          String,
  pub city:           String,
  pub country:        String,
  pub image:          Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawRow {
  /// Read a row selected with [`COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      correlation_id: row.get(1)?,
      first_name:     row.get(2)?,
      last_name:      row.get(3)?,
      email:          row.get(4)?,
      date_of_birth:  row.get(5)?,
      state:          row.get(6)?,
      city:           row.get(7)?,
      country:        row.get(8)?,
      image:          row.get(9)?,
      created_at:     row.get(10)?,
      updated_at:     row.get(11)?,
    })
  }

  pub fn into_record(self) -> Result<PrimaryRecord> {
    let correlation_id = self
      .correlation_id
      .as_deref()
      .map(decode_uuid)
      .transpose()?;

    Ok(PrimaryRecord {
      id:         self.id,
      info:       PersonInfo {
        first_name: self.first_name,
        last_name: self.last_name,
        email: self.email,
        date_of_birth: decode_date(&self.date_of_birth)?,
        state: self.state,
        city: self.city,
        country: self.country,
        image: self.image,
        correlation_id,
      },
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
