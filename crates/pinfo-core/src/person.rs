//! Person records: the logical value set and its two physical forms.
//!
//! The same [`PersonInfo`] is written to both stores. Each store wraps it with
//! its own identifier and timestamps: [`PrimaryRecord`] carries the integer id
//! that the API exposes, [`SecondaryRecord`] carries the document store's
//! independently generated string id.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Logical record ──────────────────────────────────────────────────────────

/// The field values shared by both representations of one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
  pub first_name:     String,
  pub last_name:      String,
  pub email:          String,
  pub date_of_birth:  NaiveDate,
  pub state:          String,
  pub city:           String,
  pub country:        String,
  /// Blob key of the profile image, relative to the blob root.
  pub image:          Option<String>,
  /// Shared key linking the primary row and the secondary document.
  /// Absent on records written before the key existed.
  pub correlation_id: Option<Uuid>,
}

/// A partial update. `None` leaves the field unchanged.
///
/// The image and the correlation key are managed by the synchronizer and are
/// not part of a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub date_of_birth: Option<NaiveDate>,
  pub state:         Option<String>,
  pub city:          Option<String>,
  pub country:       Option<String>,
}

impl PersonInfo {
  /// Overwrite every field the patch sets.
  pub fn apply(&mut self, patch: PersonPatch) {
    let PersonPatch {
      first_name,
      last_name,
      email,
      date_of_birth,
      state,
      city,
      country,
    } = patch;

    if let Some(v) = first_name {
      self.first_name = v;
    }
    if let Some(v) = last_name {
      self.last_name = v;
    }
    if let Some(v) = email {
      self.email = v;
    }
    if let Some(v) = date_of_birth {
      self.date_of_birth = v;
    }
    if let Some(v) = state {
      self.state = v;
    }
    if let Some(v) = city {
      self.city = v;
    }
    if let Some(v) = country {
      self.country = v;
    }
  }
}

// ─── Physical records ────────────────────────────────────────────────────────

/// A row in the primary (relational) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryRecord {
  /// Store-assigned; the identity exposed by the API.
  pub id:         i64,
  #[serde(flatten)]
  pub info:       PersonInfo,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A document in the secondary (document) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryRecord {
  /// Store-assigned; unrelated to [`PrimaryRecord::id`].
  pub id:         String,
  #[serde(flatten)]
  pub info:       PersonInfo,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Ordering ────────────────────────────────────────────────────────────────

/// Direction for listings ordered by `(first_name, last_name)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  /// The SQL keyword for an `ORDER BY` clause.
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Asc => "ASC",
      Self::Desc => "DESC",
    }
  }
}

impl fmt::Display for SortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Asc => f.write_str("asc"),
      Self::Desc => f.write_str("desc"),
    }
  }
}

/// Returned when a direction string is neither `asc` nor `desc`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort direction: {0:?}")]
pub struct InvalidDirection(pub String);

impl FromStr for SortDirection {
  type Err = InvalidDirection;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "asc" => Ok(Self::Asc),
      "desc" => Ok(Self::Desc),
      _ => Err(InvalidDirection(s.to_owned())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn info() -> PersonInfo {
    PersonInfo {
      first_name:     "Ada".into(),
      last_name:      "Lovelace".into(),
      email:          "ada@example.com".into(),
      date_of_birth:  NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
      state:          "Middlesex".into(),
      city:           "London".into(),
      country:        "UK".into(),
      image:          None,
      correlation_id: None,
    }
  }

  #[test]
  fn apply_only_touches_set_fields() {
    let mut value = info();
    value.apply(PersonPatch {
      city: Some("Marylebone".into()),
      ..PersonPatch::default()
    });
    assert_eq!(value.city, "Marylebone");
    assert_eq!(value.first_name, "Ada");
    assert_eq!(value.country, "UK");
  }

  #[test]
  fn empty_patch_is_a_no_op() {
    let mut value = info();
    value.apply(PersonPatch::default());
    assert_eq!(value, info());
  }

  #[test]
  fn primary_record_serialises_flat() {
    let now = Utc::now();
    let record = PrimaryRecord {
      id:         7,
      info:       info(),
      created_at: now,
      updated_at: now,
    };
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["date_of_birth"], "1815-12-10");
    assert!(json["image"].is_null());
  }

  #[test]
  fn direction_parses_case_insensitively() {
    assert_eq!("DESC".parse::<SortDirection>().unwrap(), SortDirection::Desc);
    assert_eq!(" asc ".parse::<SortDirection>().unwrap(), SortDirection::Asc);
    assert!("sideways".parse::<SortDirection>().is_err());
    assert_eq!(SortDirection::default(), SortDirection::Asc);
  }
}
