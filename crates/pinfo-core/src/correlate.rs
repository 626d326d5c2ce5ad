//! Finding the secondary document that mirrors a primary row.
//!
//! The two stores assign unrelated identifiers, so the link is carried by the
//! data itself. Rows written by this crate share a `correlation_id`. Older
//! documents have none; for those the lookup falls back to an exact match on
//! `(first_name, last_name, email)`. The fallback is best-effort: it misses
//! once those fields diverge between the stores, and it picks the first match
//! in store order when several people share the triple.

use uuid::Uuid;

use crate::{
  person::{PersonInfo, PrimaryRecord, SecondaryRecord},
  store::SecondaryStore,
};

/// A secondary-store lookup filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
  /// Documents whose `correlation_id` equals the key.
  Key(Uuid),
  /// Documents without a `correlation_id` whose name and email match
  /// exactly.
  Fields {
    first_name: String,
    last_name:  String,
    email:      String,
  },
}

impl Correlation {
  pub fn fields_of(info: &PersonInfo) -> Self {
    Self::Fields {
      first_name: info.first_name.clone(),
      last_name:  info.last_name.clone(),
      email:      info.email.clone(),
    }
  }

  /// Whether a document holding `info` satisfies this filter.
  pub fn matches(&self, info: &PersonInfo) -> bool {
    match self {
      Self::Key(key) => info.correlation_id == Some(*key),
      Self::Fields {
        first_name,
        last_name,
        email,
      } => {
        info.correlation_id.is_none()
          && info.first_name == *first_name
          && info.last_name == *last_name
          && info.email == *email
      }
    }
  }
}

/// Resolve the secondary document for `primary`.
///
/// Tries the shared key first, then the field fallback. `Ok(None)` means no
/// document matched, which is a normal outcome.
pub async fn resolve<S>(
  store: &S,
  primary: &PrimaryRecord,
) -> Result<Option<SecondaryRecord>, S::Error>
where
  S: SecondaryStore,
{
  if let Some(key) = primary.info.correlation_id {
    let by_key = Correlation::Key(key);
    if let Some(found) = store.find_by_filter(&by_key).await? {
      return Ok(Some(found));
    }
  }

  let by_fields = Correlation::fields_of(&primary.info);
  store.find_by_filter(&by_fields).await
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn info(first: &str, key: Option<Uuid>) -> PersonInfo {
    PersonInfo {
      first_name:     first.into(),
      last_name:      "Hopper".into(),
      email:          "grace@example.com".into(),
      date_of_birth:  NaiveDate::from_ymd_opt(1906, 12, 9).unwrap(),
      state:          "NY".into(),
      city:           "New York".into(),
      country:        "US".into(),
      image:          None,
      correlation_id: key,
    }
  }

  #[test]
  fn key_matches_only_equal_keys() {
    let key = Uuid::new_v4();
    let filter = Correlation::Key(key);
    assert!(filter.matches(&info("Grace", Some(key))));
    assert!(!filter.matches(&info("Grace", Some(Uuid::new_v4()))));
    assert!(!filter.matches(&info("Grace", None)));
  }

  #[test]
  fn fields_ignore_keyed_documents() {
    let filter = Correlation::fields_of(&info("Grace", None));
    assert!(filter.matches(&info("Grace", None)));
    assert!(!filter.matches(&info("Grace", Some(Uuid::new_v4()))));
    assert!(!filter.matches(&info("Amazing Grace", None)));
  }
}
