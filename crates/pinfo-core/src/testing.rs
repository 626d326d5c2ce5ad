//! In-memory stores with switchable failures, for synchronizer tests.

use std::{
  collections::BTreeMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use chrono::{NaiveDate, Utc};

use crate::{
  correlate::Correlation,
  image::ImageUpload,
  person::{PersonInfo, PrimaryRecord, SecondaryRecord, SortDirection},
  store::{BlobStore, PrimaryStore, SecondaryStore},
  sync::Synchronizer,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(String);

fn fail(flag: &AtomicBool, what: &str) -> Result<(), FakeError> {
  if flag.load(Ordering::SeqCst) {
    Err(FakeError(format!("injected {what} failure")))
  } else {
    Ok(())
  }
}

/// Which operations of a fake should fail.
#[derive(Default)]
pub struct Faults {
  pub insert: AtomicBool,
  pub find:   AtomicBool,
  pub update: AtomicBool,
  pub delete: AtomicBool,
}

/// Make every later call guarded by `flag` fail.
pub fn trip(flag: &AtomicBool) { flag.store(true, Ordering::SeqCst) }

fn sort_key(info: &PersonInfo) -> (String, String) {
  (info.first_name.clone(), info.last_name.clone())
}

// ─── Primary ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryPrimary {
  rows:       Mutex<Vec<PrimaryRecord>>,
  next_id:    AtomicUsize,
  pub faults: Faults,
}

impl MemoryPrimary {
  pub fn len(&self) -> usize { self.rows.lock().unwrap().len() }
}

impl PrimaryStore for MemoryPrimary {
  type Error = FakeError;

  async fn insert(&self, info: &PersonInfo) -> Result<PrimaryRecord, FakeError> {
    fail(&self.faults.insert, "primary insert")?;
    let now = Utc::now();
    let record = PrimaryRecord {
      id:         self.next_id.fetch_add(1, Ordering::SeqCst) as i64 + 1,
      info:       info.clone(),
      created_at: now,
      updated_at: now,
    };
    self.rows.lock().unwrap().push(record.clone());
    Ok(record)
  }

  async fn find_by_id(&self, id: i64) -> Result<Option<PrimaryRecord>, FakeError> {
    fail(&self.faults.find, "primary find")?;
    Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
  }

  async fn list(&self, direction: SortDirection) -> Result<Vec<PrimaryRecord>, FakeError> {
    let mut rows = self.rows.lock().unwrap().clone();
    rows.sort_by_key(|r| sort_key(&r.info));
    if direction == SortDirection::Desc {
      rows.reverse();
    }
    Ok(rows)
  }

  async fn update(&self, id: i64, info: &PersonInfo) -> Result<PrimaryRecord, FakeError> {
    fail(&self.faults.update, "primary update")?;
    let mut rows = self.rows.lock().unwrap();
    let row = rows
      .iter_mut()
      .find(|r| r.id == id)
      .ok_or_else(|| FakeError(format!("row {id} not found")))?;
    row.info = info.clone();
    row.updated_at = Utc::now();
    Ok(row.clone())
  }

  async fn delete(&self, id: i64) -> Result<(), FakeError> {
    fail(&self.faults.delete, "primary delete")?;
    let mut rows = self.rows.lock().unwrap();
    let before = rows.len();
    rows.retain(|r| r.id != id);
    if rows.len() == before {
      return Err(FakeError(format!("row {id} not found")));
    }
    Ok(())
  }
}

// ─── Secondary ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemorySecondary {
  docs:       Mutex<Vec<SecondaryRecord>>,
  next_id:    AtomicUsize,
  pub faults: Faults,
}

impl MemorySecondary {
  pub fn all(&self) -> Vec<SecondaryRecord> { self.docs.lock().unwrap().clone() }

  pub fn len(&self) -> usize { self.docs.lock().unwrap().len() }
}

impl SecondaryStore for MemorySecondary {
  type Error = FakeError;

  async fn insert(&self, info: &PersonInfo) -> Result<SecondaryRecord, FakeError> {
    fail(&self.faults.insert, "secondary insert")?;
    let now = Utc::now();
    let record = SecondaryRecord {
      id:         format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
      info:       info.clone(),
      created_at: now,
      updated_at: now,
    };
    self.docs.lock().unwrap().push(record.clone());
    Ok(record)
  }

  async fn find_by_filter(
    &self,
    filter: &Correlation,
  ) -> Result<Option<SecondaryRecord>, FakeError> {
    fail(&self.faults.find, "secondary find")?;
    Ok(
      self
        .docs
        .lock()
        .unwrap()
        .iter()
        .find(|d| filter.matches(&d.info))
        .cloned(),
    )
  }

  async fn list(&self, direction: SortDirection) -> Result<Vec<SecondaryRecord>, FakeError> {
    let mut docs = self.all();
    docs.sort_by_key(|d| sort_key(&d.info));
    if direction == SortDirection::Desc {
      docs.reverse();
    }
    Ok(docs)
  }

  async fn update(&self, id: &str, info: &PersonInfo) -> Result<SecondaryRecord, FakeError> {
    fail(&self.faults.update, "secondary update")?;
    let mut docs = self.docs.lock().unwrap();
    let doc = docs
      .iter_mut()
      .find(|d| d.id == id)
      .ok_or_else(|| FakeError(format!("document {id} not found")))?;
    doc.info = info.clone();
    doc.updated_at = Utc::now();
    Ok(doc.clone())
  }

  async fn delete(&self, id: &str) -> Result<(), FakeError> {
    fail(&self.faults.delete, "secondary delete")?;
    self.docs.lock().unwrap().retain(|d| d.id != id);
    Ok(())
  }
}

// ─── Blobs ───────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryBlobs {
  blobs:      Mutex<BTreeMap<String, Vec<u8>>>,
  next_id:    AtomicUsize,
  pub faults: Faults,
}

impl MemoryBlobs {
  pub fn contains(&self, key: &str) -> bool { self.blobs.lock().unwrap().contains_key(key) }

  pub fn len(&self) -> usize { self.blobs.lock().unwrap().len() }
}

impl BlobStore for MemoryBlobs {
  type Error = FakeError;

  async fn put(&self, folder: &str, image: &ImageUpload) -> Result<String, FakeError> {
    fail(&self.faults.insert, "blob put")?;
    let n = self.next_id.fetch_add(1, Ordering::SeqCst);
    let key = format!("{folder}/{n}.{}", image.kind.extension());
    self.blobs.lock().unwrap().insert(key.clone(), image.bytes.clone());
    Ok(key)
  }

  async fn delete(&self, key: &str) -> Result<(), FakeError> {
    fail(&self.faults.delete, "blob delete")?;
    self.blobs.lock().unwrap().remove(key);
    Ok(())
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub type MemorySync = Synchronizer<MemoryPrimary, MemorySecondary, MemoryBlobs>;

pub fn synchronizer() -> MemorySync {
  Synchronizer::new(
    MemoryPrimary::default(),
    MemorySecondary::default(),
    MemoryBlobs::default(),
  )
}

pub fn person(first: &str, last: &str, email: &str) -> PersonInfo {
  PersonInfo {
    first_name:     first.into(),
    last_name:      last.into(),
    email:          email.into(),
    date_of_birth:  NaiveDate::from_ymd_opt(1990, 4, 1).unwrap(),
    state:          "Ontario".into(),
    city:           "Toronto".into(),
    country:        "Canada".into(),
    image:          None,
    correlation_id: None,
  }
}

pub fn png() -> ImageUpload {
  ImageUpload::sniff(b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec()).unwrap()
}
