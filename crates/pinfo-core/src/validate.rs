//! Input validation for create and update requests.
//!
//! Raw values arrive as strings from JSON or multipart bodies and are checked
//! field by field. Every failing field is reported, not just the first one.
//! Create requires every field; update only checks the fields it receives.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  image::{ImageUpload, MAX_IMAGE_BYTES},
  person::{PersonInfo, PersonPatch},
};

const NAME_MAX: usize = 255;
const PLACE_MAX: usize = 100;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("the given data was invalid")]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  fn add(&mut self, field: &str, message: impl Into<String>) {
    self
      .0
      .entry(field.to_owned())
      .or_default()
      .push(message.into());
  }

  fn is_empty(&self) -> bool { self.0.is_empty() }

  fn finish<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }
}

#[cfg(test)]
impl ValidationErrors {
  pub(crate) fn get(&self, field: &str) -> Option<&[String]> {
    self.0.get(field).map(Vec::as_slice)
  }

  pub(crate) fn fields(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

// ─── Raw input ───────────────────────────────────────────────────────────────

/// Unvalidated request fields, as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonInput {
  pub first_name:    Option<String>,
  pub last_name:     Option<String>,
  pub email:         Option<String>,
  pub date_of_birth: Option<String>,
  pub state:         Option<String>,
  pub city:          Option<String>,
  pub country:       Option<String>,
}

impl PersonInput {
  /// Set a field by its wire name. Returns `false` for unknown names.
  pub fn set(&mut self, field: &str, value: String) -> bool {
    let slot = match field {
      "first_name" => &mut self.first_name,
      "last_name" => &mut self.last_name,
      "email" => &mut self.email,
      "date_of_birth" => &mut self.date_of_birth,
      "state" => &mut self.state,
      "city" => &mut self.city,
      "country" => &mut self.country,
      _ => return false,
    };
    *slot = Some(value);
    true
  }
}

// ─── Entry points ────────────────────────────────────────────────────────────

/// Validate a create request: every field is required.
pub fn create(
  input: PersonInput,
  image: Option<Vec<u8>>,
) -> Result<(PersonInfo, Option<ImageUpload>), ValidationErrors> {
  let mut errors = ValidationErrors::default();

  let first_name = required(&mut errors, "first_name", input.first_name)
    .and_then(|v| text(&mut errors, "first_name", v, NAME_MAX));
  let last_name = required(&mut errors, "last_name", input.last_name)
    .and_then(|v| text(&mut errors, "last_name", v, NAME_MAX));
  let email = required(&mut errors, "email", input.email)
    .and_then(|v| email(&mut errors, v));
  let date_of_birth = required(&mut errors, "date_of_birth", input.date_of_birth)
    .and_then(|v| date(&mut errors, "date_of_birth", &v));
  let state = required(&mut errors, "state", input.state)
    .and_then(|v| text(&mut errors, "state", v, PLACE_MAX));
  let city = required(&mut errors, "city", input.city)
    .and_then(|v| text(&mut errors, "city", v, PLACE_MAX));
  let country = required(&mut errors, "country", input.country)
    .and_then(|v| text(&mut errors, "country", v, PLACE_MAX));
  let image = image.and_then(|bytes| upload(&mut errors, bytes));

  if !errors.is_empty() {
    return Err(errors);
  }

  // Every `None` above recorded an error, so all values are present here.
  match (first_name, last_name, email, date_of_birth, state, city, country) {
    (
      Some(first_name),
      Some(last_name),
      Some(email),
      Some(date_of_birth),
      Some(state),
      Some(city),
      Some(country),
    ) => Ok((
      PersonInfo {
        first_name,
        last_name,
        email,
        date_of_birth,
        state,
        city,
        country,
        image: None,
        correlation_id: None,
      },
      image,
    )),
    _ => Err(errors),
  }
}

/// Validate an update request: only the fields present are checked.
pub fn update(
  input: PersonInput,
  image: Option<Vec<u8>>,
) -> Result<(PersonPatch, Option<ImageUpload>), ValidationErrors> {
  let mut errors = ValidationErrors::default();

  let patch = PersonPatch {
    first_name:    sometimes(&mut errors, "first_name", input.first_name)
      .and_then(|v| text(&mut errors, "first_name", v, NAME_MAX)),
    last_name:     sometimes(&mut errors, "last_name", input.last_name)
      .and_then(|v| text(&mut errors, "last_name", v, NAME_MAX)),
    email:         sometimes(&mut errors, "email", input.email)
      .and_then(|v| email(&mut errors, v)),
    date_of_birth: sometimes(&mut errors, "date_of_birth", input.date_of_birth)
      .and_then(|v| date(&mut errors, "date_of_birth", &v)),
    state:         sometimes(&mut errors, "state", input.state)
      .and_then(|v| text(&mut errors, "state", v, PLACE_MAX)),
    city:          sometimes(&mut errors, "city", input.city)
      .and_then(|v| text(&mut errors, "city", v, PLACE_MAX)),
    country:       sometimes(&mut errors, "country", input.country)
      .and_then(|v| text(&mut errors, "country", v, PLACE_MAX)),
  };
  let image = image.and_then(|bytes| upload(&mut errors, bytes));

  errors.finish((patch, image))
}

// ─── Rules ───────────────────────────────────────────────────────────────────

fn label(field: &str) -> String { field.replace('_', " ") }

/// Trim and treat blank values as missing.
fn present(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

fn required(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
) -> Option<String> {
  let value = present(value);
  if value.is_none() {
    errors.add(field, format!("The {} field is required.", label(field)));
  }
  value
}

/// A field that may be omitted but must not be blank when sent.
fn sometimes(
  errors: &mut ValidationErrors,
  field: &str,
  value: Option<String>,
) -> Option<String> {
  let sent = value.is_some();
  let value = present(value);
  if sent && value.is_none() {
    errors.add(field, format!("The {} field must not be empty.", label(field)));
  }
  value
}

fn text(
  errors: &mut ValidationErrors,
  field: &str,
  value: String,
  max: usize,
) -> Option<String> {
  if value.chars().count() > max {
    errors.add(
      field,
      format!(
        "The {} field must not be greater than {max} characters.",
        label(field)
      ),
    );
    return None;
  }
  Some(value)
}

fn email(errors: &mut ValidationErrors, value: String) -> Option<String> {
  if is_email(&value) {
    Some(value)
  } else {
    errors.add("email", "The email field must be a valid email address.");
    None
  }
}

fn is_email(value: &str) -> bool {
  if value.chars().any(char::is_whitespace) {
    return false;
  }
  let Some((local, domain)) = value.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
}

fn date(
  errors: &mut ValidationErrors,
  field: &str,
  value: &str,
) -> Option<NaiveDate> {
  match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
    Ok(d) => Some(d),
    Err(_) => {
      errors.add(field, format!("The {} field must be a valid date.", label(field)));
      None
    }
  }
}

fn upload(errors: &mut ValidationErrors, bytes: Vec<u8>) -> Option<ImageUpload> {
  let size = bytes.len();
  let Some(image) = ImageUpload::sniff(bytes) else {
    errors.add("image", "The image field must be an image.");
    errors.add("image", "The image field must be a file of type: jpeg, png, jpg, gif.");
    return None;
  };
  if size > MAX_IMAGE_BYTES {
    errors.add(
      "image",
      format!(
        "The image field must not be greater than {} kilobytes.",
        MAX_IMAGE_BYTES / 1024
      ),
    );
    return None;
  }
  Some(image)
}
