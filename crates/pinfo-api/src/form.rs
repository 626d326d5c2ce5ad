//! [`PersonForm`] — request body extractor accepting JSON or multipart.
//!
//! JSON bodies carry the text fields only. Multipart bodies carry the same
//! fields as text parts, plus an optional `image` file part. Extractor
//! rejections keep the status axum assigned (413, 415, ...).

use axum::{
  Json,
  extract::{FromRequest, Multipart, Request},
  http::header,
};
use pinfo_core::validate::PersonInput;

use crate::error::ApiError;

/// Multipart part holding the uploaded image.
pub const IMAGE_FIELD: &str = "image";

/// Unvalidated request fields and image bytes.
#[derive(Debug, Default)]
pub struct PersonForm {
  pub input: PersonInput,
  pub image: Option<Vec<u8>>,
}

fn is_multipart(req: &Request) -> bool {
  req
    .headers()
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<St> FromRequest<St> for PersonForm
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &St) -> Result<Self, Self::Rejection> {
    if !is_multipart(&req) {
      let Json(input) = Json::<PersonInput>::from_request(req, state).await?;
      return Ok(Self { input, image: None });
    }

    let mut multipart = Multipart::from_request(req, state).await?;

    let mut form = Self::default();
    while let Some(field) = multipart.next_field().await? {
      let Some(name) = field.name().map(str::to_owned) else {
        continue;
      };

      if name == IMAGE_FIELD {
        let bytes = field.bytes().await?;
        // An empty file part means no file was chosen.
        if !bytes.is_empty() {
          form.image = Some(bytes.to_vec());
        }
        continue;
      }

      let value = field.text().await?;
      if !form.input.set(&name, value) {
        tracing::debug!(field = %name, "ignoring unknown form field");
      }
    }

    Ok(form)
  }
}
