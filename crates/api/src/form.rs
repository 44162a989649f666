//! Form extraction for record create/update requests.
//!
//! Browsers post these forms either url-encoded or, when the form carries a
//! file input, as `multipart/form-data`. [`RecordForm`] accepts both.

use axum::extract::{Form, FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use roster_core::storage::ImageUpload;
use serde::Deserialize;

use crate::error::AppError;

/// Multipart field carrying the uploaded file.
pub const IMAGE_FIELD: &str = "image";
/// Hidden field carrying the record's current image reference.
pub const EXISTING_IMAGE_FIELD: &str = "existingImage";

/// Fields submitted by the create and edit forms.
#[derive(Debug, Default)]
pub struct RecordForm {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Current `image_url`, echoed back so it survives an update without a new file.
    pub existing_image: Option<String>,
    /// A non-empty uploaded file, if one was chosen.
    pub image: Option<ImageUpload>,
}

/// Url-encoded shape of [`RecordForm`].
#[derive(Debug, Deserialize)]
struct RecordFields {
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "existingImage")]
    existing_image: Option<String>,
}

/// Body of the inline rename form.
#[derive(Debug, Deserialize)]
pub struct NameForm {
    pub name: Option<String>,
}

impl<S> FromRequest<S> for RecordForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(fields) = Form::<RecordFields>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(Self {
                name: fields.name,
                description: fields.description,
                existing_image: fields.existing_image,
                image: None,
            })
        }
    }
}

impl RecordForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                IMAGE_FIELD => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    let upload = ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    };
                    form.image = (!upload.is_empty()).then_some(upload);
                }
                "name" | "description" | EXISTING_IMAGE_FIELD => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?;
                    match name.as_str() {
                        "name" => form.name = Some(text),
                        "description" => form.description = Some(text),
                        _ => form.existing_image = Some(text),
                    }
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }
}
