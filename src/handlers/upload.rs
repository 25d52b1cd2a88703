//! Multipart upload forwarding (avatar, generic image).
//!
//! The browser's form is read completely, the expected file field is
//! checked, and a fresh multipart body is sent to the backend. The bearer
//! token is attached when a session exists but is not required.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    response::Response,
};
use reqwest::multipart::{Form, Part};

use crate::error::GatewayError;
use crate::http::request::RequestId;
use crate::http::response;
use crate::http::server::AppState;
use crate::session::Session;

pub const AVATAR_FIELD: &str = "avatar";
pub const IMAGE_FIELD: &str = "image";
pub const FOLDER_FIELD: &str = "folder";
pub const DEFAULT_FOLDER: &str = "product";

#[derive(Debug)]
struct FilePart {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

impl FilePart {
    fn into_part(self) -> Result<Part, GatewayError> {
        let part = Part::bytes(self.data.to_vec()).file_name(self.file_name);
        match self.content_type {
            Some(content_type) => Ok(part.mime_str(&content_type)?),
            None => Ok(part),
        }
    }
}

#[derive(Debug, Default)]
struct UploadForm {
    files: HashMap<String, FilePart>,
    texts: HashMap<String, String>,
}

impl UploadForm {
    async fn read(multipart: Result<Multipart, MultipartRejection>) -> Result<Self, GatewayError> {
        let mut multipart = multipart.map_err(|rejection| {
            tracing::debug!(error = %rejection, "Upload is not multipart form data");
            GatewayError::Validation("Invalid form data".to_string())
        })?;

        let mut form = UploadForm::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_owned);
            let content_type = field.content_type().map(str::to_owned);

            match file_name {
                Some(file_name) => {
                    let data = field.bytes().await?;
                    form.files.insert(
                        name,
                        FilePart {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.texts.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Take the named file field; a plain text field of that name is invalid.
    fn take_file(&mut self, name: &str) -> Result<FilePart, GatewayError> {
        if let Some(file) = self.files.remove(name) {
            return Ok(file);
        }
        if self.texts.contains_key(name) {
            return Err(GatewayError::Validation(format!("Field '{}' must be a file", name)));
        }
        Err(GatewayError::Validation("No file provided".to_string()))
    }

    fn text_or(&self, name: &str, default: &str) -> String {
        self.texts
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

pub async fn avatar(
    State(state): State<AppState>,
    session: Session,
    request_id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    state.backend.require_configured()?;

    let mut upload = UploadForm::read(multipart).await?;
    let file = upload.take_file(AVATAR_FIELD)?;
    tracing::debug!(request_id = %request_id, size = file.data.len(), "Forwarding avatar upload");

    let form = Form::new().part(AVATAR_FIELD, file.into_part()?);
    let reply = state
        .backend
        .upload(
            &state.config.backend.avatar_upload_path,
            form,
            session.credential().as_ref(),
            &request_id,
        )
        .await?;

    Ok(response::relay_lenient(reply, "Avatar upload failed"))
}

pub async fn image(
    State(state): State<AppState>,
    session: Session,
    request_id: RequestId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, GatewayError> {
    state.backend.require_configured()?;

    let mut upload = UploadForm::read(multipart).await?;
    let file = upload.take_file(IMAGE_FIELD)?;
    let folder = upload.text_or(FOLDER_FIELD, DEFAULT_FOLDER);
    tracing::debug!(
        request_id = %request_id,
        folder = %folder,
        size = file.data.len(),
        "Forwarding image upload"
    );

    let form = Form::new()
        .part(IMAGE_FIELD, file.into_part()?)
        .text(FOLDER_FIELD, folder);
    let reply = state
        .backend
        .upload(
            &state.config.backend.image_upload_path,
            form,
            session.credential().as_ref(),
            &request_id,
        )
        .await?;

    Ok(response::relay_lenient(reply, "Image upload failed"))
}
