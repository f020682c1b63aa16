use crate::config::Config;
use crate::constants::{IMAGE_FIELD, MAX_BODY_BYTES};
use crate::error::RelayError;
use crate::images::{GenerationRequest, UploadedImage};
use crate::utils::OpenAiClient;
use crate::vision::{ReadRequest, ReadResult};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub openai: OpenAiClient,
}

impl AppState {
    pub fn new(config: Config, client: reqwest::Client) -> Self {
        let openai = OpenAiClient::new(client, &config);
        AppState {
            config: Arc::new(config),
            openai,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_handler))
        .route("/generation-image", post(generation_image_handler))
        .route("/read-image", post(read_image_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Text fields and image parts pulled out of one multipart body.
#[derive(Debug, Default)]
struct UploadForm {
    prompt: Option<String>,
    typeproduct: Option<String>,
    images: Vec<UploadedImage>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, RelayError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.images.push(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "prompt" => form.prompt = Some(field.text().await?),
            "typeproduct" => form.typeproduct = Some(field.text().await?),
            other => log::debug!("ignoring multipart field '{}'", other),
        }
    }

    Ok(form)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "env": state.config.mode.as_str(),
    }))
}

async fn generation_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, RelayError> {
    let form = read_upload_form(multipart?).await?;
    let request = GenerationRequest::new(form.prompt, form.typeproduct, form.images)?;

    log::info!("typeproduct: {}", request.typeproduct);
    log::info!("prompt: {}", request.prompt);

    let profile = state.config.profile;
    let body = state.openai.edit_images(request, &profile).await?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    ))
}

async fn read_image_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReadResult>, RelayError> {
    let form = read_upload_form(multipart?).await?;
    let request = ReadRequest::new(form.images)?;

    log::info!(
        "reading image '{}' ({} bytes)",
        request.image.file_name,
        request.image.bytes.len()
    );

    let result = state.openai.read_image(&request.image).await?;
    Ok(Json(ReadResult { result }))
}
