use crate::config::Config;
use crate::constants::{
    GenerationProfile, CHAT_COMPLETIONS_PATH, EDIT_IMAGE_COUNT, EDIT_IMAGE_FIELD,
    EDIT_OUTPUT_FORMAT, FALLBACK_IMAGE_MIME, IMAGE_EDITS_PATH,
    VISION_MODEL, VISION_SYSTEM_INSTRUCTIONS, VISION_TEMPERATURE, VISION_USER_INSTRUCTIONS,
};
use crate::error::RelayError;
use crate::images::{GenerationRequest, UploadedImage};
use crate::vision::{
    ImageUrl, MessageContent, OpenAiVisionRequestBody, VisionApiResponse, VisionContent,
    VisionMessageRole,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::IgnoredAny;
use serde_json::Value;
use std::time::Duration;

pub fn build_headers(api_key: &str, json: bool) -> Result<HeaderMap, RelayError> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
        .map_err(|_| RelayError::Configuration("API key is not a valid header value".into()))?;
    headers.insert(AUTHORIZATION, bearer);
    if json {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }
    Ok(headers)
}

pub fn encode_image(bytes: &[u8]) -> String {
    base64::encode(bytes)
}

pub fn image_data_url(image: &UploadedImage) -> String {
    let mime = image
        .content_type
        .as_deref()
        .filter(|ct| ct.starts_with("image/"))
        .unwrap_or(FALLBACK_IMAGE_MIME);
    format!("data:{};base64,{}", mime, encode_image(&image.bytes))
}

pub fn build_image_edit_form(
    request: GenerationRequest,
    profile: &GenerationProfile,
) -> Result<Form, RelayError> {
    let mut form = Form::new()
        .text("model", profile.model)
        .text("quality", profile.quality)
        .text("prompt", request.prompt)
        .text("size", profile.size)
        .text("n", EDIT_IMAGE_COUNT.to_string())
        .text("output_format", EDIT_OUTPUT_FORMAT);

    for image in request.images {
        let content_type = image
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&content_type)
            .map_err(|_| {
                RelayError::validation(format!("Invalid image content type: {}", content_type))
            })?;
        form = form.part(EDIT_IMAGE_FIELD, part);
    }

    Ok(form)
}

pub fn build_vision_request(image: &UploadedImage) -> OpenAiVisionRequestBody {
    OpenAiVisionRequestBody {
        model: VISION_MODEL.to_string(),
        temperature: VISION_TEMPERATURE,
        messages: vec![
            VisionMessageRole {
                role: "system".to_string(),
                content: MessageContent::Plain(VISION_SYSTEM_INSTRUCTIONS.to_string()),
            },
            VisionMessageRole {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    VisionContent::Text {
                        text: VISION_USER_INSTRUCTIONS.to_string(),
                    },
                    VisionContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_url(image),
                        },
                    },
                ]),
            },
        ],
    }
}

/// Reads a body as JSON, falling back to the raw text.
async fn read_payload(response: Response) -> Value {
    match response.text().await {
        Ok(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        Err(err) => Value::String(err.to_string()),
    }
}

async fn ensure_success(response: Response) -> Result<Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let details = read_payload(response).await;
    Err(RelayError::upstream(
        format!("Upstream returned status {}", status.as_u16()),
        details,
    ))
}

pub fn process_vision_response(payload: Value) -> Result<String, RelayError> {
    let content = serde_json::from_value::<VisionApiResponse>(payload.clone())
        .ok()
        .and_then(|api_response| api_response.choices.into_iter().next())
        .and_then(|choice| choice.message.content);

    content.ok_or_else(|| RelayError::upstream("Unexpected upstream response", payload))
}

/// Client for the two upstream endpoints, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    edits_url: String,
    chat_url: String,
    generation_timeout: Duration,
    read_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(client: Client, config: &Config) -> Self {
        OpenAiClient {
            client,
            api_key: config.api_key.clone(),
            edits_url: config.endpoint(IMAGE_EDITS_PATH),
            chat_url: config.endpoint(CHAT_COMPLETIONS_PATH),
            generation_timeout: config.generation_timeout,
            read_timeout: config.read_timeout,
        }
    }

    pub async fn edit_images(
        &self,
        request: GenerationRequest,
        profile: &GenerationProfile,
    ) -> Result<Vec<u8>, RelayError> {
        let form = build_image_edit_form(request, profile)?;
        let response = self
            .client
            .post(&self.edits_url)
            .headers(build_headers(&self.api_key, false)?)
            .multipart(form)
            .timeout(self.generation_timeout)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let body = response.bytes().await?;
        if serde_json::from_slice::<IgnoredAny>(&body).is_err() {
            return Err(RelayError::upstream(
                "Upstream returned a non-JSON body",
                Value::String(String::from_utf8_lossy(&body).into_owned()),
            ));
        }
        Ok(body.to_vec())
    }

    pub async fn read_image(&self, image: &UploadedImage) -> Result<String, RelayError> {
        let request_body = build_vision_request(image);
        let response = self
            .client
            .post(&self.chat_url)
            .headers(build_headers(&self.api_key, true)?)
            .json(&request_body)
            .timeout(self.read_timeout)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let payload = read_payload(response).await;
        process_vision_response(payload)
    }
}
