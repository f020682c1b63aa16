use crate::error::RelayError;
use crate::images::UploadedImage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VisionMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VisionChoice {
    pub message: VisionMessage,
}

#[derive(Debug, Deserialize)]
pub struct VisionApiResponse {
    #[serde(default)]
    pub choices: Vec<VisionChoice>,
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum VisionContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Plain(String),
    Parts(Vec<VisionContent>),
}

#[derive(Debug, Serialize)]
pub struct VisionMessageRole {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
pub struct OpenAiVisionRequestBody {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<VisionMessageRole>,
}

/// Body returned to the caller of `/read-image`.
#[derive(Debug, Serialize)]
pub struct ReadResult {
    pub result: String,
}

#[derive(Debug)]
pub struct ReadRequest {
    pub image: UploadedImage,
}

impl ReadRequest {
    pub fn new(mut images: Vec<UploadedImage>) -> Result<Self, RelayError> {
        if images.len() > 1 {
            return Err(RelayError::validation("Send a single image"));
        }
        let image = images
            .pop()
            .ok_or_else(|| RelayError::validation("Send an image"))?;
        image.check_size()?;
        Ok(ReadRequest { image })
    }
}
