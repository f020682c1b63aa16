use crate::constants::{GENERATION_IMAGE_COUNT, MAX_IMAGE_BYTES};
use crate::error::RelayError;

/// A file part received from the caller, held only for one request.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn check_size(&self) -> Result<(), RelayError> {
        if self.bytes.is_empty() {
            return Err(RelayError::validation(format!(
                "Image '{}' is empty",
                self.file_name
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(RelayError::validation(format!(
                "Image '{}' exceeds the {} MiB limit",
                self.file_name,
                MAX_IMAGE_BYTES / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct GenerationRequest {
    pub prompt: String,
    pub typeproduct: String,
    pub images: Vec<UploadedImage>,
}

impl GenerationRequest {
    pub fn new(
        prompt: Option<String>,
        typeproduct: Option<String>,
        images: Vec<UploadedImage>,
    ) -> Result<Self, RelayError> {
        let prompt = prompt.filter(|p| !p.trim().is_empty());
        let typeproduct = typeproduct.filter(|t| !t.trim().is_empty());
        let (prompt, typeproduct) = match (prompt, typeproduct) {
            (Some(prompt), Some(typeproduct)) => (prompt, typeproduct),
            _ => {
                return Err(RelayError::validation(
                    "prompt and typeproduct are required",
                ))
            }
        };

        if images.len() != GENERATION_IMAGE_COUNT {
            return Err(RelayError::validation(format!(
                "Send exactly {} images",
                GENERATION_IMAGE_COUNT
            )));
        }
        for image in &images {
            image.check_size()?;
        }

        Ok(GenerationRequest {
            prompt,
            typeproduct,
            images,
        })
    }
}
