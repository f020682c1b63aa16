use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const IMAGE_EDITS_PATH: &str = "/images/edits";
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_PROFILE: &str = "standard";

pub const VISION_MODEL: &str = "gpt-4o-mini";
pub const VISION_TEMPERATURE: f32 = 0.0;
pub const VISION_SYSTEM_INSTRUCTIONS: &str = "You extract structured data from images.";
pub const VISION_USER_INSTRUCTIONS: &str = r#"Read the image and return ONLY valid JSON.
Required format:
[
  { "partnumber": string, "quantity": number }
]

Rules:
- Do NOT use markdown
- Do NOT include explanatory text
- Always the product part number first, then the quantity
- If there is no quantity, use 1
- Ignore any text that is not a product"#;
pub const FALLBACK_IMAGE_MIME: &str = "image/png";

pub const IMAGE_FIELD: &str = "image";
pub const EDIT_IMAGE_FIELD: &str = "image[]";
pub const EDIT_IMAGE_COUNT: u8 = 1;
pub const EDIT_OUTPUT_FORMAT: &str = "png";
pub const GENERATION_IMAGE_COUNT: usize = 2;

pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;
// Two full-size images plus the text fields and multipart framing.
pub const MAX_BODY_BYTES: usize = GENERATION_IMAGE_COUNT * MAX_IMAGE_BYTES + 1024 * 1024;

pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);
pub const READ_TIMEOUT: Duration = Duration::from_secs(45);

/// Model, quality and size sent with every image-edit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationProfile {
    pub name: &'static str,
    pub model: &'static str,
    pub quality: &'static str,
    pub size: &'static str,
}

pub const GENERATION_PROFILES: &[GenerationProfile] = &[
    GenerationProfile {
        name: "standard",
        model: "gpt-image-1",
        quality: "medium",
        size: "1024x1536",
    },
    GenerationProfile {
        name: "square",
        model: "gpt-image-1",
        quality: "high",
        size: "1024x1024",
    },
    GenerationProfile {
        name: "mini",
        model: "gpt-image-1-mini",
        quality: "medium",
        size: "1024x1024",
    },
];

pub fn find_profile(name: &str) -> Option<GenerationProfile> {
    GENERATION_PROFILES
        .iter()
        .find(|profile| profile.name.eq_ignore_ascii_case(name))
        .copied()
}
