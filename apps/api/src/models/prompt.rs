use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Placeholder image used when a prompt is saved without any uploads.
pub const DEFAULT_PREVIEW: &str =
    "https://www.gstatic.com/lamda/images/gemini_sparkle_v002_d4735304ff6292a690345.svg";

/// Upper bound on the gallery attached to a single prompt.
pub const MAX_PREVIEWS: usize = 9;

/// Author stamped on every user-authored prompt.
pub const CUSTOM_AUTHOR: &str = "Me";

const UNKNOWN_AUTHOR: &str = "Unknown";
/// What earlier extension builds hashed in place of a missing author.
const ABSENT_AUTHOR_KEY: &str = "undefined";
const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromptMode {
    #[default]
    Generate,
    Edit,
}

impl PromptMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "generate" => Some(PromptMode::Generate),
            "edit" => Some(PromptMode::Edit),
            _ => None,
        }
    }
}

/// Where a prompt entered the catalog from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOrigin {
    Daily,
    Core,
    Custom,
}

/// A validated catalog record. Every instance carries a mandatory `id`
/// assigned once at ingestion; display fields are never used to recompute it.
///
/// The camelCase flags keep the stored shape readable by older clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub prompt: String,
    pub author: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<PromptMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, rename = "isCustom")]
    pub is_custom: bool,
    #[serde(default, rename = "isFlash")]
    pub is_flash: bool,
    #[serde(default, rename = "isDaily", skip_serializing_if = "std::ops::Not::not")]
    pub is_daily: bool,
}

impl Prompt {
    /// Replaces the image references, keeping `preview` and `previews`
    /// mutually exclusive. An empty set clears both.
    pub fn set_images(&mut self, images: Vec<String>) {
        let (preview, previews) = split_images(images);
        self.preview = preview;
        self.previews = previews;
    }

    /// All image references in display order.
    pub fn images(&self) -> Vec<&str> {
        match (&self.previews, &self.preview) {
            (Some(list), _) => list.iter().map(String::as_str).collect(),
            (None, Some(single)) => vec![single.as_str()],
            (None, None) => Vec::new(),
        }
    }

    /// The image a card shows first.
    pub fn cover_image(&self) -> &str {
        self.images().first().copied().unwrap_or(DEFAULT_PREVIEW)
    }
}

fn split_images(images: Vec<String>) -> (Option<String>, Option<Vec<String>>) {
    let mut images: Vec<String> = images
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    images.truncate(MAX_PREVIEWS);
    match images.len() {
        0 => (None, None),
        1 => (images.pop(), None),
        _ => (None, Some(images)),
    }
}

/// Derives the stable identifier of a built-in prompt from its title and author.
///
/// 32-bit rolling hash (`h * 31 + unit`, wrapping) over the UTF-16 code units
/// of `"{title}-{author}"`. Given the fields exactly as they arrived (no
/// trimming, `undefined` for a missing author) the result equals the id
/// earlier extension builds computed.
pub fn derive_prompt_id(title: &str, author: &str) -> String {
    let key = format!("{title}-{author}");
    let hash = key.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    });
    format!("default-{}", i64::from(hash).abs())
}

#[derive(Debug, Error, PartialEq)]
pub enum IngestError {
    #[error("prompt entry has no title")]
    MissingTitle,

    #[error("prompt '{0}' has no prompt text")]
    MissingBody(String),
}

/// Loosely-typed prompt as it arrives from a feed or from legacy storage.
/// Only `title` and `prompt` are required; everything else is normalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previews: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RawPrompt {
    /// Validates and normalizes the entry into a catalog record.
    pub fn into_prompt(self, origin: PromptOrigin) -> Result<Prompt, IngestError> {
        let derived_id = derive_prompt_id(
            self.title.as_deref().unwrap_or_default(),
            self.author.as_deref().unwrap_or(ABSENT_AUTHOR_KEY),
        );

        let title = non_blank(self.title).ok_or(IngestError::MissingTitle)?;
        let body = self
            .prompt
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| IngestError::MissingBody(title.clone()))?;
        let author = non_blank(self.author).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let id = self
            .id
            .and_then(id_from_value)
            .unwrap_or(derived_id);

        let images = match (self.previews, self.preview) {
            (Some(list), _) if !list.is_empty() => list,
            (_, Some(single)) => vec![single],
            _ => Vec::new(),
        };

        let mut prompt = Prompt {
            id,
            title,
            prompt: body,
            author,
            category: non_blank(self.category).unwrap_or_default(),
            sub_category: non_blank(self.sub_category),
            mode: self.mode.as_deref().and_then(PromptMode::parse),
            preview: None,
            previews: None,
            link: non_blank(self.link),
            is_custom: origin == PromptOrigin::Custom,
            is_flash: false,
            is_daily: origin == PromptOrigin::Daily,
        };
        prompt.set_images(images);
        Ok(prompt)
    }
}

/// Legacy custom ids were numeric timestamps; both shapes become strings.
fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// User input for creating or editing a custom prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub mode: PromptMode,
}

impl PromptDraft {
    /// Title and body must both be present after trimming.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.prompt.trim().is_empty() {
            return Err("Please fill in both the title and the prompt text".to_string());
        }
        Ok(())
    }

    /// Builds the stored record. An empty upload set falls back to the
    /// placeholder so saved prompts always carry exactly one of the image fields.
    pub fn into_custom_prompt(self, id: String, images: Vec<String>) -> Prompt {
        let mut prompt = Prompt {
            id,
            title: self.title.trim().to_string(),
            prompt: self.prompt.trim().to_string(),
            author: CUSTOM_AUTHOR.to_string(),
            category: non_blank(Some(self.category))
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            sub_category: non_blank(self.sub_category),
            mode: Some(self.mode),
            preview: None,
            previews: None,
            link: None,
            is_custom: true,
            is_flash: false,
            is_daily: false,
        };
        prompt.set_images(images);
        if prompt.preview.is_none() && prompt.previews.is_none() {
            prompt.preview = Some(DEFAULT_PREVIEW.to_string());
        }
        prompt
    }
}
