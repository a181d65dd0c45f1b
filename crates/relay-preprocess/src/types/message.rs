use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Text substituted when multi-part content yields no text at all
pub const EMPTY_CONTENT_PLACEHOLDER: &str = "Empty content after conversion.";

/// Role of a message participant
///
/// Roles outside the well-known set are kept verbatim in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
    /// Tool/function result
    Tool,
    /// Any other role (`developer`, `function`, vendor roles)
    #[serde(untagged)]
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Other(role) => role,
        }
    }
}

/// One conversation turn
///
/// Fields other than `role`, `content` and `name` (tool calls, tool call
/// ids, vendor extensions) are kept in `extra` and serialized back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, content: Content) -> Self {
        Self {
            role,
            content,
            name: None,
            extra: Map::new(),
        }
    }

    /// Message with plain text content
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, Content::Text(text.into()))
    }

    /// Copy of this message with its content replaced by `text`
    ///
    /// Role, name and every extra field are carried over unchanged.
    #[must_use]
    pub fn with_text(&self, text: String) -> Self {
        Self {
            role: self.role.clone(),
            content: Content::Text(text),
            name: self.name.clone(),
            extra: self.extra.clone(),
        }
    }
}

/// Message content as sent by callers
///
/// Variants are tried in order: a JSON string, then any JSON array (read
/// part by part), then anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text
    Text(String),
    /// Ordered content parts
    Parts(Vec<ContentPart>),
    /// Any other JSON shape, including `null` and a missing field
    Other(Value),
}

impl Default for Content {
    fn default() -> Self {
        Self::Other(Value::Null)
    }
}

impl Content {
    /// The text, if this content is already plain text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Parts(_) | Self::Other(_) => None,
        }
    }

    /// Render the content as a single string
    ///
    /// Parts are flattened one per line (images as `[Image: <url>]`), falling
    /// back to [`EMPTY_CONTENT_PLACEHOLDER`] when nothing remains. Other
    /// shapes get a best-effort textual form: `null` is empty, scalars use
    /// their display form, objects become compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if a JSON value cannot be serialized
    pub fn render(&self) -> Result<Cow<'_, str>, serde_json::Error> {
        match self {
            Self::Text(text) => Ok(Cow::Borrowed(text)),
            Self::Parts(parts) => {
                let flattened = flatten_parts(parts);
                if flattened.is_empty() {
                    Ok(Cow::Borrowed(EMPTY_CONTENT_PLACEHOLDER))
                } else {
                    Ok(Cow::Owned(flattened))
                }
            }
            Self::Other(value) => stringify(value).map(Cow::Owned),
        }
    }
}

fn flatten_parts(parts: &[ContentPart]) -> String {
    let mut text = String::new();

    for part in parts {
        match part {
            ContentPart::Text { text: part_text } if !part_text.is_empty() => {
                text.push_str(part_text);
                text.push('\n');
            }
            ContentPart::ImageUrl {
                image_url: Some(image),
            } if !image.url.is_empty() => {
                text.push_str("[Image: ");
                text.push_str(&image.url);
                text.push_str("]\n");
            }
            ContentPart::Text { .. } | ContentPart::ImageUrl { .. } | ContentPart::Unsupported(_) => {}
        }
    }

    text
}

fn stringify(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value),
    }
}

/// Individual part within multi-part content
///
/// Parsing never fails: an element that is not a well-formed text or image
/// part is kept as [`ContentPart::Unsupported`], so any JSON array is read
/// as parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ContentPart {
    /// Text block
    Text { text: String },
    /// Image reference
    ImageUrl { image_url: Option<ImageUrl> },
    /// Anything else (audio, files, malformed parts), ignored when flattening
    Unsupported(Value),
}

/// Wire form of the part types that are understood
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TypedPart {
    Text {
        #[serde(default)]
        text: String,
    },
    ImageUrl {
        #[serde(default)]
        image_url: Option<ImageUrl>,
    },
}

impl From<Value> for ContentPart {
    fn from(value: Value) -> Self {
        match TypedPart::deserialize(&value) {
            Ok(TypedPart::Text { text }) => Self::Text { text },
            Ok(TypedPart::ImageUrl { image_url }) => Self::ImageUrl { image_url },
            Err(_) => Self::Unsupported(value),
        }
    }
}

impl From<ContentPart> for Value {
    fn from(part: ContentPart) -> Self {
        match part {
            ContentPart::Text { text } => json!({"type": "text", "text": text}),
            ContentPart::ImageUrl { image_url: Some(image) } => {
                json!({"type": "image_url", "image_url": {"url": image.url}})
            }
            ContentPart::ImageUrl { image_url: None } => json!({"type": "image_url"}),
            ContentPart::Unsupported(value) => value,
        }
    }
}

/// Location of a referenced image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// URL or base64 data URI
    #[serde(default)]
    pub url: String,
}
