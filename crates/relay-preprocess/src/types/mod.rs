//! Chat message representation accepted by the pipeline

pub mod message;

pub use message::{Content, ContentPart, ImageUrl, Message, Role};
