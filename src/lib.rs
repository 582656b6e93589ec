// src/lib.rs

pub mod captions;
pub mod config;
pub mod llm;
pub mod photo;
pub mod ui;

pub use captions::{CaptionContext, CaptionError, CaptionGenerator, CaptionList};
pub use config::CaptionConfig;
pub use llm::{CaptionModel, GeminiClient, ModelError};
pub use photo::{EmojiPlacement, EmojiSelection, PhotoData};
pub use ui::{CaptionObserver, CaptionPage, CaptionSelect, UserNotifier};
