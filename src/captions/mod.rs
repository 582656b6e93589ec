// src/captions/mod.rs
// Caption generation: context, result list, and the generator itself

use serde::Serialize;

use crate::photo::{EmojiSelection, PhotoData};

pub mod error;
pub mod generator;
pub mod prompt;

pub use error::CaptionError;
pub use generator::CaptionGenerator;

/// State read at call time, owned by the capture and emoji placement UI
#[derive(Debug, Clone, Default)]
pub struct CaptionContext {
    pub photo: Option<PhotoData>,
    pub emojis: EmojiSelection,
}

impl CaptionContext {
    pub fn new(photo: Option<PhotoData>, emojis: EmojiSelection) -> Self {
        Self { photo, emojis }
    }

    /// Build from the raw data URL a capture widget holds, if any.
    ///
    /// A blank string counts as no photo, so the generator's guard handles it.
    pub fn from_data_url(
        data_url: Option<&str>,
        emojis: EmojiSelection,
    ) -> Result<Self, CaptionError> {
        let photo = data_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(PhotoData::from_data_url)
            .transpose()?;
        Ok(Self { photo, emojis })
    }
}

/// Captions from one generation, in the order the model returned them. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CaptionList(Vec<String>);

impl CaptionList {
    pub fn new(captions: Vec<String>) -> Option<Self> {
        if captions.is_empty() {
            None
        } else {
            Some(Self(captions))
        }
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_data_url() {
        let ctx = CaptionContext::from_data_url(
            Some("data:image/png;base64,iVBORw0KGgo="),
            EmojiSelection::default(),
        )
        .unwrap();
        assert_eq!(ctx.photo.unwrap().media_type(), "image/png");

        let ctx = CaptionContext::from_data_url(None, EmojiSelection::default()).unwrap();
        assert!(ctx.photo.is_none());

        let err = CaptionContext::from_data_url(Some("data:text/plain,hi"), EmojiSelection::default())
            .unwrap_err();
        assert!(matches!(err, CaptionError::InvalidPhoto(_)));
    }

    #[test]
    fn test_blank_data_url_is_no_photo() {
        for blank in ["", "   ", "\n"] {
            let ctx = CaptionContext::from_data_url(Some(blank), EmojiSelection::default()).unwrap();
            assert!(ctx.photo.is_none());
        }
    }

    #[test]
    fn test_caption_list_rejects_empty() {
        assert!(CaptionList::new(vec![]).is_none());

        let list = CaptionList::new(vec!["A".into(), "B".into()]).unwrap();
        assert_eq!(list.first(), "A");
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(!list.is_empty());
    }
}
