// src/captions/error.rs

use crate::llm::ModelError;
use crate::photo::PhotoError;

pub const NO_PHOTO_NOTICE: &str = "Please upload or capture a photo first.";
pub const RETRY_LATER_NOTICE: &str =
    "Sorry, we couldn't generate captions right now. Please try again later.";

/// Every way a caption generation can end without new captions
#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("no photo available")]
    MissingPhoto,

    #[error("invalid photo: {0}")]
    InvalidPhoto(#[from] PhotoError),

    #[error("caption model failed: {0}")]
    Model(#[from] ModelError),

    #[error("response was not valid caption JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// `captions` missing and `captions: []` are the same failure
    #[error("AI did not return valid captions")]
    EmptyResult,
}

impl CaptionError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, CaptionError::MissingPhoto)
    }

    /// Message shown to the user; the cause itself only goes to the log
    pub fn user_notice(&self) -> &'static str {
        match self {
            CaptionError::MissingPhoto => NO_PHOTO_NOTICE,
            _ => RETRY_LATER_NOTICE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_notices() {
        assert_eq!(CaptionError::MissingPhoto.user_notice(), NO_PHOTO_NOTICE);
        assert_eq!(CaptionError::EmptyResult.user_notice(), RETRY_LATER_NOTICE);
        assert_eq!(
            CaptionError::Model(ModelError::NoText).user_notice(),
            RETRY_LATER_NOTICE
        );
    }

    #[test]
    fn test_raw_cause_not_in_notice() {
        let err = CaptionError::Model(ModelError::Api("secret internals".into()));
        assert!(err.to_string().contains("secret internals"));
        assert!(!err.user_notice().contains("secret"));
        assert!(!err.is_precondition());
    }
}
