// src/photo/mod.rs
// Photo payload and emoji overlay selection, owned by the capture/placement UI

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_MEDIA_TYPE: &str = "image/jpeg";

/// A base64 image in data-URL form (`data:<mime>;base64,<payload>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    media_type: String,
    payload: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo data is empty")]
    Empty,

    #[error("photo data URL is not base64 encoded")]
    NotBase64,

    #[error("failed to read photo: {0}")]
    Io(#[from] std::io::Error),
}

impl PhotoData {
    /// Parse a data URL as produced by a canvas or file reader.
    ///
    /// A bare base64 string without a `data:` header is taken as a JPEG payload.
    pub fn from_data_url(url: &str) -> Result<Self, PhotoError> {
        let url = url.trim();

        let Some(rest) = url.strip_prefix("data:") else {
            if url.is_empty() {
                return Err(PhotoError::Empty);
            }
            return Ok(Self {
                media_type: DEFAULT_MEDIA_TYPE.to_string(),
                payload: url.to_string(),
            });
        };

        let (header, payload) = rest.split_once(',').ok_or(PhotoError::Empty)?;
        let mut params = header.split(';');
        let media_type = params
            .next()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MEDIA_TYPE);

        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(PhotoError::NotBase64);
        }
        if payload.trim().is_empty() {
            return Err(PhotoError::Empty);
        }

        Ok(Self {
            media_type: media_type.to_string(),
            payload: payload.trim().to_string(),
        })
    }

    pub fn from_bytes(bytes: &[u8], media_type: impl Into<String>) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        Ok(Self {
            media_type: media_type.into(),
            payload: BASE64.encode(bytes),
        })
    }

    /// Read an image file, guessing its media type from the extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PhotoError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .filter(|m| m.starts_with("image/"))
            .unwrap_or(DEFAULT_MEDIA_TYPE);
        Self::from_bytes(&bytes, media_type)
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Base64 payload with the data-URL header removed.
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

impl fmt::Display for PhotoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} base64 chars)", self.media_type, self.payload.len())
    }
}

/// One emoji a user has placed on the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmojiPlacement {
    pub symbol: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl EmojiPlacement {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            x: 0.0,
            y: 0.0,
            size: 48.0,
        }
    }

    pub fn at(mut self, x: f64, y: f64, size: f64) -> Self {
        self.x = x;
        self.y = y;
        self.size = size;
        self
    }
}

impl FromStr for EmojiPlacement {
    type Err = String;

    /// Accepts `SYMBOL` or `SYMBOL@x,y,size`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (symbol, coords) = match s.split_once('@') {
            Some((symbol, coords)) => (symbol.trim(), Some(coords)),
            None => (s.trim(), None),
        };
        if symbol.is_empty() {
            return Err("emoji symbol is empty".to_string());
        }

        let placement = EmojiPlacement::new(symbol);
        let Some(coords) = coords else {
            return Ok(placement);
        };

        let nums = coords
            .split(',')
            .map(|n| n.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("invalid emoji placement '{}': {}", coords, e))?;

        match nums.as_slice() {
            [x, y, size] => Ok(placement.at(*x, *y, *size)),
            _ => Err(format!("expected x,y,size after '@', got '{}'", coords)),
        }
    }
}

/// Ordered emoji overlays; only the symbols feed caption generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmojiSelection(Vec<EmojiPlacement>);

impl EmojiSelection {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn symbols_joined(&self) -> String {
        self.0
            .iter()
            .map(|e| e.symbol.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromIterator<EmojiPlacement> for EmojiSelection {
    fn from_iter<I: IntoIterator<Item = EmojiPlacement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
