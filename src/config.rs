use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_LANGUAGE: &str = "ind";
pub const DEFAULT_SCALE: u32 = 2;
// Sigma OpenCV derives for a 5x5 Gaussian kernel with sigma 0
pub const DEFAULT_BLUR_SIGMA: f32 = 1.1;
pub const DEFAULT_BLOCK_SIZE: u32 = 15;
pub const DEFAULT_BIAS: i32 = 10;

/// Tesseract page layout assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    /// One uniform block of text (PSM 6)
    SingleBlock,
    SingleColumn,
    SparseText,
    Auto,
}

/// Image preprocessing parameters. The defaults are tuned for phone photos of
/// a KTP and should rarely need changing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    pub scale: u32,
    pub blur_sigma: f32,
    /// Side of the square neighbourhood used for the local mean; must be odd.
    pub block_size: u32,
    /// Subtracted from the local mean before comparing.
    pub bias: i32,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            blur_sigma: DEFAULT_BLUR_SIGMA,
            block_size: DEFAULT_BLOCK_SIZE,
            bias: DEFAULT_BIAS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    pub language: String,
    /// Directory holding `*.traineddata`; Tesseract's own default when unset.
    pub tessdata: Option<PathBuf>,
    pub layout: PageLayout,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            tessdata: None,
            layout: PageLayout::SingleBlock,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub normalizer: NormalizerConfig,
    pub recognizer: RecognizerConfig,
    /// Where to write the binarized image for inspection. Debug only.
    pub snapshot: Option<PathBuf>,
}
