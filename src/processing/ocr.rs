use crate::config::{PageLayout, RecognizerConfig};
use crate::utils::KtpError;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use tesseract::{PageSegMode, Tesseract};

/// Anything that can turn a binarized card image into text.
///
/// Implementations must be re-entrant: the HTTP server shares one recognizer
/// across concurrent requests.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<String, KtpError>;
}

/// Tesseract-backed recognizer. A fresh engine handle is created per call so
/// no OCR state outlives a request.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    config: RecognizerConfig,
}

impl TesseractRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        TesseractRecognizer { config }
    }

    fn page_seg_mode(layout: PageLayout) -> PageSegMode {
        match layout {
            PageLayout::SingleBlock => PageSegMode::PsmSingleBlock,
            PageLayout::SingleColumn => PageSegMode::PsmSingleColumn,
            PageLayout::SparseText => PageSegMode::PsmSparseText,
            PageLayout::Auto => PageSegMode::PsmAuto,
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, KtpError> {
        let png = encode_png(image)?;
        let datapath = self
            .config
            .tessdata
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        // Default engine mode (OEM 3) picks LSTM when the traineddata has it
        let mut tess = Tesseract::new(datapath.as_deref(), Some(self.config.language.as_str()))
            .map_err(|e| KtpError::Recognition(format!("Tesseract init error: {}", e)))?;

        tess.set_page_seg_mode(Self::page_seg_mode(self.config.layout));

        let text = tess
            .set_image_from_mem(&png)
            .map_err(|e| KtpError::Recognition(format!("Tesseract set image error: {}", e)))?
            .get_text()
            .map_err(|e| KtpError::Recognition(format!("Tesseract error: {}", e)))?;

        log::debug!("OCR result:\n{}", text);
        Ok(text)
    }
}

fn encode_png(image: &GrayImage) -> Result<Vec<u8>, KtpError> {
    let mut buffer = Vec::with_capacity(image.width() as usize * image.height() as usize / 8);
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| KtpError::Recognition(format!("Failed to encode image for OCR: {}", e)))?;
    Ok(buffer)
}
