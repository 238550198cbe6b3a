use crate::config::ReaderConfig;
use crate::models::{ExtractResponse, FieldRecord};
use crate::processing::{
    FieldExtractor, ImageProcessor, TesseractRecognizer, TextCanonicalizer, TextRecognizer,
};
use crate::utils::KtpError;
use std::path::{Path, PathBuf};

/// Runs the whole read: decode, preprocess, OCR, canonicalize, extract.
///
/// Holds only configuration and the recognizer, so one reader can serve any
/// number of concurrent requests.
pub struct KtpReader {
    processor: ImageProcessor,
    recognizer: Box<dyn TextRecognizer>,
    snapshot: Option<PathBuf>,
}

impl KtpReader {
    /// Reader backed by Tesseract.
    pub fn new(config: ReaderConfig) -> Self {
        let recognizer = TesseractRecognizer::new(config.recognizer.clone());
        Self::with_recognizer(config, Box::new(recognizer))
    }

    pub fn with_recognizer(config: ReaderConfig, recognizer: Box<dyn TextRecognizer>) -> Self {
        KtpReader {
            processor: ImageProcessor::new(config.normalizer),
            recognizer,
            snapshot: config.snapshot,
        }
    }

    pub fn read_file(&self, image_path: &Path) -> Result<FieldRecord, KtpError> {
        let image_bytes = std::fs::read(image_path)?;
        self.read_bytes(&image_bytes)
    }

    pub fn read_bytes(&self, image_bytes: &[u8]) -> Result<FieldRecord, KtpError> {
        // Step 1: Decode and binarize
        let image = ImageProcessor::decode(image_bytes)?;
        let binary = self.processor.preprocess(&image);
        if let Some(path) = &self.snapshot {
            ImageProcessor::save_snapshot(&binary, path);
        }

        // Step 2: OCR
        let text = self.recognizer.recognize(&binary)?;

        // Step 3: Parse the text into fields
        let line = TextCanonicalizer::canonicalize(&text);
        let record = FieldExtractor::extract_fields(&line);

        log::info!("Extracted {} of 14 KTP fields", record.filled());
        Ok(record)
    }

    /// Same as [`read_bytes`](Self::read_bytes) but folded into the
    /// Success/Error envelope.
    pub fn respond(&self, image_bytes: &[u8]) -> ExtractResponse {
        let result = self.read_bytes(image_bytes);
        if let Err(err) = &result {
            log::error!("KTP read failed: {}", err);
        }
        ExtractResponse::from(result)
    }
}
