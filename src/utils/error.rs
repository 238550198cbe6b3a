use thiserror::Error;

/// Failures that abort a read. Field misses are never errors; a rule that
/// does not match leaves its field empty.
#[derive(Debug, Error)]
pub enum KtpError {
    #[error("Image decode error: {0}")]
    Decode(String),
    #[error("Text recognition error: {0}")]
    Recognition(String),
    #[error("Invalid request: {0}")]
    Request(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for KtpError {
    fn from(err: image::ImageError) -> Self {
        KtpError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_the_fault_text() {
        let err = KtpError::Recognition("Tesseract init error: no ind.traineddata".to_string());
        assert_eq!(
            err.to_string(),
            "Text recognition error: Tesseract init error: no ind.traineddata"
        );
    }

    #[test]
    fn test_image_error_maps_to_decode() {
        let err: KtpError = image::load_from_memory(b"not an image").unwrap_err().into();
        assert!(matches!(err, KtpError::Decode(_)));
    }
}
