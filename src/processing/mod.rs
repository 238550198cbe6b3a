pub mod canonicalize;
pub mod extractors;
pub mod image;
pub mod ocr;

pub use canonicalize::TextCanonicalizer;
pub use extractors::FieldExtractor;
pub use image::ImageProcessor;
pub use ocr::{TesseractRecognizer, TextRecognizer};
