pub mod config;
pub mod ktp_reader;
pub mod models;
pub mod processing;
pub mod server;
pub mod utils;

pub use config::ReaderConfig;
pub use ktp_reader::KtpReader;
pub use models::{ExtractResponse, Field, FieldRecord};
pub use utils::KtpError;
