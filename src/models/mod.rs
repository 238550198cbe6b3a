pub mod record;
pub mod response;

pub use record::{Field, FieldRecord};
pub use response::ExtractResponse;
