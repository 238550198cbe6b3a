use crate::models::FieldRecord;
use crate::utils::KtpError;
use serde::Serialize;

/// Envelope returned to callers of the reader, over HTTP or on the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status")]
pub enum ExtractResponse {
    Success { data: FieldRecord },
    Error { message: String },
}

impl ExtractResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractResponse::Success { .. })
    }
}

impl From<Result<FieldRecord, KtpError>> for ExtractResponse {
    fn from(result: Result<FieldRecord, KtpError>) -> Self {
        match result {
            Ok(data) => ExtractResponse::Success { data },
            Err(err) => ExtractResponse::Error {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Field;

    #[test]
    fn test_success_envelope() {
        let mut record = FieldRecord::new();
        record.set(Field::Nama, "BUDI SANTOSO");
        let response = ExtractResponse::from(Ok(record));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "Success");
        assert_eq!(value["data"]["Nama"], "BUDI SANTOSO");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_error_envelope() {
        let response = ExtractResponse::from(Err(KtpError::Decode("bad header".to_string())));
        assert!(!response.is_success());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "Error");
        assert_eq!(value["message"], "Image decode error: bad header");
        assert!(value.get("data").is_none());
    }
}
