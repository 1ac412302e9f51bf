use serde::{Deserialize, Serialize};

use crate::domain::ClassificationResult;

pub const PREDICT_PATH: &str = "/predict";
pub const PING_PATH: &str = "/ping";
/// Multipart field the service reads the image from.
pub const UPLOAD_FIELD: &str = "file";

/// Body of a `/predict` response.
///
/// The service answers either `{"class", "confidence"}` or `{"error"}`, in
/// both cases usually with a 2xx status, so every field is optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    Classified(ClassificationResult),
    Reported(String),
    Malformed,
}

impl PredictResponse {
    pub fn success(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: Some(label.into()),
            confidence: Some(confidence),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// An empty `error` string does not count as an error indicator. A
    /// missing or null `class` is kept as an empty label, which presents as
    /// an undetermined status; only a missing `confidence` is malformed.
    pub fn into_outcome(self) -> PredictOutcome {
        if let Some(message) = self.error.filter(|m| !m.is_empty()) {
            return PredictOutcome::Reported(message);
        }
        match self.confidence {
            Some(confidence) => PredictOutcome::Classified(ClassificationResult {
                label: self.label.unwrap_or_default(),
                confidence,
            }),
            None => PredictOutcome::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_uses_class_key() {
        let body = serde_json::to_value(PredictResponse::success("Healthy", 0.87)).expect("json");
        assert_eq!(body, serde_json::json!({"class": "Healthy", "confidence": 0.87}));
    }

    #[test]
    fn error_field_wins_over_class() {
        let parsed: PredictResponse = serde_json::from_str(
            r#"{"class": "Healthy", "confidence": 0.5, "error": "model unavailable"}"#,
        )
        .expect("parse");
        assert_eq!(
            parsed.into_outcome(),
            PredictOutcome::Reported("model unavailable".to_string())
        );
    }

    #[test]
    fn empty_error_falls_through_to_classification() {
        let parsed: PredictResponse =
            serde_json::from_str(r#"{"class": "Late Blight", "confidence": 0.99, "error": ""}"#)
                .expect("parse");
        assert_eq!(
            parsed.into_outcome(),
            PredictOutcome::Classified(ClassificationResult::new("Late Blight", 0.99))
        );
    }

    #[test]
    fn missing_confidence_is_malformed() {
        let parsed: PredictResponse = serde_json::from_str(r#"{"class": "Healthy"}"#).expect("parse");
        assert_eq!(parsed.into_outcome(), PredictOutcome::Malformed);
    }

    #[test]
    fn null_or_missing_class_becomes_empty_label() {
        for body in [r#"{"class": null, "confidence": 0.5}"#, r#"{"confidence": 0.5}"#] {
            let parsed: PredictResponse = serde_json::from_str(body).expect("parse");
            assert_eq!(
                parsed.into_outcome(),
                PredictOutcome::Classified(ClassificationResult::new("", 0.5)),
                "{body}"
            );
        }
    }
}
