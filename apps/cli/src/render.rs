use client_core::{
    presenter::{self, known_conditions},
    SessionState,
};
use serde::Serialize;

const BAR_CELLS: usize = 20;

#[derive(Debug, Serialize)]
pub struct ResultView<'a> {
    #[serde(rename = "class")]
    pub label: &'a str,
    pub confidence: f64,
    pub confidence_percent: i64,
    pub color: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StateView<'a> {
    Empty,
    Ready { file: &'a str },
    Submitting { file: &'a str },
    Succeeded { file: &'a str, result: ResultView<'a> },
    Failed { file: &'a str, error: String },
}

pub fn view(state: &SessionState) -> StateView<'_> {
    match state {
        SessionState::Empty => StateView::Empty,
        SessionState::Ready(file) => StateView::Ready { file: file.name() },
        SessionState::Submitting(file) => StateView::Submitting { file: file.name() },
        SessionState::Succeeded(file, result) => {
            let descriptor = presenter::describe(&result.label);
            StateView::Succeeded {
                file: file.name(),
                result: ResultView {
                    label: &result.label,
                    confidence: result.confidence,
                    confidence_percent: presenter::confidence_percent(result.confidence),
                    color: descriptor.color,
                    icon: descriptor.icon,
                    description: descriptor.description,
                },
            }
        }
        SessionState::Failed(file, error) => StateView::Failed {
            file: file.name(),
            error: error.to_string(),
        },
    }
}

/// Bar cells are clamped for drawing only; the percentage shown next to it
/// is the raw value.
fn confidence_bar(confidence: f64) -> String {
    let width = presenter::confidence_bar_width(confidence).clamp(0.0, 100.0);
    let filled = ((width / 100.0) * BAR_CELLS as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_CELLS - filled))
}

pub fn render_text(state: &SessionState) -> String {
    match view(state) {
        StateView::Empty => "No image selected".to_string(),
        StateView::Ready { file } => format!("Ready to analyze {file}"),
        StateView::Submitting { file } => format!("Analyzing {file}..."),
        StateView::Failed { error, .. } => format!("⚠️ {error}"),
        StateView::Succeeded { result, .. } => format!(
            "Analysis Results\n{} {} ({}% Confidence)\n{}\n{}",
            result.icon,
            if result.label.is_empty() { "Unknown" } else { result.label },
            result.confidence_percent,
            confidence_bar(result.confidence),
            result.description
        ),
    }
}

pub fn render_guide() -> String {
    let mut out = String::from("About Potato Diseases\n");
    for condition in known_conditions() {
        out.push_str(&format!("\n{} {}\n  {}\n", condition.marker, condition.label, condition.summary));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{validate, CandidateFile};
    use shared::{domain::ClassificationResult, error::ClassifyError};

    fn leaf() -> client_core::SelectedFile {
        validate(CandidateFile::new("leaf.jpg", Some("image/jpeg".into()), vec![1, 2, 3]))
            .expect("valid")
    }

    #[test]
    fn success_text_shows_icon_percent_and_guidance() {
        let state = SessionState::Succeeded(leaf(), ClassificationResult::new("Early Blight", 0.734));
        let text = render_text(&state);
        assert!(text.contains("⚠️ Early Blight (73% Confidence)"), "{text}");
        assert!(text.contains("[###############.....]"), "{text}");
        assert!(text.contains("Early blight detected."), "{text}");
    }

    #[test]
    fn unknown_label_renders_fallback() {
        let state = SessionState::Succeeded(leaf(), ClassificationResult::new("Rust Mite", 0.4));
        let text = render_text(&state);
        assert!(text.contains("❓ Rust Mite (40% Confidence)"), "{text}");
        assert!(text.contains("Unable to determine disease status"), "{text}");
    }

    #[test]
    fn empty_label_renders_as_unknown_with_fallback() {
        let state = SessionState::Succeeded(leaf(), ClassificationResult::new("", 0.5));
        let text = render_text(&state);
        assert!(text.contains("❓ Unknown (50% Confidence)"), "{text}");
        assert!(text.contains("Unable to determine disease status"), "{text}");
    }

    #[test]
    fn out_of_range_confidence_is_shown_verbatim() {
        let state = SessionState::Succeeded(leaf(), ClassificationResult::new("Healthy", 1.5));
        let text = render_text(&state);
        assert!(text.contains("(150% Confidence)"), "{text}");
        assert!(text.contains(&format!("[{}]", "#".repeat(20))), "{text}");
    }

    #[test]
    fn failure_text_is_the_error_message() {
        let state = SessionState::Failed(leaf(), ClassifyError::ServiceStatus { status: 404 });
        assert_eq!(render_text(&state), "⚠️ Server error: 404");
    }

    #[test]
    fn json_view_uses_wire_label_key() {
        let state = SessionState::Succeeded(leaf(), ClassificationResult::new("Healthy", 0.87));
        let value = serde_json::to_value(view(&state)).expect("json");
        assert_eq!(value["status"], "succeeded");
        assert_eq!(value["file"], "leaf.jpg");
        assert_eq!(value["result"]["class"], "Healthy");
        assert_eq!(value["result"]["confidence_percent"], 87);
        assert_eq!(value["result"]["color"], "#10b981");
    }

    #[test]
    fn guide_lists_every_known_condition() {
        let guide = render_guide();
        for label in ["Healthy", "Early Blight", "Late Blight"] {
            assert!(guide.contains(label), "{guide}");
        }
    }
}
