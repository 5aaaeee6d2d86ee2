use crate::fields::Field;
use crate::state::{AppState, ResultPanel};

pub const SUBMIT_LABEL: &str = "Predict Formation";
pub const BUSY_LABEL: &str = "Processing...";
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn submit_label(state: &AppState) -> String {
    if state.is_submitting() {
        let frame = SPINNER[state.spinner_frame % SPINNER.len()];
        format!("{frame} {BUSY_LABEL}")
    } else {
        SUBMIT_LABEL.to_string()
    }
}

pub fn field_title(field: Field) -> String {
    let bounds = field.bounds();
    format!(
        "{} [{}..{}]",
        field.label(),
        bounds.minimum,
        bounds.maximum
    )
}

pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) if value.is_finite() => format!("{value}%"),
        _ => "N/A".to_string(),
    }
}

pub fn result_text(panel: &ResultPanel) -> String {
    match panel {
        ResultPanel::Empty => "Fill in the match stats and press Enter to predict".to_string(),
        ResultPanel::Success {
            result,
            received_at,
        } => [
            "Predicted Formation".to_string(),
            String::new(),
            result.prediction.clone(),
            String::new(),
            format!(
                "Prediction confidence: {}",
                format_confidence(result.confidence)
            ),
            format!("Received {received_at}"),
        ]
        .join("\n"),
        ResultPanel::Failure { message } => format!("Error\n\n{message}"),
    }
}

pub fn console_text(state: &AppState, lines: usize) -> String {
    if state.logs.is_empty() {
        return "No activity yet".to_string();
    }
    let start = state.logs.len().saturating_sub(lines);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict_fetch::PredictionResult;
    use std::time::Instant;

    #[test]
    fn label_switches_while_busy() {
        let mut state = AppState::new();
        assert_eq!(submit_label(&state), SUBMIT_LABEL);
        state.begin_submit(Instant::now());
        assert!(submit_label(&state).ends_with(BUSY_LABEL));
    }

    #[test]
    fn confidence_formats() {
        assert_eq!(format_confidence(Some(87.0)), "87%");
        assert_eq!(format_confidence(Some(62.5)), "62.5%");
        assert_eq!(format_confidence(None), "N/A");
    }

    #[test]
    fn success_text_has_prediction_and_confidence() {
        let text = result_text(&ResultPanel::Success {
            result: PredictionResult {
                prediction: "3-5-2".to_string(),
                confidence: Some(71.0),
            },
            received_at: "12:00:00".to_string(),
        });
        assert!(text.contains("3-5-2"));
        assert!(text.contains("Prediction confidence: 71%"));
    }

    #[test]
    fn field_title_shows_bounds() {
        assert_eq!(field_title(Field::Possession), "Possession % [0..100]");
    }

    #[test]
    fn console_shows_tail() {
        let mut state = AppState::new();
        for i in 0..5 {
            state.push_log(format!("line {i}"));
        }
        let text = console_text(&state, 2);
        assert!(!text.contains("line 2"));
        assert!(text.contains("line 3"));
        assert!(text.contains("line 4"));
    }
}
