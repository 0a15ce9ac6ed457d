//! Plain-text care advice for a diagnosis.

use plant_core::{Advice, Diagnosis};

use crate::catalog::DiseaseCatalog;

/// Above this confidence a disease is reported as detected rather than possible
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Builds the summary and action list for the primary prediction.
pub fn advise(diagnosis: &Diagnosis, catalog: &DiseaseCatalog) -> Advice {
    let primary = &diagnosis.primary;
    let percent = format!("{:.0}%", primary.confidence * 100.0);

    if catalog.is_healthy(primary.class_id) {
        return Advice {
            summary: format!(
                "Excellent news! Analysis shows a healthy plant with {percent} confidence. \
                 Continue regular care."
            ),
            actions: to_strings(&[
                "Keep watering at the base of the plant",
                "Ensure adequate sunlight",
                "Fertilize monthly",
            ]),
        };
    }

    if primary.confidence > HIGH_CONFIDENCE {
        Advice {
            summary: format!(
                "High confidence detection of {} with {percent} certainty. \
                 Immediate treatment required.",
                primary.label
            ),
            actions: to_strings(&[
                "Apply a targeted fungicide",
                "Remove affected leaves",
                "Improve air circulation",
                "Avoid watering leaves directly",
                "Monitor daily for recovery",
            ]),
        }
    } else {
        Advice {
            summary: format!(
                "Possible {} detected with {percent} confidence.",
                primary.label
            ),
            actions: to_strings(&[
                "Apply a preventive fungicide",
                "Inspect the plant closely",
                "Remove any suspicious leaves",
                "Consult an agricultural expert for confirmation",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_core::Prediction;

    fn diagnosis(class_id: usize, label: &str, confidence: f64) -> Diagnosis {
        let primary = Prediction {
            class_id,
            label: label.to_string(),
            confidence,
        };
        Diagnosis {
            primary: primary.clone(),
            ranked: vec![primary],
            source: "test".to_string(),
            placeholder: true,
        }
    }

    #[test]
    fn test_healthy_advice() {
        let advice = advise(&diagnosis(5, "Healthy Plant", 0.64), &DiseaseCatalog::default());
        assert!(advice.summary.starts_with("Excellent news!"));
        assert!(advice.summary.contains("64%"));
        assert_eq!(advice.actions.len(), 3);
    }

    #[test]
    fn test_high_confidence_disease() {
        let advice = advise(
            &diagnosis(3, "Potato Late Blight", 0.91),
            &DiseaseCatalog::default(),
        );
        assert!(advice.summary.contains("High confidence detection of Potato Late Blight"));
        assert!(advice.summary.contains("91%"));
        assert!(advice.actions.iter().any(|a| a.contains("Monitor daily")));
    }

    #[test]
    fn test_boundary_confidence_is_possible() {
        let advice = advise(&diagnosis(0, "Apple Scab", 0.8), &DiseaseCatalog::default());
        assert!(advice.summary.starts_with("Possible Apple Scab"));
        assert!(advice.actions.iter().any(|a| a.contains("agricultural expert")));
    }
}
