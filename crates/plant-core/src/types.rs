//! Core type definitions shared by the screen, the diagnoser and the front ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pixel in 8-bit HSV: hue in `0..=179` (degrees halved), saturation and
/// value in `0..=255`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive HSV box, same semantics as an `inRange` mask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HsvBand {
    /// Hue bounds `(low, high)`
    pub hue: (u8, u8),
    /// Saturation bounds `(low, high)`
    pub saturation: (u8, u8),
    /// Value bounds `(low, high)`
    pub value: (u8, u8),
}

impl HsvBand {
    pub fn new(hue: (u8, u8), saturation: (u8, u8), value: (u8, u8)) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Leaf green: hue 35..=85, saturation and value at least 40.
    pub fn green() -> Self {
        Self::new((35, 85), (40, 255), (40, 255))
    }

    /// Brown/yellow of dry or diseased tissue: hue 10..=30, saturation
    /// 50..=255, value 20..=200.
    pub fn brown() -> Self {
        Self::new((10, 30), (50, 255), (20, 200))
    }

    /// Whether `pixel` falls inside the band (all bounds inclusive).
    #[inline]
    pub fn contains(&self, pixel: Hsv) -> bool {
        (self.hue.0..=self.hue.1).contains(&pixel.h)
            && (self.saturation.0..=self.saturation.1).contains(&pixel.s)
            && (self.value.0..=self.value.1).contains(&pixel.v)
    }

    /// Checks that every range is ordered and the hue stays on the 0..=179 scale.
    pub fn validate(&self) -> Result<(), String> {
        let ranges = [
            ("hue", self.hue),
            ("saturation", self.saturation),
            ("value", self.value),
        ];
        for (name, (low, high)) in ranges {
            if low > high {
                return Err(format!("{name} range is inverted: {low} > {high}"));
            }
        }
        if self.hue.1 > 179 {
            return Err(format!("hue upper bound {} exceeds 179", self.hue.1));
        }
        Ok(())
    }
}

/// What the verdict was decided on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerdictBasis {
    /// Green/brown pixel fractions were measured
    ColorBands,
    /// The source has no colour channels (grayscale or palette) and is accepted unconditionally
    Grayscale,
}

impl std::fmt::Display for VerdictBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictBasis::ColorBands => write!(f, "color_bands"),
            VerdictBasis::Grayscale => write!(f, "grayscale"),
        }
    }
}

/// Plant-likeness verdict for a single image.
///
/// This is a colour heuristic, not a disease diagnosis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlantVerdict {
    /// Whether the image plausibly shows plant material
    pub is_plant: bool,
    /// How the decision was reached
    pub basis: VerdictBasis,
    /// Fraction of pixels in the green band (0 for grayscale input)
    pub green_ratio: f64,
    /// Fraction of pixels in the brown/yellow band (0 for grayscale input)
    pub brown_ratio: f64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Represents a plant class/category a diagnoser can report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PlantClass {
    /// Unique identifier for the class
    pub id: usize,
    /// Human-readable name (e.g., "Apple Scab")
    pub name: String,
    /// Crop the condition affects, if specific to one
    pub crop: Option<String>,
    /// Whether this class means "no disease"
    pub healthy: bool,
}

impl PlantClass {
    /// Creates a disease class for a crop
    pub fn disease(id: usize, name: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            crop: Some(crop.into()),
            healthy: false,
        }
    }

    /// Creates the healthy class
    pub fn healthy(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            crop: None,
            healthy: true,
        }
    }
}

/// A single ranked label with its confidence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub class_id: usize,
    pub label: String,
    pub confidence: f64,
}

/// Ranked diagnosis for one image.
///
/// `ranked` is sorted by descending confidence and `primary` is its first
/// entry. When `placeholder` is set the confidences were drawn at random and
/// say nothing about the image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnosis {
    pub primary: Prediction,
    pub ranked: Vec<Prediction>,
    /// Name of the diagnoser that produced this result
    pub source: String,
    pub placeholder: bool,
}

/// Plain-text guidance derived from a diagnosis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advice {
    /// One-paragraph summary
    pub summary: String,
    /// Recommended actions, in order
    pub actions: Vec<String>,
}

/// Result of one scan request.
///
/// Returned to the caller by value; nothing is kept after the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub verdict: PlantVerdict,
    /// Present only when the verdict says plant
    pub diagnosis: Option<Diagnosis>,
    pub advice: Option<Advice>,
    /// Headline message for display
    pub message: String,
}

impl ScanReport {
    /// Report for an image the screen rejected
    pub fn rejected(verdict: PlantVerdict) -> Self {
        Self {
            id: Uuid::new_v4(),
            scanned_at: Utc::now(),
            verdict,
            diagnosis: None,
            advice: None,
            message: "Non-plant specimen detected. Please upload plant material.".to_string(),
        }
    }

    /// Report for an accepted image with its diagnosis
    pub fn diagnosed(verdict: PlantVerdict, diagnosis: Diagnosis, advice: Advice) -> Self {
        let message = format!(
            "{} ({:.0}% confidence)",
            diagnosis.primary.label,
            diagnosis.primary.confidence * 100.0
        );
        Self {
            id: Uuid::new_v4(),
            scanned_at: Utc::now(),
            verdict,
            diagnosis: Some(diagnosis),
            advice: Some(advice),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(is_plant: bool) -> PlantVerdict {
        PlantVerdict {
            is_plant,
            basis: VerdictBasis::ColorBands,
            green_ratio: 0.5,
            brown_ratio: 0.0,
            width: 4,
            height: 4,
        }
    }

    #[test]
    fn test_band_bounds_are_inclusive() {
        let green = HsvBand::green();
        assert!(green.contains(Hsv::new(35, 40, 40)));
        assert!(green.contains(Hsv::new(85, 255, 255)));
        assert!(!green.contains(Hsv::new(34, 255, 255)));
        assert!(!green.contains(Hsv::new(86, 255, 255)));
        assert!(!green.contains(Hsv::new(60, 39, 255)));
        assert!(!green.contains(Hsv::new(60, 255, 39)));
    }

    #[test]
    fn test_brown_band_caps_value() {
        let brown = HsvBand::brown();
        assert!(brown.contains(Hsv::new(15, 170, 150)));
        assert!(brown.contains(Hsv::new(10, 50, 20)));
        assert!(!brown.contains(Hsv::new(15, 170, 201)));
        assert!(!brown.contains(Hsv::new(15, 49, 150)));
    }

    #[test]
    fn test_band_validation() {
        assert!(HsvBand::green().validate().is_ok());
        assert!(HsvBand::new((90, 30), (0, 255), (0, 255)).validate().is_err());
        assert!(HsvBand::new((0, 180), (0, 255), (0, 255)).validate().is_err());
    }

    #[test]
    fn test_verdict_basis_display() {
        assert_eq!(VerdictBasis::ColorBands.to_string(), "color_bands");
        assert_eq!(VerdictBasis::Grayscale.to_string(), "grayscale");
    }

    #[test]
    fn test_plant_class_constructors() {
        let scab = PlantClass::disease(0, "Apple Scab", "Apple");
        assert!(!scab.healthy);
        assert_eq!(scab.crop.as_deref(), Some("Apple"));

        let healthy = PlantClass::healthy(5, "Healthy Plant");
        assert!(healthy.healthy);
        assert!(healthy.crop.is_none());
    }

    #[test]
    fn test_rejected_report_has_no_diagnosis() {
        let report = ScanReport::rejected(verdict(false));
        assert!(report.diagnosis.is_none());
        assert!(report.advice.is_none());
        assert!(report.message.contains("Non-plant"));
    }

    #[test]
    fn test_diagnosed_report_message() {
        let primary = Prediction {
            class_id: 1,
            label: "Tomato Early Blight".to_string(),
            confidence: 0.82,
        };
        let diagnosis = Diagnosis {
            primary: primary.clone(),
            ranked: vec![primary],
            source: "test".to_string(),
            placeholder: true,
        };
        let advice = Advice {
            summary: "s".to_string(),
            actions: Vec::new(),
        };
        let report = ScanReport::diagnosed(verdict(true), diagnosis, advice);
        assert_eq!(report.message, "Tomato Early Blight (82% confidence)");
        assert!(report.diagnosis.is_some());
    }

    #[test]
    fn test_verdict_serializes_basis_snake_case() {
        let json = serde_json::to_string(&verdict(true)).unwrap();
        assert!(json.contains("\"basis\":\"color_bands\""));
    }
}
