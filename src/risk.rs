//! Display-only risk-factor flags.
//!
//! Evaluated against the submitted inputs after prediction; they never
//! influence the model's verdict.

use serde::Serialize;

use crate::forms::AssessmentForm;
use crate::models::Disease;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Above,
    Below,
}

impl Comparison {
    fn holds(self, value: f64, limit: f64) -> bool {
        match self {
            Comparison::Above => value > limit,
            Comparison::Below => value < limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub feature: &'static str,
    pub label: &'static str,
    pub limit: f64,
    pub comparison: Comparison,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFlag {
    pub factor: &'static str,
    pub value: f64,
    pub limit: f64,
    pub comparison: Comparison,
    pub unit: &'static str,
}

impl RiskFlag {
    /// Banner text, e.g. `High Glucose: 190 mg/dL`.
    pub fn message(&self) -> String {
        format!("{}: {} {}", self.factor, self.value, self.unit)
    }
}

const DIABETES_THRESHOLDS: [Threshold; 3] = [
    Threshold {
        feature: "glucose",
        label: "High Glucose",
        limit: 140.0,
        comparison: Comparison::Above,
        unit: "mg/dL",
    },
    Threshold {
        feature: "bmi",
        label: "High BMI",
        limit: 30.0,
        comparison: Comparison::Above,
        unit: "kg/m²",
    },
    Threshold {
        feature: "blood_pressure",
        label: "High Blood Pressure",
        limit: 140.0,
        comparison: Comparison::Above,
        unit: "mm Hg",
    },
];

const HEART_DISEASE_THRESHOLDS: [Threshold; 2] = [
    Threshold {
        feature: "resting_bp",
        label: "High Blood Pressure",
        limit: 140.0,
        comparison: Comparison::Above,
        unit: "mm Hg",
    },
    Threshold {
        feature: "cholesterol",
        label: "High Cholesterol",
        limit: 240.0,
        comparison: Comparison::Above,
        unit: "mg/dL",
    },
];

const PARKINSONS_THRESHOLDS: [Threshold; 3] = [
    Threshold {
        feature: "jitter_percent",
        label: "Elevated Jitter",
        limit: 1.04,
        comparison: Comparison::Above,
        unit: "%",
    },
    Threshold {
        feature: "shimmer",
        label: "Elevated Shimmer",
        limit: 0.0381,
        comparison: Comparison::Above,
        unit: "",
    },
    Threshold {
        feature: "hnr",
        label: "Low Harmonic-to-Noise Ratio",
        limit: 20.0,
        comparison: Comparison::Below,
        unit: "dB",
    },
];

pub fn thresholds(disease: Disease) -> &'static [Threshold] {
    match disease {
        Disease::Diabetes => &DIABETES_THRESHOLDS,
        Disease::HeartDisease => &HEART_DISEASE_THRESHOLDS,
        Disease::Parkinsons => &PARKINSONS_THRESHOLDS,
    }
}

/// Applies the disease's table to values looked up by feature name.
pub fn evaluate<L>(disease: Disease, lookup: L) -> Vec<RiskFlag>
where
    L: Fn(&str) -> Option<f64>,
{
    thresholds(disease)
        .iter()
        .filter_map(|threshold| {
            let value = lookup(threshold.feature)?;
            threshold
                .comparison
                .holds(value, threshold.limit)
                .then(|| RiskFlag {
                    factor: threshold.label,
                    value,
                    limit: threshold.limit,
                    comparison: threshold.comparison,
                    unit: threshold.unit,
                })
        })
        .collect()
}

pub fn flags_for<F: AssessmentForm>(form: &F) -> Vec<RiskFlag> {
    evaluate(F::DISEASE, |feature| form.value(feature))
}
