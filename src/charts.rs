//! Chart data and verdict text for the dashboard pages.

use chrono::NaiveDateTime;
use log::warn;
use serde::Serialize;

use crate::models::{Disease, Outcome, TIMESTAMP_FORMAT};

/// Upper bounds used to normalise the heart radar axes.
const HEART_AXIS_MAX: [f64; 3] = [200.0, 600.0, 250.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolarChart {
    pub title: &'static str,
    pub categories: Vec<&'static str>,
    pub values: Vec<f64>,
    /// `None` when the values give no usable radial range.
    pub range: Option<[f64; 2]>,
}

pub fn heart_metrics(resting_bp: f64, cholesterol: f64, max_heart_rate: f64) -> PolarChart {
    let values = [resting_bp, cholesterol, max_heart_rate]
        .iter()
        .zip(HEART_AXIS_MAX)
        .map(|(value, max)| value / max)
        .collect();

    PolarChart {
        title: "Key Metrics Visualization",
        categories: vec!["Blood Pressure", "Cholesterol", "Heart Rate"],
        values,
        range: Some([0.0, 1.0]),
    }
}

pub fn voice_metrics(jitter: f64, shimmer: f64, hnr: f64, rpde: f64, dfa: f64) -> PolarChart {
    let values = vec![jitter, shimmer, hnr, rpde, dfa];
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max.is_finite() && max > 0.0 {
        Some([0.0, max])
    } else {
        warn!("Voice metrics have no positive maximum ({max}), leaving radial range unset");
        None
    };

    PolarChart {
        title: "Voice Analysis Metrics",
        categories: vec!["Jitter", "Shimmer", "HNR", "RPDE", "DFA"],
        values,
        range,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub disease: Disease,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelinePoint {
    pub timestamp: String,
    pub disease: Disease,
    /// 1 for a positive result, 0 for a negative one.
    pub value: u8,
}

impl TimelinePoint {
    pub fn new(timestamp: NaiveDateTime, disease: Disease, result: Outcome) -> Self {
        Self {
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            disease,
            value: match result {
                Outcome::Positive => 1,
                Outcome::Negative => 0,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub headline: &'static str,
    pub heading: &'static str,
    pub recommendations: [&'static str; 4],
}

pub fn verdict(disease: Disease, outcome: Outcome) -> Verdict {
    match (disease, outcome) {
        (Disease::Diabetes, Outcome::Positive) => Verdict {
            headline: "High Risk: Diabetes indicators detected",
            heading: "Recommended Actions",
            recommendations: [
                "Schedule an appointment with an endocrinologist",
                "Monitor blood glucose levels regularly",
                "Review diet and exercise habits",
                "Consider diabetes screening tests",
            ],
        },
        (Disease::Diabetes, Outcome::Negative) => Verdict {
            headline: "Low Risk: No diabetes indicators detected",
            heading: "Preventive Measures",
            recommendations: [
                "Maintain a healthy diet",
                "Regular exercise",
                "Annual health check-ups",
                "Monitor blood sugar levels",
            ],
        },
        (Disease::HeartDisease, Outcome::Positive) => Verdict {
            headline: "High Risk: Heart disease indicators detected",
            heading: "Recommended Actions",
            recommendations: [
                "Consult a cardiologist immediately",
                "Regular blood pressure monitoring",
                "Cholesterol management",
                "Lifestyle modifications",
            ],
        },
        (Disease::HeartDisease, Outcome::Negative) => Verdict {
            headline: "Low Risk: No heart disease indicators detected",
            heading: "Preventive Measures",
            recommendations: [
                "Regular exercise",
                "Heart-healthy diet",
                "Stress management",
                "Regular check-ups",
            ],
        },
        (Disease::Parkinsons, Outcome::Positive) => Verdict {
            headline: "Warning: Parkinson's disease indicators detected",
            heading: "Recommended Actions",
            recommendations: [
                "Consult a neurologist",
                "Schedule a comprehensive neurological examination",
                "Consider additional diagnostic tests",
                "Begin monitoring symptoms systematically",
            ],
        },
        (Disease::Parkinsons, Outcome::Negative) => Verdict {
            headline: "No significant Parkinson's disease indicators detected",
            heading: "Preventive Measures",
            recommendations: [
                "Regular exercise",
                "Balanced diet",
                "Regular check-ups",
                "Monitor for any changes in movement or speech",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heart_metrics_are_normalised() {
        let chart = heart_metrics(100.0, 300.0, 125.0);
        assert_eq!(chart.values, vec![0.5, 0.5, 0.5]);
        assert_eq!(chart.range, Some([0.0, 1.0]));
    }

    #[test]
    fn voice_range_follows_largest_value() {
        let chart = voice_metrics(0.5, 0.04, 21.0, 0.4, 0.8);
        assert_eq!(chart.range, Some([0.0, 21.0]));
    }

    #[test]
    fn voice_range_unset_without_positive_values() {
        assert_eq!(voice_metrics(0.0, 0.0, 0.0, 0.0, 0.0).range, None);
        assert_eq!(voice_metrics(-1.0, -2.0, -0.5, -3.0, -4.0).range, None);
    }

    #[test]
    fn every_verdict_has_recommendations() {
        for disease in Disease::ALL {
            for outcome in [Outcome::Positive, Outcome::Negative] {
                let v = verdict(disease, outcome);
                assert!(v.recommendations.iter().all(|r| !r.is_empty()));
            }
        }
    }
}
