use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DIABETES_FEATURES: [&str; 8] = [
    "pregnancies",
    "glucose",
    "blood_pressure",
    "skin_thickness",
    "insulin",
    "bmi",
    "diabetes_pedigree_function",
    "age",
];

const HEART_DISEASE_FEATURES: [&str; 13] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_bp",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_angina",
    "st_depression",
    "st_slope",
    "major_vessels",
    "thalassemia",
];

const PARKINSONS_FEATURES: [&str; 22] = [
    "fo",
    "fhi",
    "flo",
    "jitter_percent",
    "jitter_abs",
    "rap",
    "ppq",
    "ddp",
    "shimmer",
    "shimmer_db",
    "apq3",
    "apq5",
    "apq",
    "dda",
    "nhr",
    "hnr",
    "rpde",
    "dfa",
    "spread1",
    "spread2",
    "d2",
    "ppe",
];

/// The diseases a model is available for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Disease {
    Diabetes,
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    Parkinsons,
}

impl Disease {
    pub const ALL: [Disease; 3] = [Disease::Diabetes, Disease::HeartDisease, Disease::Parkinsons];

    pub fn label(&self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes",
            Disease::HeartDisease => "Heart Disease",
            Disease::Parkinsons => "Parkinsons",
        }
    }

    /// Feature names in the order the model expects them.
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            Disease::Diabetes => &DIABETES_FEATURES,
            Disease::HeartDisease => &HEART_DISEASE_FEATURES,
            Disease::Parkinsons => &PARKINSONS_FEATURES,
        }
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names().len()
    }

    /// Features copied into a record's `details` for quick display.
    pub fn detail_features(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Disease::Diabetes => &[("glucose", "glucose"), ("bmi", "bmi"), ("age", "age")],
            Disease::HeartDisease => &[
                ("age", "age"),
                ("blood_pressure", "resting_bp"),
                ("cholesterol", "cholesterol"),
            ],
            Disease::Parkinsons => &[
                ("fundamental_frequency", "fo"),
                ("jitter_percent", "jitter_percent"),
                ("shimmer", "shimmer"),
            ],
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown disease: {0}")]
pub struct UnknownDisease(pub String);

impl FromStr for Disease {
    type Err = UnknownDisease;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diabetes" => Ok(Disease::Diabetes),
            "heart disease" | "heart_disease" | "heart-disease" | "heartdisease" => {
                Ok(Disease::HeartDisease)
            }
            "parkinsons" | "parkinson's" => Ok(Disease::Parkinsons),
            _ => Err(UnknownDisease(s.to_string())),
        }
    }
}

/// Binary model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Zero,
    One,
}

impl TryFrom<i64> for Label {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Zero),
            1 => Ok(Label::One),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Positive,
    Negative,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Positive => "Positive",
            Outcome::Negative => "Negative",
        }
    }
}

impl From<Label> for Outcome {
    fn from(label: Label) -> Self {
        match label {
            Label::One => Outcome::Positive,
            Label::Zero => Outcome::Negative,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Positive" => Ok(Outcome::Positive),
            "Negative" => Ok(Outcome::Negative),
            other => Err(format!("unknown result: {other}")),
        }
    }
}

/// Named feature values kept on a record, in display order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Details(Vec<(&'static str, f64)>);

impl Details {
    pub fn new(entries: Vec<(&'static str, f64)>) -> Self {
        Self(entries)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, f64)> {
        self.0.iter()
    }
}

impl fmt::Display for Details {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        Ok(())
    }
}

impl Serialize for Details {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }
}

/// One completed assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub disease: Disease,
    pub result: Outcome,
    pub details: Details,
}

impl PredictionRecord {
    /// Stamps a record with the current local time, truncated to whole seconds.
    pub fn new(disease: Disease, result: Outcome, details: Details) -> Self {
        let now = Local::now().naive_local();
        let timestamp = now.with_nanosecond(0).unwrap_or(now);
        Self::at(timestamp, disease, result, details)
    }

    pub fn at(timestamp: NaiveDateTime, disease: Disease, result: Outcome, details: Details) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            disease,
            result,
            details,
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
