//! Typed assessment inputs, one per disease.
//!
//! Each form validates its own ranges and lays its values out in the fixed
//! feature order of the matching model.

use serde::{Deserialize, Serialize};

use crate::charts::{self, PolarChart};
use crate::error::ValidationError;
use crate::models::{Details, Disease, Outcome};

pub trait AssessmentForm {
    const DISEASE: Disease;

    /// Rejects values outside the declared input ranges.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Values in `Self::DISEASE.feature_names()` order.
    fn feature_vector(&self) -> Vec<f64>;

    /// Chart shown alongside the verdict, if the page has one.
    fn chart(&self, _outcome: Outcome) -> Option<PolarChart> {
        None
    }

    fn value(&self, feature: &str) -> Option<f64> {
        Self::DISEASE
            .feature_names()
            .iter()
            .position(|name| *name == feature)
            .and_then(|i| self.feature_vector().get(i).copied())
    }

    fn details(&self) -> Details {
        let values = self.feature_vector();
        let names = Self::DISEASE.feature_names();
        let entries = Self::DISEASE
            .detail_features()
            .iter()
            .filter_map(|(label, source)| {
                names
                    .iter()
                    .position(|name| name == source)
                    .map(|i| (*label, values[i]))
            })
            .collect();
        Details::new(entries)
    }

    fn model_input(&self) -> Vec<f32> {
        self.feature_vector().into_iter().map(|v| v as f32).collect()
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Select-box style inputs carried as their numeric code.
macro_rules! coded_option {
    ($name:ident, $field:literal, { $($variant:ident = $code:literal => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn description(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ValidationError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok($name::$variant),)+
                    _ => Err(ValidationError::UnknownCode { field: $field, code }),
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }
    };
}

coded_option!(Sex, "sex", {
    Female = 0 => "Female",
    Male = 1 => "Male",
});

coded_option!(YesNo, "yes/no", {
    No = 0 => "No",
    Yes = 1 => "Yes",
});

coded_option!(ChestPain, "chest_pain_type", {
    TypicalAngina = 0 => "Typical Angina",
    AtypicalAngina = 1 => "Atypical Angina",
    NonAnginalPain = 2 => "Non-anginal Pain",
    Asymptomatic = 3 => "Asymptomatic",
});

coded_option!(RestingEcg, "resting_ecg", {
    Normal = 0 => "Normal",
    StTWaveAbnormality = 1 => "ST-T Wave Abnormality",
    LeftVentricularHypertrophy = 2 => "Left Ventricular Hypertrophy",
});

coded_option!(StSlope, "st_slope", {
    Upsloping = 0 => "Upsloping",
    Flat = 1 => "Flat",
    Downsloping = 2 => "Downsloping",
});

coded_option!(Thalassemia, "thalassemia", {
    Normal = 0 => "Normal",
    FixedDefect = 1 => "Fixed Defect",
    ReversibleDefect = 2 => "Reversible Defect",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiabetesForm {
    pub pregnancies: u32,
    /// mg/dL
    pub glucose: u32,
    /// mm Hg
    pub blood_pressure: u32,
    /// mm
    pub skin_thickness: u32,
    /// mu U/mL
    pub insulin: u32,
    pub bmi: f64,
    pub diabetes_pedigree_function: f64,
    pub age: u32,
}

impl AssessmentForm for DiabetesForm {
    const DISEASE: Disease = Disease::Diabetes;

    fn validate(&self) -> Result<(), ValidationError> {
        check_range("pregnancies", self.pregnancies.into(), 0.0, 20.0)?;
        check_range("glucose", self.glucose.into(), 0.0, 300.0)?;
        check_range("blood_pressure", self.blood_pressure.into(), 0.0, 200.0)?;
        check_range("skin_thickness", self.skin_thickness.into(), 0.0, 100.0)?;
        check_range("insulin", self.insulin.into(), 0.0, 900.0)?;
        check_range("bmi", self.bmi, 0.0, 70.0)?;
        check_range("diabetes_pedigree_function", self.diabetes_pedigree_function, 0.0, 3.0)?;
        check_range("age", self.age.into(), 0.0, 120.0)
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.pregnancies.into(),
            self.glucose.into(),
            self.blood_pressure.into(),
            self.skin_thickness.into(),
            self.insulin.into(),
            self.bmi,
            self.diabetes_pedigree_function,
            self.age.into(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartDiseaseForm {
    pub age: u32,
    pub sex: Sex,
    pub chest_pain_type: ChestPain,
    /// mm Hg
    pub resting_bp: u32,
    /// mg/dL
    pub cholesterol: u32,
    /// Fasting blood sugar above 120 mg/dL.
    pub fasting_blood_sugar: YesNo,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u32,
    pub exercise_angina: YesNo,
    pub st_depression: f64,
    pub st_slope: StSlope,
    pub major_vessels: u32,
    pub thalassemia: Thalassemia,
}

impl AssessmentForm for HeartDiseaseForm {
    const DISEASE: Disease = Disease::HeartDisease;

    fn validate(&self) -> Result<(), ValidationError> {
        check_range("age", self.age.into(), 0.0, 120.0)?;
        check_range("resting_bp", self.resting_bp.into(), 0.0, 200.0)?;
        check_range("cholesterol", self.cholesterol.into(), 0.0, 600.0)?;
        check_range("max_heart_rate", self.max_heart_rate.into(), 0.0, 250.0)?;
        check_range("st_depression", self.st_depression, 0.0, 10.0)?;
        check_range("major_vessels", self.major_vessels.into(), 0.0, 4.0)
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.age.into(),
            self.sex.code().into(),
            self.chest_pain_type.code().into(),
            self.resting_bp.into(),
            self.cholesterol.into(),
            self.fasting_blood_sugar.code().into(),
            self.resting_ecg.code().into(),
            self.max_heart_rate.into(),
            self.exercise_angina.code().into(),
            self.st_depression,
            self.st_slope.code().into(),
            self.major_vessels.into(),
            self.thalassemia.code().into(),
        ]
    }

    fn chart(&self, _outcome: Outcome) -> Option<PolarChart> {
        Some(charts::heart_metrics(
            self.resting_bp.into(),
            self.cholesterol.into(),
            self.max_heart_rate.into(),
        ))
    }
}

/// Voice measurements, named after the MDVP/Shimmer columns of the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkinsonsForm {
    /// Average vocal fundamental frequency (Hz).
    pub fo: f64,
    /// Maximum vocal fundamental frequency (Hz).
    pub fhi: f64,
    /// Minimum vocal fundamental frequency (Hz).
    pub flo: f64,
    pub jitter_percent: f64,
    pub jitter_abs: f64,
    pub rap: f64,
    pub ppq: f64,
    pub ddp: f64,
    pub shimmer: f64,
    pub shimmer_db: f64,
    pub apq3: f64,
    pub apq5: f64,
    pub apq: f64,
    pub dda: f64,
    pub nhr: f64,
    pub hnr: f64,
    pub rpde: f64,
    pub dfa: f64,
    pub spread1: f64,
    pub spread2: f64,
    pub d2: f64,
    pub ppe: f64,
}

impl AssessmentForm for ParkinsonsForm {
    const DISEASE: Disease = Disease::Parkinsons;

    fn validate(&self) -> Result<(), ValidationError> {
        let names = Self::DISEASE.feature_names();
        for (field, value) in names.iter().zip(self.feature_vector()) {
            if !value.is_finite() {
                return Err(ValidationError::NotFinite { field: *field });
            }
        }
        Ok(())
    }

    fn feature_vector(&self) -> Vec<f64> {
        vec![
            self.fo,
            self.fhi,
            self.flo,
            self.jitter_percent,
            self.jitter_abs,
            self.rap,
            self.ppq,
            self.ddp,
            self.shimmer,
            self.shimmer_db,
            self.apq3,
            self.apq5,
            self.apq,
            self.dda,
            self.nhr,
            self.hnr,
            self.rpde,
            self.dfa,
            self.spread1,
            self.spread2,
            self.d2,
            self.ppe,
        ]
    }

    fn chart(&self, outcome: Outcome) -> Option<PolarChart> {
        match outcome {
            Outcome::Positive => Some(charts::voice_metrics(
                self.jitter_percent,
                self.shimmer,
                self.hnr,
                self.rpde,
                self.dfa,
            )),
            Outcome::Negative => None,
        }
    }
}
