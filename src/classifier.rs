//! Model invocation: the `Classifier` seam and its ONNX implementation.

use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use ndarray::Array2;
use tract_onnx::prelude::*;

use crate::error::ModelError;
use crate::models::{Disease, Label};

/// A pre-trained binary classifier over a fixed-length feature vector.
pub trait Classifier: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<Label, ModelError>;
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX graph with a `f32[1, n]` input whose first output is the class label.
pub struct OnnxClassifier {
    model: OnnxPlan,
    feature_count: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, feature_count: usize) -> Result<Self, ModelError> {
        let load_error = |e: TractError| ModelError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_error)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, feature_count)),
            )
            .map_err(load_error)?
            .into_optimized()
            .map_err(load_error)?
            .into_runnable()
            .map_err(load_error)?;

        Ok(Self {
            model,
            feature_count,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f32]) -> Result<Label, ModelError> {
        if features.len() != self.feature_count {
            return Err(ModelError::FeatureCount {
                expected: self.feature_count,
                actual: features.len(),
            });
        }

        let input = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| ModelError::Inference(e.to_string()))?
            .into_tensor();

        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = outputs
            .first()
            .ok_or_else(|| ModelError::Inference("model produced no outputs".to_string()))?;
        label_from_output(output)
    }
}

/// Reads the predicted label from a model's first output.
///
/// Accepts an `i64` label tensor (scikit-learn export), a single `f32`
/// score thresholded at 0.5, or `f32` per-class scores (argmax).
pub fn label_from_output(output: &Tensor) -> Result<Label, ModelError> {
    let raw = if output.datum_type() == i64::datum_type() {
        let view = output
            .to_array_view::<i64>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        *view
            .iter()
            .next()
            .ok_or_else(|| ModelError::Inference("empty label tensor".to_string()))?
    } else if output.datum_type() == f32::datum_type() {
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let scores: Vec<f32> = view.iter().copied().collect();
        match scores.as_slice() {
            [] => return Err(ModelError::Inference("empty score tensor".to_string())),
            [score] => i64::from(*score >= 0.5),
            _ => scores
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(index, _)| index as i64)
                .unwrap_or_default(),
        }
    } else {
        return Err(ModelError::Inference(format!(
            "unsupported output type {:?}",
            output.datum_type()
        )));
    };

    debug!("Raw model label: {raw}");
    Label::try_from(raw).map_err(ModelError::UnexpectedLabel)
}

pub const DIABETES_MODEL_FILE: &str = "diabetes_model.onnx";
pub const HEART_DISEASE_MODEL_FILE: &str = "heart_disease_model.onnx";
pub const PARKINSONS_MODEL_FILE: &str = "parkinsons_model.onnx";

/// One classifier per disease, loaded once and shared read-only.
pub struct ModelRegistry {
    diabetes: Box<dyn Classifier>,
    heart_disease: Box<dyn Classifier>,
    parkinsons: Box<dyn Classifier>,
}

impl ModelRegistry {
    pub fn new(
        diabetes: Box<dyn Classifier>,
        heart_disease: Box<dyn Classifier>,
        parkinsons: Box<dyn Classifier>,
    ) -> Self {
        Self {
            diabetes,
            heart_disease,
            parkinsons,
        }
    }

    /// Loads all three ONNX models from `dir`; any failure aborts the load.
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let load = |disease: Disease| -> Result<Box<dyn Classifier>, ModelError> {
            let path = dir.join(model_file(disease));
            let start = Instant::now();
            let classifier = OnnxClassifier::load(&path, disease.feature_count())?;
            info!(
                "Loaded {} model from {} in {:?}",
                disease,
                path.display(),
                start.elapsed()
            );
            Ok(Box::new(classifier))
        };

        Ok(Self::new(
            load(Disease::Diabetes)?,
            load(Disease::HeartDisease)?,
            load(Disease::Parkinsons)?,
        ))
    }

    pub fn classifier(&self, disease: Disease) -> &dyn Classifier {
        match disease {
            Disease::Diabetes => self.diabetes.as_ref(),
            Disease::HeartDisease => self.heart_disease.as_ref(),
            Disease::Parkinsons => self.parkinsons.as_ref(),
        }
    }

    pub fn available(&self) -> usize {
        Disease::ALL.len()
    }
}

pub fn model_file(disease: Disease) -> &'static str {
    match disease {
        Disease::Diabetes => DIABETES_MODEL_FILE,
        Disease::HeartDisease => HEART_DISEASE_MODEL_FILE,
        Disease::Parkinsons => PARKINSONS_MODEL_FILE,
    }
}
