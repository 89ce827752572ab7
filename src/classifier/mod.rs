//! Crop pest/disease classifier
//!
//! ## Responsibilities
//!
//! - Load the ONNX model artifact and class index once at startup
//! - Preprocess one image, run one forward pass
//! - Return the top-3 (class name, probability) pairs, descending
//!
//! The model handle is owned by the caller and reused across requests;
//! classification itself is a pure function of (model, class index, image).

mod class_index;
mod preprocess;

pub use class_index::ClassIndex;
pub use preprocess::{to_input_tensor, IMAGENET_MEAN, IMAGENET_STD, INPUT_SIZE};

use std::path::Path;

use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{Error, Result};

/// Number of predictions returned per image
pub const TOP_K: usize = 3;

/// One ranked prediction
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Human-readable class name from the class index
    pub class_name: String,
    /// Probability formatted with exactly 2 decimal digits
    pub confidence: String,
}

/// Classifier instance holding the loaded model and class index
#[derive(Debug)]
pub struct Classifier {
    session: Mutex<Session>,
    class_index: ClassIndex,
}

impl Classifier {
    /// Load the model artifact and class index.
    ///
    /// With `cuda` enabled the CUDA execution provider is registered first
    /// and ort falls back to CPU when no device is available; device choice
    /// never changes the output, only performance.
    pub fn load(model_path: &Path, class_names_path: &Path, cuda: bool) -> Result<Self> {
        if !model_path.exists() {
            return Err(Error::ResourceNotFound(format!(
                "model artifact {}",
                model_path.display()
            )));
        }

        let class_index = ClassIndex::load(class_names_path)?;

        let providers = if cuda {
            vec![
                CUDAExecutionProvider::default().build(),
                CPUExecutionProvider::default().build(),
            ]
        } else {
            vec![CPUExecutionProvider::default().build()]
        };

        let session = SessionBuilder::new()?
            .with_execution_providers(providers)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;

        let classifier = Self {
            session: Mutex::new(session),
            class_index,
        };

        tracing::info!(
            model = %model_path.display(),
            classes = classifier.num_classes(),
            cuda = cuda,
            "Classifier loaded"
        );

        Ok(classifier)
    }

    /// Number of classes in the loaded index
    pub fn num_classes(&self) -> usize {
        self.class_index.len()
    }

    /// Classify one image file, returning the top-3 predictions.
    ///
    /// Fails atomically: any error leaves no partial result.
    pub async fn classify_file(&self, image_path: &Path) -> Result<Vec<Prediction>> {
        let image = decode_image(image_path)?;
        let tensor = to_input_tensor(&image);

        let scores: Vec<f32> = {
            let session = self.session.lock().await;
            let outputs = session.run(ort::inputs![tensor.view().into_dyn()]?)?;
            let (_name, value) = outputs
                .iter()
                .next()
                .ok_or_else(|| Error::Internal("model produced no outputs".to_string()))?;
            let logits = value.try_extract_tensor::<f32>()?;
            logits.iter().copied().collect()
        };

        top_k(&scores, &self.class_index, TOP_K)
    }
}

/// Open and decode one image file.
///
/// A path that cannot be read is `ResourceNotFound`; bytes that read fine
/// but are not a supported image format are `Decode`.
fn decode_image(path: &Path) -> Result<image::DynamicImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::ResourceNotFound(format!("image {}: {}", path.display(), e)))?;

    image::load_from_memory(&bytes)
        .map_err(|e| Error::Decode(format!("{}: {}", path.display(), e)))
}

/// Softmax over raw class scores
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exp.iter().sum();
    exp.into_iter().map(|v| v / sum).collect()
}

/// Assemble the k highest-probability predictions, descending.
///
/// Ties keep ascending class-id order (stable sort); exact-tie order is
/// not part of the contract.
pub fn top_k(scores: &[f32], index: &ClassIndex, k: usize) -> Result<Vec<Prediction>> {
    if scores.len() < k {
        return Err(Error::Internal(format!(
            "model produced {} classes, need at least {}",
            scores.len(),
            k
        )));
    }

    let probs = softmax(scores);
    let mut indexed: Vec<(usize, f32)> = probs.into_iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    indexed
        .iter()
        .take(k)
        .map(|&(id, prob)| {
            Ok(Prediction {
                class_name: index.name(id)?.to_string(),
                confidence: format!("{:.2}", prob),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(n: usize) -> ClassIndex {
        let text: String = (0..n).map(|i| format!("{}: class-{}\n", i, i)).collect();
        ClassIndex::parse(&text).unwrap()
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0, 4.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_softmax_handles_large_scores() {
        // Shift by max keeps exp() finite
        let probs = softmax(&[1000.0, 1001.0]);
        assert!(probs.iter().all(|p| p.is_finite()));
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_top_k_returns_exactly_three() {
        let preds = top_k(&[0.1, 5.0, 0.2, 3.0, 1.0], &index(5), TOP_K).unwrap();
        assert_eq!(preds.len(), 3);
        assert_eq!(preds[0].class_name, "class-1");
        assert_eq!(preds[1].class_name, "class-3");
        assert_eq!(preds[2].class_name, "class-4");
    }

    #[test]
    fn test_top_k_descending_confidence() {
        let preds = top_k(&[0.3, 0.1, 2.0, 1.5, 0.9], &index(5), TOP_K).unwrap();
        let values: Vec<f32> = preds
            .iter()
            .map(|p| p.confidence.parse::<f32>().unwrap())
            .collect();
        assert!(values[0] >= values[1] && values[1] >= values[2]);
    }

    #[test]
    fn test_confidence_has_two_decimal_digits() {
        let preds = top_k(&[4.0, 2.0, 1.0, 0.5], &index(4), TOP_K).unwrap();
        for p in &preds {
            let (_, frac) = p.confidence.split_once('.').expect("decimal point");
            assert_eq!(frac.len(), 2, "confidence {:?}", p.confidence);
        }
    }

    #[test]
    fn test_top_k_truncated_index_is_lookup_error() {
        // Highest score points past the end of a two-entry index
        let err = top_k(&[0.1, 0.2, 9.0], &index(2), TOP_K).unwrap_err();
        assert!(matches!(err, Error::Lookup(_)));
    }

    #[test]
    fn test_top_k_too_few_classes() {
        let err = top_k(&[1.0, 2.0], &index(2), TOP_K).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_top_k_deterministic() {
        let scores = [0.7, 3.2, 1.1, 0.05, 2.9];
        let a = top_k(&scores, &index(5), TOP_K).unwrap();
        let b = top_k(&scores, &index(5), TOP_K).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.class_name, y.class_name);
            assert_eq!(x.confidence, y.confidence);
        }
    }

    #[test]
    fn test_decode_missing_image_is_resource_not_found() {
        let err = decode_image(Path::new("/nonexistent/leaf.jpg")).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn test_decode_unreadable_path_is_resource_not_found() {
        // A directory exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        let err = decode_image(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }

    #[test]
    fn test_decode_garbage_bytes_is_decode_error() {
        use std::io::Write;

        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"definitely not an image").unwrap();
        f.flush().unwrap();

        let err = decode_image(f.path()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_classifier_load_missing_model() {
        let err = Classifier::load(
            Path::new("/nonexistent/best.onnx"),
            Path::new("/nonexistent/class_names.txt"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ResourceNotFound(_)));
    }
}
