//! Diagnosers turn an accepted image into a ranked list of labels.
//!
//! The only implementation shipped is [`RandomDiagnoser`], which draws the
//! confidences from a symmetric Dirichlet distribution and never looks at the
//! image. Its output is flagged `placeholder` so front ends can say so. A
//! trained model plugs in by implementing [`Diagnoser`].

use std::sync::Mutex;

use image::DynamicImage;
use plant_core::{Diagnosis, DiagnosisConfig, Error, Prediction, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Dirichlet;
use tracing::debug;

use crate::catalog::DiseaseCatalog;

/// Tolerance on the sum of a confidence vector
const SUM_TOLERANCE: f64 = 1e-6;

/// Produces a diagnosis for an image that passed the plant screen
pub trait Diagnoser: Send + Sync {
    /// Short identifier reported in each diagnosis
    fn name(&self) -> &str;

    /// Labels the catalog this diagnoser reports against
    fn catalog(&self) -> &DiseaseCatalog;

    fn diagnose(&self, image: &DynamicImage) -> Result<Diagnosis>;
}

/// Random-draw stand-in for a real model
pub struct RandomDiagnoser {
    catalog: DiseaseCatalog,
    distribution: Dirichlet<f64>,
    top_k: usize,
    rng: Mutex<ChaCha8Rng>,
}

impl RandomDiagnoser {
    pub const NAME: &'static str = "random-dirichlet";

    pub fn new(catalog: DiseaseCatalog, config: &DiagnosisConfig) -> Result<Self> {
        config.validate()?;
        let distribution = Dirichlet::new_with_size(config.concentration, catalog.len())
            .map_err(|e| Error::Config(format!("Invalid Dirichlet parameters: {e}")))?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            catalog,
            distribution,
            top_k: config.top_k,
            rng: Mutex::new(rng),
        })
    }

    /// Diagnoser over the default catalog
    pub fn from_config(config: &DiagnosisConfig) -> Result<Self> {
        Self::new(DiseaseCatalog::default(), config)
    }

    /// One confidence vector, aligned with the catalog
    pub fn draw(&self) -> Result<Vec<f64>> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Diagnosis("diagnoser RNG lock poisoned".to_string()))?;
        Ok(rng.sample(&self.distribution))
    }
}

impl Diagnoser for RandomDiagnoser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    fn diagnose(&self, _image: &DynamicImage) -> Result<Diagnosis> {
        let confidences = self.draw()?;
        let ranked = rank_predictions(&self.catalog, &confidences, self.top_k)?;
        debug!(
            label = %ranked[0].label,
            confidence = ranked[0].confidence,
            "drew placeholder diagnosis"
        );

        Ok(Diagnosis {
            primary: ranked[0].clone(),
            ranked,
            source: Self::NAME.to_string(),
            placeholder: true,
        })
    }
}

/// Pairs confidences with catalog labels and keeps the `top_k` highest.
///
/// The vector must cover the whole catalog, be non-negative and sum to 1.
/// Ties keep catalog order.
pub fn rank_predictions(
    catalog: &DiseaseCatalog,
    confidences: &[f64],
    top_k: usize,
) -> Result<Vec<Prediction>> {
    if confidences.len() != catalog.len() {
        return Err(Error::Diagnosis(format!(
            "expected {} confidences, got {}",
            catalog.len(),
            confidences.len()
        )));
    }
    if top_k == 0 {
        return Err(Error::Diagnosis("top_k must be at least 1".to_string()));
    }
    if let Some(bad) = confidences.iter().find(|c| !c.is_finite() || **c < 0.0) {
        return Err(Error::Diagnosis(format!("invalid confidence {bad}")));
    }
    let sum: f64 = confidences.iter().sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(Error::Diagnosis(format!(
            "confidences must sum to 1, got {sum}"
        )));
    }

    let mut predictions: Vec<Prediction> = catalog
        .classes()
        .iter()
        .zip(confidences)
        .map(|(class, &confidence)| Prediction {
            class_id: class.id,
            label: class.name.clone(),
            confidence,
        })
        .collect();

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(top_k);
    Ok(predictions)
}
