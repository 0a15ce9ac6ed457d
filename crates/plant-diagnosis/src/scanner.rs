//! Screen, then diagnose: the full scan of one image.

use std::sync::Arc;

use image::DynamicImage;
use plant_core::{AppConfig, PlantVerdict, Result, ScanReport};
use plant_screen::{DecodedImage, PlantScreen};
use tracing::info;

use crate::advice::advise;
use crate::diagnoser::{Diagnoser, RandomDiagnoser};

/// Runs the plant screen and, for accepted images, the diagnoser.
///
/// Holds no per-scan state; every call returns its own [`ScanReport`].
#[derive(Clone)]
pub struct Scanner {
    screen: PlantScreen,
    diagnoser: Arc<dyn Diagnoser>,
}

impl Scanner {
    pub fn new(screen: PlantScreen, diagnoser: Arc<dyn Diagnoser>) -> Self {
        Self { screen, diagnoser }
    }

    /// Scanner with the configured screen and the random placeholder diagnoser
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let diagnoser = RandomDiagnoser::from_config(&config.diagnosis)?;
        Ok(Self::new(
            PlantScreen::new(config.screen.clone()),
            Arc::new(diagnoser),
        ))
    }

    pub fn screen(&self) -> &PlantScreen {
        &self.screen
    }

    pub fn diagnoser(&self) -> &dyn Diagnoser {
        self.diagnoser.as_ref()
    }

    /// Scans an in-memory image by its pixels alone
    pub fn scan(&self, image: &DynamicImage) -> Result<ScanReport> {
        let verdict = self.screen.screen(image)?;
        self.complete(image, verdict)
    }

    /// Scans an image loaded from a file or upload
    pub fn scan_decoded(&self, decoded: &DecodedImage) -> Result<ScanReport> {
        let verdict = self.screen.screen_decoded(decoded)?;
        self.complete(&decoded.image, verdict)
    }

    fn complete(&self, image: &DynamicImage, verdict: PlantVerdict) -> Result<ScanReport> {
        if !verdict.is_plant {
            info!(
                green_ratio = verdict.green_ratio,
                brown_ratio = verdict.brown_ratio,
                "rejected non-plant image"
            );
            return Ok(ScanReport::rejected(verdict));
        }

        let diagnosis = self.diagnoser.diagnose(image)?;
        let advice = advise(&diagnosis, self.diagnoser.catalog());
        info!(
            label = %diagnosis.primary.label,
            confidence = diagnosis.primary.confidence,
            source = %diagnosis.source,
            "diagnosed image"
        );
        Ok(ScanReport::diagnosed(verdict, diagnosis, advice))
    }
}
