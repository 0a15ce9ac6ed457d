//! Label set a diagnoser reports against.

use plant_core::{Error, PlantClass, Result};
use serde::{Deserialize, Serialize};

/// Ordered list of classes; a class's `id` is its index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseCatalog {
    classes: Vec<PlantClass>,
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self {
            classes: vec![
                PlantClass::disease(0, "Apple Scab", "Apple"),
                PlantClass::disease(1, "Tomato Early Blight", "Tomato"),
                PlantClass::disease(2, "Corn Leaf Spot", "Corn"),
                PlantClass::disease(3, "Potato Late Blight", "Potato"),
                PlantClass::disease(4, "Blueberry Leaf Spot", "Blueberry"),
                PlantClass::healthy(5, "Healthy Plant"),
            ],
        }
    }
}

impl DiseaseCatalog {
    /// Builds a catalog, checking ids match positions.
    pub fn new(classes: Vec<PlantClass>) -> Result<Self> {
        if classes.is_empty() {
            return Err(Error::Config("disease catalog is empty".to_string()));
        }
        if let Some((index, class)) = classes.iter().enumerate().find(|(i, c)| c.id != *i) {
            return Err(Error::Config(format!(
                "class '{}' has id {} but sits at index {index}",
                class.name, class.id
            )));
        }
        Ok(Self { classes })
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&PlantClass> {
        self.classes.get(id)
    }

    pub fn classes(&self) -> &[PlantClass] {
        &self.classes
    }

    /// Whether `id` names a healthy class
    pub fn is_healthy(&self, id: usize) -> bool {
        self.get(id).is_some_and(|class| class.healthy)
    }
}
