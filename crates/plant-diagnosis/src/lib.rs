//! Diagnosis for images that passed the plant screen.
//!
//! - `catalog`: the label set
//! - `diagnoser`: the [`Diagnoser`] seam and the random placeholder behind it
//! - `advice`: care text for a diagnosis
//! - `scanner`: screen + diagnose + advise, producing a `ScanReport`

pub mod advice;
pub mod catalog;
pub mod diagnoser;
pub mod scanner;

pub use advice::advise;
pub use catalog::DiseaseCatalog;
pub use diagnoser::{rank_predictions, Diagnoser, RandomDiagnoser};
pub use scanner::Scanner;
