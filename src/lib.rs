//! Train and evaluate classifiers on tabular CSV data, and predict labels for unlabeled rows.

#[macro_use]
extern crate serde_derive;

pub mod dataset;
pub mod error;
pub mod export;
pub mod feature_matrix;
mod file_lock;
pub mod measure_accumulator;
pub mod models;
pub mod pipeline;
pub mod preprocessing;
pub mod procedures;
pub mod tasks;

pub use crate::dataset::{Column, DataSet};
pub use crate::error::{Error, Result};
pub use crate::export::{write_predictions, write_predictions_to, Prediction};
pub use crate::feature_matrix::FeatureMatrix;
pub use crate::measure_accumulator::{accuracy, MeasureAccumulator, PredictiveAccuracy};
pub use crate::pipeline::{
    CategoricalTreatment, ClassifierKind, ClassifierSpec, CrossValidationConfig, Pipeline,
    PipelineConfig, PipelineReport,
};
pub use crate::preprocessing::{LabelEncoder, StandardScaler, ZeroVariancePolicy};
pub use crate::tasks::{cross_validate, CrossValidation, SupervisedClassification};

/// Traits needed to fit, apply and evaluate models
pub mod prelude {
    pub use crate::measure_accumulator::MeasureAccumulator;
    pub use crate::models::{Estimator, Model};
    pub use crate::procedures::Procedure;
}
