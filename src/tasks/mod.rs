//! Evaluation tasks: a labelled data set plus the procedure used to score models on it.

mod cross_validation;
mod supervised_classification;

pub use self::cross_validation::{cross_validate, CrossValidation};
pub use self::supervised_classification::SupervisedClassification;
