//! Classification models.
//!
//! Every model comes as a pair of types: an estimator holding the hyper-parameters, and the fitted
//! model it produces from training data.

mod decision_tree;
mod naive_bayes;
mod random_forest;

use std::collections::BTreeSet;

pub use self::decision_tree::{DecisionTreeClassifier, DecisionTreeParams};
pub use self::naive_bayes::{GaussianNB, NaiveBayesClassifier};
pub use self::random_forest::{MaxFeatures, RandomForestClassifier, RandomForestParams};

use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::measure_accumulator::{MeasureAccumulator, PredictiveAccuracy};

/// A fitted classifier
pub trait Model<C> {
    /// number of features the model was trained on
    fn n_features(&self) -> usize;

    /// predict the label of a single feature vector
    fn predict_one(&self, x: &[f64]) -> C;

    /// predict one label per row
    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<C>> {
        if x.n_cols() != self.n_features() {
            return Err(Error::ShapeMismatch {
                expected: self.n_features(),
                found: x.n_cols(),
            });
        }
        Ok(x.rows().map(|row| self.predict_one(row)).collect())
    }

    /// classification accuracy on labelled data
    fn score(&self, x: &FeatureMatrix, y: &[C]) -> Result<f64>
    where
        C: PartialEq,
    {
        check_training_data(x, y)?;
        let predicted = self.predict(x)?;
        let mut acc = <PredictiveAccuracy<C> as MeasureAccumulator<C>>::new();
        acc.update(y.iter(), predicted.iter());
        Ok(acc.result())
    }
}

/// Hyper-parameters of a classifier; fitting produces a `Model`
pub trait Estimator<C> {
    type Model: Model<C>;

    fn fit(&self, x: &FeatureMatrix, y: &[C]) -> Result<Self::Model>;
}

/// rows and labels must be aligned and non-empty
pub(crate) fn check_training_data<C>(x: &FeatureMatrix, y: &[C]) -> Result<()> {
    if x.n_rows() != y.len() {
        return Err(Error::ShapeMismatch {
            expected: x.n_rows(),
            found: y.len(),
        });
    }
    if y.is_empty() {
        return Err(Error::InsufficientSamples {
            required: 1,
            available: 0,
        });
    }
    Ok(())
}

/// Maps labels to dense class indices in sorted label order.
#[derive(Debug, Clone)]
pub(crate) struct ClassIndex<C> {
    classes: Vec<C>,
}

impl<C: Ord + Clone> ClassIndex<C> {
    /// index of every label, and the index itself
    pub(crate) fn encode(labels: &[C]) -> (Self, Vec<usize>) {
        let classes: Vec<C> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let indices = labels
            .iter()
            .map(|l| classes.binary_search(l).unwrap_or(0))
            .collect();

        (ClassIndex { classes }, indices)
    }

    pub(crate) fn len(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn label(&self, i: usize) -> C {
        self.classes[i].clone()
    }

    pub(crate) fn labels(&self) -> &[C] {
        &self.classes
    }
}

/// index of the largest count; ties go to the smallest index
pub(crate) fn argmax(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}
