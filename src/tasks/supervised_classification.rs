use log::debug;

use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::measure_accumulator::{MeasureAccumulator, PredictiveAccuracy};
use crate::procedures::{Fold, Procedure};

use super::CrossValidation;

/// Classification task: features, aligned labels, and a name for reporting
#[derive(Debug, Clone)]
pub struct SupervisedClassification<C> {
    name: String,
    features: FeatureMatrix,
    labels: Vec<C>,
}

impl<C: Clone + PartialEq> SupervisedClassification<C> {
    pub fn new<S: Into<String>>(name: S, features: FeatureMatrix, labels: Vec<C>) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(Error::ShapeMismatch {
                expected: features.n_rows(),
                found: labels.len(),
            });
        }
        Ok(SupervisedClassification {
            name: name.into(),
            features,
            labels,
        })
    }

    /// get task name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn labels(&self) -> &[C] {
        &self.labels
    }

    pub fn n_rows(&self) -> usize {
        self.labels.len()
    }

    /// Run `flow` on every fold of `procedure`, accumulating one measure over all folds.
    ///
    /// The flow receives the training features and labels and the testing features, and must
    /// return one prediction per testing row.
    pub fn run<P, F, M>(&self, procedure: &P, mut flow: F) -> Result<M>
    where
        P: Procedure + ?Sized,
        F: FnMut(&FeatureMatrix, &[C], &FeatureMatrix) -> Result<Vec<C>>,
        M: MeasureAccumulator<C>,
    {
        let mut measure = M::new();
        for fold in procedure.iter() {
            let (known, predicted) = self.run_fold(fold, &mut flow)?;
            measure.update(known.iter(), predicted.iter());
        }
        Ok(measure)
    }

    /// Run `flow` on every fold and report the accuracy of each fold separately.
    pub fn evaluate_folds<P, F>(&self, procedure: &P, mut flow: F) -> Result<CrossValidation>
    where
        P: Procedure + ?Sized,
        F: FnMut(&FeatureMatrix, &[C], &FeatureMatrix) -> Result<Vec<C>>,
    {
        let mut scores = Vec::new();
        for (i, fold) in procedure.iter().enumerate() {
            let (known, predicted) = self.run_fold(fold, &mut flow)?;
            let mut acc = <PredictiveAccuracy<C> as MeasureAccumulator<C>>::new();
            acc.update(known.iter(), predicted.iter());
            debug!("{}: fold {} accuracy {:.4}", self.name, i, acc.result());
            scores.push(acc.result());
        }
        Ok(CrossValidation::new(scores))
    }

    fn run_fold<F>(&self, fold: &Fold, flow: &mut F) -> Result<(Vec<C>, Vec<C>)>
    where
        F: FnMut(&FeatureMatrix, &[C], &FeatureMatrix) -> Result<Vec<C>>,
    {
        if fold.trainset.is_empty() || fold.testset.is_empty() {
            return Err(Error::InsufficientSamples {
                required: 2,
                available: fold.trainset.len() + fold.testset.len(),
            });
        }

        let pick = |idx: &[usize]| idx.iter().map(|&i| self.labels[i].clone()).collect::<Vec<_>>();

        let x_train = self.features.select_rows(&fold.trainset);
        let y_train = pick(&fold.trainset);
        let x_test = self.features.select_rows(&fold.testset);
        let known = pick(&fold.testset);

        let predicted = flow(&x_train, &y_train, &x_test)?;
        if predicted.len() != known.len() {
            return Err(Error::ShapeMismatch {
                expected: known.len(),
                found: predicted.len(),
            });
        }
        Ok((known, predicted))
    }
}
