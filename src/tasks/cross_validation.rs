use std::fmt;

use log::info;

use crate::error::Result;
use crate::feature_matrix::FeatureMatrix;
use crate::models::{Estimator, Model};
use crate::preprocessing::mean_and_std;
use crate::procedures::KFold;

use super::SupervisedClassification;

/// Accuracy of every cross-validation fold
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidation {
    scores: Vec<f64>,
}

impl CrossValidation {
    pub fn new(scores: Vec<f64>) -> Self {
        CrossValidation { scores }
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn n_folds(&self) -> usize {
        self.scores.len()
    }

    pub fn mean(&self) -> f64 {
        mean_and_std(self.scores.iter().cloned()).0
    }

    /// population standard deviation of the fold scores
    pub fn std(&self) -> f64 {
        mean_and_std(self.scores.iter().cloned()).1
    }

    pub fn min(&self) -> f64 {
        self.scores.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}

impl fmt::Display for CrossValidation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, s) in self.scores.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", s)?;
        }
        write!(f, "] mean {:.4} (+/- {:.4})", self.mean(), self.std())
    }
}

/// Fit a fresh model on each k-fold training part and score it on the held-out part.
pub fn cross_validate<E, C>(
    estimator: &E,
    x: &FeatureMatrix,
    y: &[C],
    kfold: &KFold,
) -> Result<CrossValidation>
where
    E: Estimator<C>,
    C: Clone + PartialEq,
{
    let task = SupervisedClassification::new("cross-validation", x.clone(), y.to_vec())?;
    let folds = kfold.split(task.n_rows())?;

    let cv = task.evaluate_folds(&folds, |x_train, y_train, x_test| {
        estimator.fit(x_train, y_train)?.predict(x_test)
    })?;

    info!(
        "{}-fold cross-validation accuracy: {:.4} (+/- {:.4})",
        cv.n_folds(),
        cv.mean(),
        cv.std()
    );
    Ok(cv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::GaussianNB;

    #[test]
    fn summary_statistics() {
        let cv = CrossValidation::new(vec![0.5, 1.0, 0.75, 0.75]);
        assert_eq!(cv.mean(), 0.75);
        assert_eq!(cv.min(), 0.5);
        assert_eq!(cv.max(), 1.0);
        assert!((cv.std() - 0.176_776_695).abs() < 1e-6);
        assert_eq!(cv.to_string(), "[0.5000, 1.0000, 0.7500, 0.7500] mean 0.7500 (+/- 0.1768)");
    }

    #[test]
    fn one_score_per_fold_in_unit_interval() {
        let rows = (0..30).map(|i| vec![i as f64, (i % 5) as f64]).collect();
        let x = FeatureMatrix::from_rows(vec!["a".to_owned(), "b".to_owned()], rows).unwrap();
        let y: Vec<u8> = (0..30).map(|i| if i < 15 { 0 } else { 1 }).collect();

        let kfold = KFold::new(5).with_shuffle(true).with_seed(Some(1));
        let cv = cross_validate(&GaussianNB::default(), &x, &y, &kfold).unwrap();
        assert_eq!(cv.n_folds(), 5);
        assert!(cv.scores().iter().all(|&s| s >= 0.0 && s <= 1.0));
    }

    #[test]
    fn more_folds_than_rows() {
        let x = FeatureMatrix::from_rows(vec!["a".to_owned()], vec![vec![1.0], vec![2.0]]).unwrap();
        match cross_validate(&GaussianNB::default(), &x, &[0, 1][..], &KFold::new(3)) {
            Err(Error::InsufficientSamples { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
