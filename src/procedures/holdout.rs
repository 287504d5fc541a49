use log::debug;
use rand::seq::SliceRandom;

use super::{make_rng, Fold};
use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;

/// Random train/test partition with a fixed test fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Holdout {
    test_fraction: f64,
    seed: Option<u64>,
}

impl Holdout {
    /// `test_fraction` must lie strictly between 0 and 1
    pub fn new(test_fraction: f64, seed: Option<u64>) -> Result<Self> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "test fraction must be in (0, 1), got {}",
                test_fraction
            )));
        }
        Ok(Holdout {
            test_fraction,
            seed,
        })
    }

    pub fn test_fraction(&self) -> f64 {
        self.test_fraction
    }

    /// number of test rows for a table of `n_rows` rows (rounded up)
    pub fn n_test(&self, n_rows: usize) -> usize {
        (self.test_fraction * n_rows as f64).ceil() as usize
    }

    /// Shuffle the row indices and cut them into a training and a testing set.
    pub fn split(&self, n_rows: usize) -> Result<Fold> {
        let n_test = self.n_test(n_rows);
        if n_test == 0 || n_test >= n_rows {
            return Err(Error::InsufficientSamples {
                required: 2,
                available: n_rows,
            });
        }
        let n_train = n_rows - n_test;

        let mut indices: Vec<usize> = (0..n_rows).collect();
        indices.shuffle(&mut make_rng(self.seed));

        let testset = indices.split_off(n_train);
        debug!("Holdout split: {} train, {} test", indices.len(), testset.len());

        Ok(Fold {
            trainset: indices,
            testset,
        })
    }
}

/// Split features and labels into `(x_train, x_test, y_train, y_test)`.
pub fn train_test_split<C: Clone>(
    x: &FeatureMatrix,
    y: &[C],
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<(FeatureMatrix, FeatureMatrix, Vec<C>, Vec<C>)> {
    if x.n_rows() != y.len() {
        return Err(Error::ShapeMismatch {
            expected: x.n_rows(),
            found: y.len(),
        });
    }

    let fold = Holdout::new(test_fraction, seed)?.split(x.n_rows())?;
    let pick = |idx: &[usize]| idx.iter().map(|&i| y[i].clone()).collect::<Vec<_>>();

    Ok((
        x.select_rows(&fold.trainset),
        x.select_rows(&fold.testset),
        pick(&fold.trainset),
        pick(&fold.testset),
    ))
}
