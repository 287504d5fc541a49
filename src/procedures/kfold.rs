use rand::seq::SliceRandom;

use super::{make_rng, Fold, Folds};
use crate::error::{Error, Result};

/// K-fold cross-validation.
///
/// Rows are cut into `k` consecutive folds, optionally after shuffling. Each fold serves once as
/// the testing set while the remaining `k - 1` folds form the training set. The first `n % k`
/// folds get one extra row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    shuffle: bool,
    seed: Option<u64>,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        KFold {
            n_splits,
            shuffle: false,
            seed: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// seed the shuffle; has no effect unless shuffling is enabled
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn split(&self, n_rows: usize) -> Result<Folds> {
        if self.n_splits < 2 {
            return Err(Error::InvalidParameter(format!(
                "k-fold needs at least 2 folds, got {}",
                self.n_splits
            )));
        }
        if self.n_splits > n_rows {
            return Err(Error::InsufficientSamples {
                required: self.n_splits,
                available: n_rows,
            });
        }

        let mut indices: Vec<usize> = (0..n_rows).collect();
        if self.shuffle {
            indices.shuffle(&mut make_rng(self.seed));
        }

        let fold_size = n_rows / self.n_splits;
        let remainder = n_rows % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + if i < remainder { 1 } else { 0 };

            let mut fold = Fold::new();
            fold.testset.extend_from_slice(&indices[start..end]);
            fold.trainset.extend_from_slice(&indices[..start]);
            fold.trainset.extend_from_slice(&indices[end..]);
            folds.push(fold);

            start = end;
        }

        Ok(Folds { folds })
    }
}
