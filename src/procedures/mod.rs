//! Validation procedures

mod holdout;
mod kfold;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use self::holdout::{train_test_split, Holdout};
pub use self::kfold::KFold;

/// Validation procedures support iteration over cross-validation folds
pub trait Procedure {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a>;

    fn n_folds(&self) -> usize {
        self.iter().count()
    }
}

/// A single cross-validation fold, consisting of a training set and a testing set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub trainset: Vec<usize>,
    pub testset: Vec<usize>,
}

impl Fold {
    pub fn new() -> Self {
        Fold {
            trainset: Vec::new(),
            testset: Vec::new(),
        }
    }
}

impl Default for Fold {
    fn default() -> Self {
        Fold::new()
    }
}

/// A precomputed list of folds
#[derive(Debug, Clone)]
pub struct Folds {
    pub(crate) folds: Vec<Fold>,
}

impl Folds {
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }
}

impl Procedure for Folds {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        Box::new(self.folds.iter())
    }
}

impl Procedure for Fold {
    fn iter<'a>(&'a self) -> Box<dyn Iterator<Item = &'a Fold> + 'a> {
        Box::new(::std::iter::once(self))
    }
}

/// seeded generator, or one seeded from system entropy
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
