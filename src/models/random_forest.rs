//! Random forest: bagged decision trees with random feature subsets at every split.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::decision_tree::{DecisionTreeParams, Node, TreeBuilder};
use super::{argmax, check_training_data, ClassIndex, Estimator, Model};
use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::procedures::make_rng;

/// Number of features considered when looking for the best split
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// square root of the number of features
    Sqrt,
    /// binary logarithm of the number of features
    Log2,
    All,
    Count(usize),
}

impl MaxFeatures {
    /// number of features to draw out of `n_features`; at least one
    pub fn resolve(&self, n_features: usize) -> usize {
        let n = match *self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Count(c) => c.min(n_features),
        };
        n.max(1)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            MaxFeatures::Count(0) => Err(Error::InvalidParameter(
                "max_features must be at least 1".to_owned(),
            )),
            _ => Ok(()),
        }
    }
}

/// Hyper-parameters of a random forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_features: MaxFeatures,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// grow each tree on a bootstrap sample instead of the full training set
    pub bootstrap: bool,
    pub seed: Option<u64>,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        RandomForestParams {
            n_trees: 100,
            max_features: MaxFeatures::Sqrt,
            max_depth: None,
            min_samples_split: 2,
            bootstrap: true,
            seed: None,
        }
    }
}

impl RandomForestParams {
    fn tree_params(&self) -> DecisionTreeParams {
        DecisionTreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            max_features: self.max_features,
            seed: None,
        }
    }
}

/// A fitted random forest; predicts by majority vote over its trees
#[derive(Debug, Clone)]
pub struct RandomForestClassifier<C> {
    classes: ClassIndex<C>,
    trees: Vec<Node>,
    n_features: usize,
}

impl<C: Ord + Clone> RandomForestClassifier<C> {
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// the classes seen during fitting, in sorted order
    pub fn classes(&self) -> &[C] {
        self.classes.labels()
    }
}

impl<C> Estimator<C> for RandomForestParams
where
    C: Ord + Clone,
{
    type Model = RandomForestClassifier<C>;

    fn fit(&self, x: &FeatureMatrix, y: &[C]) -> Result<RandomForestClassifier<C>> {
        check_training_data(x, y)?;
        if self.n_trees == 0 {
            return Err(Error::InvalidParameter(
                "a random forest needs at least one tree".to_owned(),
            ));
        }
        let tree_params = self.tree_params();
        tree_params.validate()?;

        let (classes, y_idx) = ClassIndex::encode(y);
        let n = x.n_rows();

        // every tree gets its own generator, derived from the forest's
        let mut rng = make_rng(self.seed);
        let trees = (0..self.n_trees)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                let rows: Vec<usize> = if self.bootstrap {
                    (0..n).map(|_| tree_rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                TreeBuilder::new(x, &y_idx, classes.len(), &tree_params, tree_rng).build(rows)
            })
            .collect();

        debug!(
            "Fitted random forest: {} trees, {} classes, {} features",
            self.n_trees,
            classes.len(),
            x.n_cols()
        );

        Ok(RandomForestClassifier {
            classes,
            trees,
            n_features: x.n_cols(),
        })
    }
}

impl<C: Ord + Clone> Model<C> for RandomForestClassifier<C> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    /// majority vote; ties go to the smallest class
    fn predict_one(&self, x: &[f64]) -> C {
        let mut votes = vec![0; self.classes.len()];
        for tree in &self.trees {
            votes[tree.classify(x)] += 1;
        }
        self.classes.label(argmax(&votes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> (FeatureMatrix, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..40 {
            let t = i as f64 / 40.0;
            rows.push(vec![t, 1.0 - t, (i % 3) as f64]);
            labels.push(if t < 0.5 { 0 } else { 1 });
        }
        let names = vec!["a".to_owned(), "b".to_owned(), "noise".to_owned()];
        (FeatureMatrix::from_rows(names, rows).unwrap(), labels)
    }

    #[test]
    fn max_features_resolution() {
        assert_eq!(MaxFeatures::Sqrt.resolve(16), 4);
        assert_eq!(MaxFeatures::Sqrt.resolve(17), 4);
        assert_eq!(MaxFeatures::Log2.resolve(16), 4);
        assert_eq!(MaxFeatures::All.resolve(7), 7);
        assert_eq!(MaxFeatures::Count(10).resolve(7), 7);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
    }

    #[test]
    fn forest_learns_separable_data() {
        let (x, y) = blobs();
        let params = RandomForestParams {
            n_trees: 15,
            seed: Some(0),
            ..RandomForestParams::default()
        };
        let forest = params.fit(&x, &y).unwrap();
        assert_eq!(forest.n_trees(), 15);
        assert_eq!(forest.classes(), &[0, 1]);
        assert!(forest.score(&x, &y).unwrap() >= 0.9);
    }

    #[test]
    fn seeded_forests_agree() {
        let (x, y) = blobs();
        let params = RandomForestParams {
            n_trees: 10,
            seed: Some(42),
            ..RandomForestParams::default()
        };
        let probe = FeatureMatrix::from_rows(
            x.names().to_vec(),
            vec![vec![0.49, 0.51, 2.0], vec![0.51, 0.49, 0.0], vec![0.3, 0.3, 1.0]],
        )
        .unwrap();

        let a = params.fit(&x, &y).unwrap().predict(&probe).unwrap();
        let b = params.fit(&x, &y).unwrap().predict(&probe).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn empty_forest_is_rejected() {
        let (x, y) = blobs();
        let params = RandomForestParams {
            n_trees: 0,
            ..RandomForestParams::default()
        };
        match params.fit(&x, &y) {
            Err(Error::InvalidParameter(_)) => {}
            other => panic!("unexpected {:?}", other.map(|f| f.n_trees())),
        }
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: RandomForestParams =
            serde_json::from_str(r#"{"n_trees": 5, "max_features": {"count": 2}}"#).unwrap();
        assert_eq!(p.n_trees, 5);
        assert_eq!(p.max_features, MaxFeatures::Count(2));
        assert!(p.bootstrap);
    }
}
