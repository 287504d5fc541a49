//! CART classification trees, split on Gini impurity.

use std::cmp::Ordering;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::random_forest::MaxFeatures;
use super::{argmax, check_training_data, ClassIndex, Estimator, Model};
use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::procedures::make_rng;

/// Hyper-parameters of a single decision tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeParams {
    /// maximum depth; the root has depth 0
    pub max_depth: Option<usize>,
    /// nodes with fewer rows become leaves
    pub min_samples_split: usize,
    /// number of features considered at every split
    pub max_features: MaxFeatures,
    pub seed: Option<u64>,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        DecisionTreeParams {
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::All,
            seed: None,
        }
    }
}

impl DecisionTreeParams {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(Error::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                self.min_samples_split
            )));
        }
        self.max_features.validate()
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub(crate) fn classify(&self, x: &[f64]) -> usize {
        let mut node = self;
        loop {
            match *node {
                Node::Leaf { class } => return class,
                Node::Split {
                    feature,
                    threshold,
                    ref left,
                    ref right,
                } => {
                    node = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    pub(crate) fn depth(&self) -> usize {
        match *self {
            Node::Leaf { .. } => 0,
            Node::Split {
                ref left,
                ref right,
                ..
            } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Grows a tree over `rows` (which may contain repeated rows) of `x`, with class indices `y`.
pub(crate) struct TreeBuilder<'a> {
    x: &'a FeatureMatrix,
    y: &'a [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    max_features: usize,
    rng: StdRng,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(
        x: &'a FeatureMatrix,
        y: &'a [usize],
        n_classes: usize,
        params: &DecisionTreeParams,
        rng: StdRng,
    ) -> Self {
        TreeBuilder {
            x,
            y,
            n_classes,
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            max_features: params.max_features.resolve(x.n_cols()),
            rng,
        }
    }

    pub(crate) fn build(mut self, rows: Vec<usize>) -> Node {
        self.grow(rows, 0)
    }

    fn grow(&mut self, rows: Vec<usize>, depth: usize) -> Node {
        let counts = self.class_counts(&rows);
        let majority = argmax(&counts);

        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let too_deep = self.max_depth.map_or(false, |d| depth >= d);
        if pure || too_deep || rows.len() < self.min_samples_split {
            return Node::Leaf { class: majority };
        }

        let split = match self.best_split(&rows) {
            Some(s) => s,
            None => return Node::Leaf { class: majority },
        };

        let (left, right): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&i| self.x.get(i, split.feature) <= split.threshold);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.grow(left, depth + 1)),
            right: Box::new(self.grow(right, depth + 1)),
        }
    }

    fn class_counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in rows {
            counts[self.y[i]] += 1;
        }
        counts
    }

    /// Search a random subset of features for the split with the lowest weighted impurity.
    /// Constant features do not count towards the subset.
    fn best_split(&mut self, rows: &[usize]) -> Option<BestSplit> {
        let mut features: Vec<usize> = (0..self.x.n_cols()).collect();
        features.shuffle(&mut self.rng);

        let mut best: Option<BestSplit> = None;
        let mut n_visited = 0;

        for feature in features {
            if n_visited >= self.max_features && best.is_some() {
                break;
            }

            if let Some(candidate) = self.best_split_for_feature(rows, feature) {
                n_visited += 1;
                let better = best
                    .as_ref()
                    .map_or(true, |b| candidate.impurity < b.impurity);
                if better {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    fn best_split_for_feature(&self, rows: &[usize], feature: usize) -> Option<BestSplit> {
        let mut values: Vec<(f64, usize)> = rows
            .iter()
            .map(|&i| (self.x.get(i, feature), self.y[i]))
            .collect();
        values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let n = values.len();
        let mut left = vec![0; self.n_classes];
        let mut right = vec![0; self.n_classes];
        for &(_, c) in &values {
            right[c] += 1;
        }

        let mut best: Option<BestSplit> = None;
        for k in 0..n.saturating_sub(1) {
            let (v, c) = values[k];
            left[c] += 1;
            right[c] -= 1;

            let next = values[k + 1].0;
            if !(v < next) {
                continue;
            }

            let n_left = k + 1;
            let n_right = n - n_left;
            let impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                let mut threshold = v + (next - v) / 2.0;
                if threshold >= next {
                    threshold = v;
                }
                best = Some(BestSplit {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }

        best
    }
}

/// Gini impurity of a node with the given class counts
pub(crate) fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// A fitted decision tree
#[derive(Debug, Clone)]
pub struct DecisionTreeClassifier<C> {
    classes: ClassIndex<C>,
    root: Node,
    n_features: usize,
}

impl<C> DecisionTreeClassifier<C> {
    /// length of the longest path from the root to a leaf
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

impl<C> Estimator<C> for DecisionTreeParams
where
    C: Ord + Clone,
{
    type Model = DecisionTreeClassifier<C>;

    fn fit(&self, x: &FeatureMatrix, y: &[C]) -> Result<DecisionTreeClassifier<C>> {
        check_training_data(x, y)?;
        self.validate()?;

        let (classes, y_idx) = ClassIndex::encode(y);
        let builder = TreeBuilder::new(x, &y_idx, classes.len(), self, make_rng(self.seed));
        let root = builder.build((0..x.n_rows()).collect());

        Ok(DecisionTreeClassifier {
            classes,
            root,
            n_features: x.n_cols(),
        })
    }
}

impl<C: Ord + Clone> Model<C> for DecisionTreeClassifier<C> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_one(&self, x: &[f64]) -> C {
        self.classes.label(self.root.classify(x))
    }
}
