use std::collections::BTreeMap;
use std::f64;
use std::fmt;
use std::iter::FromIterator;

use log::debug;

use super::{check_training_data, Estimator, Model};
use crate::error::Result;
use crate::feature_matrix::FeatureMatrix;

/// Gaussian Naive Bayes estimator.
///
/// Features are assumed independent and normally distributed within each class. To keep
/// constant features from producing zero variances, `var_smoothing` times the largest feature
/// variance is added to every variance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GaussianNB {
    pub var_smoothing: f64,
}

impl Default for GaussianNB {
    fn default() -> Self {
        GaussianNB {
            var_smoothing: 1e-9,
        }
    }
}

impl<C> Estimator<C> for GaussianNB
where
    C: Ord + Clone,
{
    type Model = NaiveBayesClassifier<C>;

    fn fit(&self, x: &FeatureMatrix, y: &[C]) -> Result<NaiveBayesClassifier<C>> {
        check_training_data(x, y)?;

        let mut acc = Accumulator::new();
        for (row, label) in x.rows().zip(y) {
            acc.add(row.iter().cloned(), label.clone());
        }
        let model = acc.finish(self.var_smoothing);

        debug!(
            "Fitted Gaussian NB: {} classes, {} features",
            model.class_distributions.len(),
            model.n_features
        );
        Ok(model)
    }
}

/// A fitted Gaussian Naive Bayes classifier
#[derive(Debug)]
pub struct NaiveBayesClassifier<C>
where
    C: Ord,
{
    class_distributions: BTreeMap<C, FeatureDistribution>,
    epsilon: f64,
    n_features: usize,
}

#[derive(Debug, Clone)]
struct FeatureDistribution {
    ln_prior: f64,
    distributions: Vec<UniformNormalDistribution>,
}

/// Running mean and variance (Welford's method)
#[derive(Copy, Clone)]
struct UniformNormalDistribution {
    mean: f64,
    m2: f64,
    n: usize,
}

struct Accumulator<C> {
    classes: BTreeMap<C, Vec<UniformNormalDistribution>>,
    overall: Vec<UniformNormalDistribution>,
    n: usize,
}

impl<C: Ord> Accumulator<C> {
    fn new() -> Self {
        Accumulator {
            classes: BTreeMap::new(),
            overall: Vec::new(),
            n: 0,
        }
    }

    fn add<J: IntoIterator<Item = f64>>(&mut self, x: J, y: C) {
        let distributions = self.classes.entry(y).or_insert_with(Vec::new);

        for (i, xi) in x.into_iter().enumerate() {
            if i >= distributions.len() {
                distributions.resize(1 + i, UniformNormalDistribution::new());
            }
            if i >= self.overall.len() {
                self.overall.resize(1 + i, UniformNormalDistribution::new());
            }

            distributions[i].update(xi);
            self.overall[i].update(xi);
        }
        self.n += 1;
    }

    fn finish(self, var_smoothing: f64) -> NaiveBayesClassifier<C> {
        let max_var = self
            .overall
            .iter()
            .map(UniformNormalDistribution::variance)
            .fold(0.0, f64::max);
        let epsilon = if max_var > 0.0 {
            var_smoothing * max_var
        } else {
            var_smoothing
        };

        let n = self.n as f64;
        let n_features = self.overall.len();
        let class_distributions = self
            .classes
            .into_iter()
            .map(|(c, distributions)| {
                let count = distributions.first().map(|d| d.n).unwrap_or(0) as f64;
                let dist = FeatureDistribution {
                    ln_prior: (count / n).ln(),
                    distributions,
                };
                (c, dist)
            })
            .collect();

        NaiveBayesClassifier {
            class_distributions,
            epsilon,
            n_features,
        }
    }
}

impl<C, J> FromIterator<(J, C)> for NaiveBayesClassifier<C>
where
    J: IntoIterator<Item = f64>,
    C: Ord,
{
    fn from_iter<I: IntoIterator<Item = (J, C)>>(iter: I) -> Self {
        let mut acc = Accumulator::new();
        for (x, y) in iter {
            acc.add(x, y);
        }
        acc.finish(GaussianNB::default().var_smoothing)
    }
}

impl<C> NaiveBayesClassifier<C>
where
    C: Ord,
{
    /// most probable class; ties go to the smallest class
    pub fn predict_ref(&self, x: &[f64]) -> Option<&C> {
        let mut best: Option<(&C, f64)> = None;

        for (c, dists) in &self.class_distributions {
            let mut lnprob = dists.ln_prior;
            for (&xi, dist) in x.iter().zip(dists.distributions.iter()) {
                lnprob += dist.lnprob(xi, self.epsilon);
            }

            match best {
                Some((_, b)) if !(lnprob > b) => {}
                _ => best = Some((c, lnprob)),
            }
        }

        best.map(|(c, _)| c)
    }

    pub fn classes(&self) -> impl Iterator<Item = &C> {
        self.class_distributions.keys()
    }
}

impl<C> Model<C> for NaiveBayesClassifier<C>
where
    C: Ord + Clone,
{
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_one(&self, x: &[f64]) -> C {
        // fitting always sees at least one class
        self.predict_ref(x)
            .cloned()
            .expect("naive Bayes model without classes")
    }
}

impl UniformNormalDistribution {
    fn new() -> Self {
        UniformNormalDistribution {
            mean: 0.0,
            m2: 0.0,
            n: 0,
        }
    }

    fn update(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    fn mean(&self) -> f64 {
        self.mean
    }

    /// population variance
    fn variance(&self) -> f64 {
        if self.n == 0 {
            return 0.0;
        }
        self.m2 / self.n as f64
    }

    fn lnprob(&self, x: f64, epsilon: f64) -> f64 {
        let v = self.variance() + epsilon;
        let xm = x - self.mean();

        0.5 * ((1.0 / (2.0 * f64::consts::PI * v)).ln() - (xm * xm) / v)
    }
}

impl fmt::Debug for UniformNormalDistribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "N{{{}; {}}}", self.mean(), self.variance())
    }
}

#[test]
fn nbc() {
    let data = vec![
        (vec![1.0, 2.0], 'A'),
        (vec![2.0, 1.0], 'A'),
        (vec![1.0, 5.0], 'B'),
        (vec![2.0, 6.0], 'B'),
    ];

    let nbc: NaiveBayesClassifier<_> = data
        .iter()
        .map(|(x, y)| (x.iter().cloned(), *y))
        .collect();

    assert_eq!(nbc.predict_one(&[1.5, 1.5]), 'A');
    assert_eq!(nbc.predict_one(&[5.5, 1.5]), 'A');
    assert_eq!(nbc.predict_one(&[1.5, 5.5]), 'B');
    assert_eq!(nbc.predict_one(&[5.5, 5.5]), 'B');
}

#[test]
fn nbc_estimator_uses_priors() {
    // identical feature distributions, so the larger class wins
    let x = FeatureMatrix::from_rows(
        vec!["f".to_owned()],
        vec![vec![0.0], vec![1.0], vec![0.0], vec![1.0], vec![0.0], vec![1.0]],
    )
    .unwrap();
    let y = vec!["b", "b", "a", "a", "b", "b"];

    let model = GaussianNB::default().fit(&x, &y).unwrap();
    assert_eq!(model.predict_one(&[0.5]), "b");
    assert_eq!(model.classes().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn nbc_survives_constant_features() {
    let x = FeatureMatrix::from_rows(
        vec!["f".to_owned(), "g".to_owned()],
        vec![vec![1.0, 3.0], vec![1.0, 3.0], vec![1.0, 3.0]],
    )
    .unwrap();
    let y = vec![0, 1, 1];

    let model = GaussianNB::default().fit(&x, &y).unwrap();
    let score = model.score(&x, &y).unwrap();
    assert!(score >= 0.0 && score <= 1.0);
    assert_eq!(model.predict_one(&[1.0, 3.0]), 1);
}

#[test]
fn nbc_rejects_wrong_width() {
    let x = FeatureMatrix::from_rows(vec!["f".to_owned()], vec![vec![1.0], vec![2.0]]).unwrap();
    let model = GaussianNB::default().fit(&x, &[0, 1][..]).unwrap();
    let wide = FeatureMatrix::from_rows(
        vec!["f".to_owned(), "g".to_owned()],
        vec![vec![1.0, 2.0]],
    )
    .unwrap();
    assert!(model.predict(&wide).is_err());
}
