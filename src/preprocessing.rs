//! Feature preprocessing: standardization and label encoding of categorical columns.

use std::collections::BTreeMap;

use log::{debug, warn};
use num_traits::Float;

use crate::dataset::Column;
use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;

/// What to do with a feature column whose standard deviation is zero
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// fail with `Error::ZeroVariance`
    Reject,
    /// center the column but leave it unscaled
    PassThrough,
}

impl Default for ZeroVariancePolicy {
    fn default() -> Self {
        ZeroVariancePolicy::PassThrough
    }
}

/// Mean and population standard deviation of a sequence, accumulated with Welford's update.
pub(crate) fn mean_and_std<F, I>(values: I) -> (F, F)
where
    F: Float,
    I: IntoIterator<Item = F>,
{
    let mut n = F::zero();
    let mut mean = F::zero();
    let mut m2 = F::zero();
    for x in values {
        n = n + F::one();
        let delta = x - mean;
        mean = mean + delta / n;
        m2 = m2 + delta * (x - mean);
    }

    if n == F::zero() {
        return (F::zero(), F::zero());
    }

    (mean, (m2 / n).max(F::zero()).sqrt())
}

/// Rescales every column to zero mean and unit variance.
///
/// Parameters are estimated once, by `fit`, and then applied unchanged to any matrix with the
/// same columns.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &FeatureMatrix, policy: ZeroVariancePolicy) -> Result<Self> {
        if x.n_rows() == 0 {
            return Err(Error::InsufficientSamples {
                required: 1,
                available: 0,
            });
        }

        let mut mean = Vec::with_capacity(x.n_cols());
        let mut scale = Vec::with_capacity(x.n_cols());

        for j in 0..x.n_cols() {
            let (m, s) = mean_and_std(x.column(j));
            let s = if s > f64::EPSILON * m.abs().max(1.0) {
                s
            } else {
                match policy {
                    ZeroVariancePolicy::Reject => {
                        return Err(Error::ZeroVariance {
                            column: x.names()[j].clone(),
                        })
                    }
                    ZeroVariancePolicy::PassThrough => {
                        warn!("Column '{}' has zero variance; leaving it unscaled", x.names()[j]);
                        1.0
                    }
                }
            };
            mean.push(m);
            scale.push(s);
        }

        debug!("Fitted standardizer on {} rows", x.n_rows());
        Ok(StandardScaler { mean, scale })
    }

    pub fn transform(&self, x: &FeatureMatrix) -> Result<FeatureMatrix> {
        if x.n_cols() != self.mean.len() {
            return Err(Error::ShapeMismatch {
                expected: self.mean.len(),
                found: x.n_cols(),
            });
        }
        Ok(x.map_cells(|j, v| (v - self.mean[j]) / self.scale[j]))
    }

    /// standardize a single feature vector; the caller checks its length
    pub fn transform_row(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

/// Maps the categories of a text column to integer codes.
///
/// Codes are the rank of the category in lexicographic order. Categories that were not seen
/// during fitting map to one past the largest code.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    codes: BTreeMap<String, usize>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(values: &[S]) -> Self {
        let mut codes: BTreeMap<String, usize> =
            values.iter().map(|v| (v.as_ref().to_owned(), 0)).collect();
        for (i, code) in codes.values_mut().enumerate() {
            *code = i;
        }
        LabelEncoder { codes }
    }

    pub fn n_categories(&self) -> usize {
        self.codes.len()
    }

    pub fn encode(&self, value: &str) -> usize {
        self.codes
            .get(value)
            .cloned()
            .unwrap_or_else(|| self.codes.len())
    }

    /// encode cells by their text, whatever type their column was given on load
    pub fn encode_cells<S: AsRef<str>>(&self, cells: &[S]) -> Column {
        Column::Numeric(cells.iter().map(|s| self.encode(s.as_ref()) as f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> FeatureMatrix {
        FeatureMatrix::from_rows(
            vec!["a".to_owned(), "b".to_owned()],
            vec![
                vec![1.0, 100.0],
                vec![2.0, 300.0],
                vec![3.0, 200.0],
                vec![4.0, 400.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn standardized_training_data_has_unit_moments() {
        let x = matrix();
        let scaler = StandardScaler::fit(&x, ZeroVariancePolicy::Reject).unwrap();
        let z = scaler.transform(&x).unwrap();

        for j in 0..z.n_cols() {
            let (m, s) = mean_and_std(z.column(j));
            assert!(m.abs() < 1e-12, "mean {}", m);
            assert!((s - 1.0).abs() < 1e-12, "std {}", s);
        }
    }

    #[test]
    fn transform_uses_training_parameters() {
        let scaler = StandardScaler::fit(&matrix(), ZeroVariancePolicy::Reject).unwrap();
        let test = FeatureMatrix::from_rows(
            vec!["a".to_owned(), "b".to_owned()],
            vec![vec![2.5, 250.0]],
        )
        .unwrap();
        let z = scaler.transform(&test).unwrap();
        assert!(z.get(0, 0).abs() < 1e-12);
        assert!(z.get(0, 1).abs() < 1e-12);
    }

    #[test]
    fn constant_column_policy() {
        let x = FeatureMatrix::from_rows(
            vec!["c".to_owned()],
            vec![vec![5.0], vec![5.0], vec![5.0]],
        )
        .unwrap();

        match StandardScaler::fit(&x, ZeroVariancePolicy::Reject) {
            Err(Error::ZeroVariance { ref column }) if column == "c" => {}
            other => panic!("unexpected {:?}", other),
        }

        let scaler = StandardScaler::fit(&x, ZeroVariancePolicy::PassThrough).unwrap();
        let z = scaler.transform(&x).unwrap();
        assert!(z.column(0).all(|v| v == 0.0));
    }

    #[test]
    fn column_count_must_match() {
        let scaler = StandardScaler::fit(&matrix(), ZeroVariancePolicy::Reject).unwrap();
        let other = FeatureMatrix::from_rows(vec!["a".to_owned()], vec![vec![1.0]]).unwrap();
        assert!(scaler.transform(&other).is_err());
    }

    #[test]
    fn label_encoder_ranks_categories() {
        let enc = LabelEncoder::fit(&["USA", "UK", "France", "USA"]);
        assert_eq!(enc.n_categories(), 3);
        assert_eq!(enc.encode("France"), 0);
        assert_eq!(enc.encode("UK"), 1);
        assert_eq!(enc.encode("USA"), 2);
        assert_eq!(enc.encode("Japan"), 3);

        assert_eq!(enc.encode_cells(&["UK", "Japan"]), Column::Numeric(vec![1.0, 3.0]));
    }

    #[test]
    fn numeric_looking_cells_are_encoded_too() {
        let enc = LabelEncoder::fit(&["10", "20", "x"]);
        assert_eq!(enc.encode_cells(&["10", "20"]), Column::Numeric(vec![0.0, 1.0]));
    }

    #[test]
    fn large_offset_does_not_hide_spread() {
        let x = FeatureMatrix::from_rows(
            vec!["year".to_owned()],
            (0..4).map(|i| vec![1e9 + i as f64]).collect(),
        )
        .unwrap();
        let scaler = StandardScaler::fit(&x, ZeroVariancePolicy::Reject).unwrap();
        assert!((scaler.scale()[0] - 1.25f64.sqrt()).abs() < 1e-6);
        assert_eq!(scaler.mean()[0], 1e9 + 1.5);
    }

    #[test]
    fn large_constant_column_is_detected() {
        let x = FeatureMatrix::from_rows(
            vec!["budget".to_owned()],
            vec![vec![237000000.3]; 7],
        )
        .unwrap();
        match StandardScaler::fit(&x, ZeroVariancePolicy::Reject) {
            Err(Error::ZeroVariance { ref column }) if column == "budget" => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
