//! Dense numeric feature storage.

use crate::error::{Error, Result};

/// Row-major matrix of numeric features with named columns.
///
/// Row `i` occupies `data[i * n_cols..(i + 1) * n_cols]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    n_rows: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// build a matrix from row-major data
    pub fn new(names: Vec<String>, n_rows: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != n_rows * names.len() {
            return Err(Error::ShapeMismatch {
                expected: n_rows * names.len(),
                found: data.len(),
            });
        }
        Ok(FeatureMatrix {
            names,
            n_rows,
            data,
        })
    }

    /// build a matrix from a list of rows; every row must have one value per name
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let mut data = Vec::with_capacity(n_rows * names.len());
        for row in rows {
            if row.len() != names.len() {
                return Err(Error::ShapeMismatch {
                    expected: names.len(),
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        FeatureMatrix::new(names, n_rows, data)
    }

    /// build a matrix from named columns of equal length
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let n_cols = columns.len();
        let mut data = vec![0.0; n_rows * n_cols];
        let mut names = Vec::with_capacity(n_cols);

        for (j, (name, values)) in columns.into_iter().enumerate() {
            if values.len() != n_rows {
                return Err(Error::ShapeMismatch {
                    expected: n_rows,
                    found: values.len(),
                });
            }
            for (i, v) in values.into_iter().enumerate() {
                data[i * n_cols + j] = v;
            }
            names.push(name);
        }

        FeatureMatrix::new(names, n_rows, data)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n_cols() + col]
    }

    #[inline(always)]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n_cols();
        &self.data[i * n..(i + 1) * n]
    }

    pub fn rows<'a>(&'a self) -> impl Iterator<Item = &'a [f64]> + 'a {
        (0..self.n_rows).map(move |i| self.row(i))
    }

    pub fn column<'a>(&'a self, j: usize) -> impl Iterator<Item = f64> + 'a {
        (0..self.n_rows).map(move |i| self.get(i, j))
    }

    /// new matrix holding the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> FeatureMatrix {
        let mut data = Vec::with_capacity(indices.len() * self.n_cols());
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        FeatureMatrix {
            names: self.names.clone(),
            n_rows: indices.len(),
            data,
        }
    }

    /// apply `f(column, value)` to every cell
    pub(crate) fn map_cells<F>(&self, f: F) -> FeatureMatrix
    where
        F: Fn(usize, f64) -> f64,
    {
        let n = self.n_cols();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, &v)| f(k % n, v))
            .collect();
        FeatureMatrix {
            names: self.names.clone(),
            n_rows: self.n_rows,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{}", i)).collect()
    }

    #[test]
    fn rows_and_columns_agree() {
        let m = FeatureMatrix::from_rows(names(2), vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.column(1).collect::<Vec<_>>(), vec![2.0, 4.0]);

        let c = FeatureMatrix::from_columns(vec![
            ("f0".to_owned(), vec![1.0, 3.0]),
            ("f1".to_owned(), vec![2.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(m, c);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let r = FeatureMatrix::from_rows(names(2), vec![vec![1.0, 2.0], vec![3.0]]);
        match r {
            Err(Error::ShapeMismatch { expected: 2, found: 1 }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn select_rows_keeps_order() {
        let m = FeatureMatrix::from_rows(names(1), vec![vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let s = m.select_rows(&[2, 0]);
        assert_eq!(s.n_rows(), 2);
        assert_eq!(s.rows().collect::<Vec<_>>(), vec![&[2.0][..], &[0.0][..]]);
    }

    #[test]
    fn matrix_without_columns_still_counts_rows() {
        let m = FeatureMatrix::new(vec![], 3, vec![]).unwrap();
        assert_eq!(m.rows().count(), 3);
    }
}
