//! Tabular data sets loaded from delimited text files.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::{debug, info};

use crate::error::{Error, Result};
use crate::feature_matrix::FeatureMatrix;
use crate::file_lock::LockedFile;

/// A single column of a data set
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// every cell is a finite number
    Numeric(Vec<f64>),
    /// at least one cell is not a number
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match *self {
            Column::Numeric(ref v) => v.len(),
            Column::Categorical(ref v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        match *self {
            Column::Numeric(_) => true,
            Column::Categorical(_) => false,
        }
    }

    /// cell `i` rendered as text
    pub fn text(&self, i: usize) -> String {
        match *self {
            Column::Numeric(ref v) => v[i].to_string(),
            Column::Categorical(ref v) => v[i].clone(),
        }
    }

    fn from_cells(cells: &[String]) -> Column {
        let numbers: Option<Vec<f64>> = cells
            .iter()
            .map(|c| c.parse::<f64>().ok().filter(|x| x.is_finite()))
            .collect();

        match numbers {
            Some(v) => Column::Numeric(v),
            None => Column::Categorical(cells.to_vec()),
        }
    }
}

/// An immutable table. Column operations return new data sets.
///
/// Besides the typed columns, every cell keeps the text it was read from, so identifiers and
/// labels can be written back exactly as they appeared in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    names: Vec<String>,
    columns: Vec<Column>,
    cells: Vec<Vec<String>>,
    n_rows: usize,
}

impl DataSet {
    /// build a data set from named columns of equal length
    pub fn new(columns: Vec<(String, Column)>) -> Result<Self> {
        let entries = columns
            .into_iter()
            .map(|(name, col)| {
                let cells = (0..col.len()).map(|i| col.text(i)).collect();
                (name, col, cells)
            })
            .collect();
        DataSet::assemble(entries)
    }

    fn assemble(entries: Vec<(String, Column, Vec<String>)>) -> Result<Self> {
        let n_rows = entries.first().map(|(_, c, _)| c.len()).unwrap_or(0);
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(entries.len());
        let mut columns = Vec::with_capacity(entries.len());
        let mut cells = Vec::with_capacity(entries.len());

        for (name, col, text) in entries {
            if col.len() != n_rows || text.len() != n_rows {
                return Err(Error::ShapeMismatch {
                    expected: n_rows,
                    found: col.len(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(Error::Parse(format!("duplicate column name '{}'", name)));
            }
            names.push(name);
            columns.push(col);
            cells.push(text);
        }

        Ok(DataSet {
            names,
            columns,
            cells,
            n_rows,
        })
    }

    /// load a comma separated file with a header row
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        info!("Loading {}", path.display());
        let file = LockedFile::open_shared(path)?;
        debug!("Holding {} lock on {}", file.mode(), path.display());
        let data = DataSet::from_reader(file)?;
        info!(
            "Loaded {} rows and {} columns from {}",
            data.n_rows(),
            data.n_cols(),
            path.display()
        );
        Ok(data)
    }

    /// parse comma separated data with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| Error::Parse(e.to_string()))?
            .iter()
            .map(str::to_owned)
            .collect();

        if header.is_empty() || header.iter().all(String::is_empty) {
            return Err(Error::Parse("missing header row".to_owned()));
        }

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); header.len()];
        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(|e| Error::Parse(format!("row {}: {}", i + 1, e)))?;
            for (j, cell) in record.iter().enumerate() {
                cells[j].push(cell.to_owned());
            }
        }

        if cells[0].is_empty() {
            return Err(Error::Parse("table has no data rows".to_owned()));
        }

        let entries = header
            .into_iter()
            .zip(cells)
            .map(|(name, c)| (name, Column::from_cells(&c), c))
            .collect();

        DataSet::assemble(entries)
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

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|j| &self.columns[j])
            .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))
    }

    /// the cells of a column as they were read
    pub fn cells(&self, name: &str) -> Result<&[String]> {
        self.position(name)
            .map(|j| self.cells[j].as_slice())
            .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))
    }

    /// name of the last column, the default label column
    pub fn last_column(&self) -> Option<&str> {
        self.names.last().map(String::as_str)
    }

    /// new data set without the listed columns; all listed columns must exist
    pub fn drop_columns<S: AsRef<str>>(&self, drop: &[S]) -> Result<DataSet> {
        for name in drop {
            self.column(name.as_ref())?;
        }

        let keep: Vec<_> = self
            .names
            .iter()
            .filter(|n| !drop.iter().any(|d| d.as_ref() == n.as_str()))
            .cloned()
            .collect();

        debug!("Dropping {} columns, keeping {}", drop.len(), keep.len());
        self.project(&keep)
    }

    /// new data set with exactly the named columns, in the given order
    pub fn project<S: AsRef<str>>(&self, keep: &[S]) -> Result<DataSet> {
        let entries = keep
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.position(n)
                    .map(|j| (n.to_owned(), self.columns[j].clone(), self.cells[j].clone()))
                    .ok_or_else(|| Error::ColumnNotFound(n.to_owned()))
            })
            .collect::<Result<Vec<_>>>()?;
        DataSet::assemble(entries)
    }

    /// new data set with one column replaced
    pub fn with_column(&self, name: &str, column: Column) -> Result<DataSet> {
        let j = self
            .position(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_owned()))?;
        if column.len() != self.n_rows {
            return Err(Error::ShapeMismatch {
                expected: self.n_rows,
                found: column.len(),
            });
        }
        let mut data = self.clone();
        data.cells[j] = (0..column.len()).map(|i| column.text(i)).collect();
        data.columns[j] = column;
        Ok(data)
    }

    /// split off the label column, keeping its text; everything else must be numeric
    pub fn into_supervised(self, label: &str) -> Result<(FeatureMatrix, Vec<String>)> {
        let j = self
            .position(label)
            .ok_or_else(|| Error::ColumnNotFound(label.to_owned()))?;

        let mut names = self.names;
        let mut columns = self.columns;
        let mut cells = self.cells;
        names.remove(j);
        columns.remove(j);
        let labels = cells.remove(j);

        let features = numeric_matrix(names, columns, self.n_rows)?;
        Ok((features, labels))
    }

    /// all columns as features; every column must be numeric
    pub fn into_features(self) -> Result<FeatureMatrix> {
        numeric_matrix(self.names, self.columns, self.n_rows)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

fn numeric_matrix(names: Vec<String>, columns: Vec<Column>, n_rows: usize) -> Result<FeatureMatrix> {
    if names.is_empty() {
        return Err(Error::InvalidParameter("no feature columns left".to_owned()));
    }

    let columns = names
        .into_iter()
        .zip(columns)
        .map(|(name, col)| match col {
            Column::Numeric(v) => Ok((name, v)),
            Column::Categorical(_) => Err(Error::NonNumericColumn(name)),
        })
        .collect::<Result<Vec<_>>>()?;

    let m = FeatureMatrix::from_columns(columns)?;
    debug_assert_eq!(m.n_rows(), n_rows);
    Ok(m)
}
