//! The train / evaluate / predict pipeline.
//!
//! A run loads the labelled data set, removes or encodes the categorical columns, holds out a
//! test subset, optionally cross-validates on the training subset, fits the configured
//! classifier, scores it on the held-out rows, and optionally predicts labels for an unlabeled
//! data set.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::export::{write_predictions, Prediction};
use crate::feature_matrix::FeatureMatrix;
use crate::measure_accumulator::accuracy;
use crate::models::{
    Estimator, GaussianNB, Model, NaiveBayesClassifier, RandomForestClassifier, RandomForestParams,
};
use crate::preprocessing::{LabelEncoder, StandardScaler, ZeroVariancePolicy};
use crate::procedures::{Holdout, KFold};
use crate::tasks::{cross_validate, CrossValidation};

/// columns holding names, free text or embeddings in the movie data set
pub const MOVIE_CATEGORICAL_COLUMNS: [&str; 11] = [
    "director_name",
    "actor_2_name",
    "genres",
    "actor_1_name",
    "movie_title",
    "actor_3_name",
    "plot_keywords",
    "title_embedding",
    "language",
    "country",
    "content_rating",
];

/// Which classifier to fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    NaiveBayes,
    RandomForest(RandomForestParams),
}

/// How to treat the configured categorical columns
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalTreatment {
    /// remove the columns
    Drop,
    /// replace text columns by integer category codes
    Encode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossValidationConfig {
    pub folds: usize,
    pub shuffle: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        CrossValidationConfig {
            folds: 10,
            shuffle: true,
        }
    }
}

/// Everything a pipeline run depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub train_path: PathBuf,
    /// unlabeled data to predict; no predictions are made without it
    pub predict_path: Option<PathBuf>,
    pub output_path: PathBuf,

    pub id_column: String,
    /// defaults to the last column of the training data
    pub label_column: Option<String>,
    /// header of the label column in the prediction output
    pub prediction_column: String,

    pub categorical_columns: Vec<String>,
    pub categorical: CategoricalTreatment,

    pub test_fraction: f64,
    /// seeds the split, the fold shuffle and the classifier
    pub seed: Option<u64>,

    pub classifier: ClassifierKind,
    pub standardize: bool,
    pub zero_variance: ZeroVariancePolicy,
    pub cross_validation: Option<CrossValidationConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::random_forest_submission()
    }
}

impl PipelineConfig {
    fn base() -> Self {
        PipelineConfig {
            train_path: PathBuf::from("train_dataset.csv"),
            predict_path: None,
            output_path: PathBuf::from("predictions.csv"),
            id_column: "id".to_owned(),
            label_column: None,
            prediction_column: "imdb_score_binned".to_owned(),
            categorical_columns: MOVIE_CATEGORICAL_COLUMNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            categorical: CategoricalTreatment::Drop,
            test_fraction: 0.2,
            seed: None,
            classifier: ClassifierKind::NaiveBayes,
            standardize: false,
            zero_variance: ZeroVariancePolicy::PassThrough,
            cross_validation: None,
        }
    }

    /// Gaussian NB on raw features with a reproducible 80/20 split
    pub fn naive_bayes_baseline() -> Self {
        PipelineConfig {
            seed: Some(42),
            ..PipelineConfig::base()
        }
    }

    /// Gaussian NB on standardized features, with 10-fold cross-validation
    pub fn naive_bayes_standardized_cv() -> Self {
        PipelineConfig {
            standardize: true,
            cross_validation: Some(CrossValidationConfig::default()),
            ..PipelineConfig::base()
        }
    }

    /// Random forest on standardized features with 10-fold cross-validation, predicting the
    /// unlabeled test set
    pub fn random_forest_submission() -> Self {
        PipelineConfig {
            classifier: ClassifierKind::RandomForest(RandomForestParams::default()),
            standardize: true,
            cross_validation: Some(CrossValidationConfig::default()),
            predict_path: Some(PathBuf::from("test_dataset.csv")),
            ..PipelineConfig::base()
        }
    }

    /// read a JSON configuration; missing fields take their default values
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// reject settings that would fail later, before any data is read
    pub fn validate(&self) -> Result<()> {
        Holdout::new(self.test_fraction, self.seed)?;

        if let Some(ref cv) = self.cross_validation {
            if cv.folds < 2 {
                return Err(Error::InvalidParameter(format!(
                    "cross-validation needs at least 2 folds, got {}",
                    cv.folds
                )));
            }
        }

        if let ClassifierKind::RandomForest(ref p) = self.classifier {
            if p.n_trees == 0 {
                return Err(Error::InvalidParameter(
                    "a random forest needs at least one tree".to_owned(),
                ));
            }
        }

        if let Some(ref label) = self.label_column {
            if label == &self.id_column || self.categorical_columns.contains(label) {
                return Err(Error::InvalidParameter(format!(
                    "label column '{}' is also configured as an id or categorical column",
                    label
                )));
            }
        }

        Ok(())
    }

    fn classifier_spec(&self) -> ClassifierSpec {
        let kind = match self.classifier {
            ClassifierKind::RandomForest(ref p) => ClassifierKind::RandomForest(RandomForestParams {
                seed: p.seed.or(self.seed),
                ..p.clone()
            }),
            ref other => other.clone(),
        };
        ClassifierSpec {
            kind,
            standardize: self.standardize,
            zero_variance: self.zero_variance,
        }
    }
}

/// Classifier plus optional standardization, fitted as one unit so that the scaler only ever
/// sees the rows the classifier is trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierSpec {
    pub kind: ClassifierKind,
    pub standardize: bool,
    pub zero_variance: ZeroVariancePolicy,
}

#[derive(Debug)]
enum FittedClassifier<C: Ord> {
    NaiveBayes(NaiveBayesClassifier<C>),
    RandomForest(RandomForestClassifier<C>),
}

/// A fitted `ClassifierSpec`
#[derive(Debug)]
pub struct FittedModel<C: Ord> {
    scaler: Option<StandardScaler>,
    classifier: FittedClassifier<C>,
    n_features: usize,
}

impl<C> Estimator<C> for ClassifierSpec
where
    C: Ord + Clone,
{
    type Model = FittedModel<C>;

    fn fit(&self, x: &FeatureMatrix, y: &[C]) -> Result<FittedModel<C>> {
        let scaler = if self.standardize {
            Some(StandardScaler::fit(x, self.zero_variance)?)
        } else {
            None
        };

        let scaled;
        let x = match scaler {
            Some(ref s) => {
                scaled = s.transform(x)?;
                &scaled
            }
            None => x,
        };

        let classifier = match self.kind {
            ClassifierKind::NaiveBayes => FittedClassifier::NaiveBayes(GaussianNB::default().fit(x, y)?),
            ClassifierKind::RandomForest(ref p) => FittedClassifier::RandomForest(p.fit(x, y)?),
        };

        Ok(FittedModel {
            scaler,
            classifier,
            n_features: x.n_cols(),
        })
    }
}

impl<C: Ord + Clone> FittedModel<C> {
    fn classify(&self, x: &[f64]) -> C {
        match self.classifier {
            FittedClassifier::NaiveBayes(ref m) => m.predict_one(x),
            FittedClassifier::RandomForest(ref m) => m.predict_one(x),
        }
    }
}

impl<C: Ord + Clone> Model<C> for FittedModel<C> {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_one(&self, x: &[f64]) -> C {
        match self.scaler {
            Some(ref s) => self.classify(&s.transform_row(x)),
            None => self.classify(x),
        }
    }

    fn predict(&self, x: &FeatureMatrix) -> Result<Vec<C>> {
        if x.n_cols() != self.n_features {
            return Err(Error::ShapeMismatch {
                expected: self.n_features,
                found: x.n_cols(),
            });
        }
        let scaled;
        let x = match self.scaler {
            Some(ref s) => {
                scaled = s.transform(x)?;
                &scaled
            }
            None => x,
        };
        Ok(x.rows().map(|row| self.classify(row)).collect())
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub n_rows: usize,
    pub n_features: usize,
    pub feature_names: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub test_accuracy: f64,
    /// true labels of the held-out rows
    pub test_labels: Vec<String>,
    /// predicted labels of the held-out rows, in the same order
    pub test_predictions: Vec<String>,
    pub cross_validation: Option<CrossValidation>,
    /// predictions for the unlabeled data set, in input order
    pub predictions: Option<Vec<Prediction>>,
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Rows: {} ({} train, {} test), {} features",
            self.n_rows,
            self.n_train,
            self.n_test,
            self.n_features
        )?;
        if let Some(ref cv) = self.cross_validation {
            writeln!(f, "K-Folds Accuracy: {}", cv)?;
            writeln!(f, "K-Folds Mean Accuracy: {}", cv.mean())?;
        }
        write!(f, "Test Split Accuracy: {}", self.test_accuracy)?;
        if let Some(ref p) = self.predictions {
            write!(f, "\nPredicted {} unlabeled rows", p.len())?;
        }
        Ok(())
    }
}

/// Encoders fitted on the training data, applied again to the unlabeled data
struct ColumnPlan {
    encoders: Vec<(String, LabelEncoder)>,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Pipeline { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured files, run, and write the predictions if any were made.
    pub fn run(&self) -> Result<PipelineReport> {
        let train = DataSet::from_csv_path(&self.config.train_path)?;
        let unlabeled = match self.config.predict_path {
            Some(ref p) => Some(DataSet::from_csv_path(p)?),
            None => None,
        };

        let report = self.run_on(train, unlabeled)?;

        if let Some(ref predictions) = report.predictions {
            write_predictions(
                &self.config.output_path,
                predictions,
                &self.config.id_column,
                &self.config.prediction_column,
            )?;
        }
        Ok(report)
    }

    /// Run on data sets already in memory. Nothing is written.
    pub fn run_on(&self, train: DataSet, unlabeled: Option<DataSet>) -> Result<PipelineReport> {
        let config = &self.config;
        let label = match config.label_column {
            Some(ref l) => l.clone(),
            None => train
                .last_column()
                .map(str::to_owned)
                .ok_or_else(|| Error::Parse("training data has no columns".to_owned()))?,
        };
        if label == config.id_column || config.categorical_columns.contains(&label) {
            return Err(Error::InvalidParameter(format!(
                "label column '{}' is also configured as an id or categorical column",
                label
            )));
        }

        let n_rows = train.n_rows();
        let (train, plan) = self.prepare_training(train)?;
        let (x, y) = train.into_supervised(&label)?;
        info!(
            "Predicting '{}' from {} features: {}",
            label,
            x.n_cols(),
            x.names().join(", ")
        );

        let fold = Holdout::new(config.test_fraction, config.seed)?.split(x.n_rows())?;
        let x_train = x.select_rows(&fold.trainset);
        let x_test = x.select_rows(&fold.testset);
        let y_train: Vec<String> = fold.trainset.iter().map(|&i| y[i].clone()).collect();
        let y_test: Vec<String> = fold.testset.iter().map(|&i| y[i].clone()).collect();

        let estimator = config.classifier_spec();

        let cross_validation = match config.cross_validation {
            Some(ref cv) => {
                let kfold = KFold::new(cv.folds)
                    .with_shuffle(cv.shuffle)
                    .with_seed(config.seed);
                Some(cross_validate(&estimator, &x_train, &y_train, &kfold)?)
            }
            None => None,
        };

        let model = estimator.fit(&x_train, &y_train)?;
        let test_predictions = model.predict(&x_test)?;
        let test_accuracy = accuracy(&y_test, &test_predictions);
        info!("Test split accuracy: {:.4}", test_accuracy);

        let predictions = match unlabeled {
            Some(data) => Some(self.predict_unlabeled(&model, &plan, x.names(), data)?),
            None => None,
        };

        Ok(PipelineReport {
            n_rows,
            n_features: x.n_cols(),
            feature_names: x.names().to_vec(),
            n_train: x_train.n_rows(),
            n_test: x_test.n_rows(),
            test_accuracy,
            test_labels: y_test,
            test_predictions,
            cross_validation,
            predictions,
        })
    }

    fn prepare_training(&self, data: DataSet) -> Result<(DataSet, ColumnPlan)> {
        let config = &self.config;
        let data = if data.has_column(&config.id_column) {
            data.drop_columns(&[config.id_column.as_str()])?
        } else {
            debug!("Training data has no '{}' column", config.id_column);
            data
        };

        match config.categorical {
            CategoricalTreatment::Drop => {
                let data = data.drop_columns(&config.categorical_columns[..])?;
                Ok((data, ColumnPlan { encoders: vec![] }))
            }
            CategoricalTreatment::Encode => {
                let mut data = data;
                let mut encoders = Vec::new();
                for name in &config.categorical_columns {
                    // numeric training columns stay features; text at inference is rejected
                    if data.column(name)?.is_numeric() {
                        continue;
                    }
                    let cells = data.cells(name)?;
                    let enc = LabelEncoder::fit(cells);
                    debug!("Encoding '{}' with {} categories", name, enc.n_categories());
                    let encoded = enc.encode_cells(cells);
                    data = data.with_column(name, encoded)?;
                    encoders.push((name.clone(), enc));
                }
                Ok((data, ColumnPlan { encoders }))
            }
        }
    }

    fn predict_unlabeled(
        &self,
        model: &FittedModel<String>,
        plan: &ColumnPlan,
        feature_names: &[String],
        data: DataSet,
    ) -> Result<Vec<Prediction>> {
        let (ids, data) = self.prepare_unlabeled(plan, data)?;

        let x = data.project(feature_names)?.into_features()?;
        let labels = model.predict(&x)?;
        info!("Predicted {} unlabeled rows", labels.len());

        Ok(ids
            .into_iter()
            .zip(labels)
            .map(|(id, label)| Prediction { id, label })
            .collect())
    }

    /// Take the row ids, as written in the input, and apply the training column treatment.
    fn prepare_unlabeled(&self, plan: &ColumnPlan, data: DataSet) -> Result<(Vec<String>, DataSet)> {
        let config = &self.config;
        let ids = data.cells(&config.id_column)?.to_vec();

        let mut data = match config.categorical {
            CategoricalTreatment::Drop => data.drop_columns(&config.categorical_columns[..])?,
            CategoricalTreatment::Encode => data,
        };
        for &(ref name, ref enc) in &plan.encoders {
            let encoded = enc.encode_cells(data.cells(name)?);
            data = data.with_column(name, encoded)?;
        }

        if let Some(ref label) = config.label_column {
            if data.has_column(label) {
                warn!("Unlabeled data contains the label column '{}'; ignoring it", label);
            }
        }

        Ok((ids, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    /// `n` rows with five numeric features, an alternating binary label, and one text column
    fn synthetic(n: usize, with_label: bool, first_id: usize) -> DataSet {
        let mut columns = vec![(
            "id".to_owned(),
            Column::Numeric((0..n).map(|i| (first_id + i) as f64).collect()),
        )];
        for f in 0..5 {
            let values = (0..n)
                .map(|i| {
                    let class = (i % 2) as f64;
                    class * 2.0 + ((i * (f + 3)) % 7) as f64 / 7.0
                })
                .collect();
            columns.push((format!("f{}", f), Column::Numeric(values)));
        }
        columns.push((
            "country".to_owned(),
            Column::Categorical((0..n).map(|i| ["USA", "UK", "France"][i % 3].to_owned()).collect()),
        ));
        if with_label {
            columns.push((
                "imdb_score_binned".to_owned(),
                Column::Numeric((0..n).map(|i| (i % 2) as f64).collect()),
            ));
        }
        DataSet::new(columns).unwrap()
    }

    fn config(classifier: ClassifierKind) -> PipelineConfig {
        PipelineConfig {
            categorical_columns: vec!["country".to_owned()],
            seed: Some(42),
            classifier,
            ..PipelineConfig::base()
        }
    }

    fn small_forest() -> ClassifierKind {
        ClassifierKind::RandomForest(RandomForestParams {
            n_trees: 10,
            ..RandomForestParams::default()
        })
    }

    #[test]
    fn end_to_end_is_reproducible() {
        let pipeline = Pipeline::new(config(small_forest())).unwrap();

        let a = pipeline.run_on(synthetic(100, true, 0), None).unwrap();
        let b = pipeline.run_on(synthetic(100, true, 0), None).unwrap();

        assert_eq!(a.n_test, 20);
        assert_eq!(a.n_train, 80);
        assert_eq!(a.n_features, 5);
        assert_eq!(a.feature_names, vec!["f0", "f1", "f2", "f3", "f4"]);
        assert!(a.test_accuracy >= 0.0 && a.test_accuracy <= 1.0);
        assert_eq!(a.test_predictions, b.test_predictions);
        assert_eq!(a.test_labels, b.test_labels);
    }

    #[test]
    fn naive_bayes_with_standardization_and_cv() {
        let cfg = PipelineConfig {
            standardize: true,
            cross_validation: Some(CrossValidationConfig::default()),
            ..config(ClassifierKind::NaiveBayes)
        };
        let report = Pipeline::new(cfg).unwrap().run_on(synthetic(100, true, 0), None).unwrap();

        let summary = report.to_string();
        assert!(summary.starts_with("Rows: 100 (80 train, 20 test), 5 features"));
        assert!(summary.contains("K-Folds Mean Accuracy: "));

        let cv = report.cross_validation.unwrap();
        assert_eq!(cv.n_folds(), 10);
        assert!(cv.scores().iter().all(|&s| s >= 0.0 && s <= 1.0));
        assert!(report.test_accuracy > 0.9);
    }

    #[test]
    fn unlabeled_rows_keep_their_ids_and_order() {
        let cfg = PipelineConfig {
            standardize: true,
            ..config(small_forest())
        };
        let report = Pipeline::new(cfg)
            .unwrap()
            .run_on(synthetic(100, true, 0), Some(synthetic(10, false, 101)))
            .unwrap();

        let predictions = report.predictions.unwrap();
        let ids: Vec<_> = predictions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["101", "102", "103", "104", "105", "106", "107", "108", "109", "110"]
        );
        assert!(predictions.iter().all(|p| p.label == "0" || p.label == "1"));
    }

    #[test]
    fn encoded_categories_become_features() {
        let cfg = PipelineConfig {
            categorical: CategoricalTreatment::Encode,
            ..config(ClassifierKind::NaiveBayes)
        };
        let report = Pipeline::new(cfg)
            .unwrap()
            .run_on(synthetic(50, true, 0), Some(synthetic(5, false, 1)))
            .unwrap();
        assert!(report.feature_names.contains(&"country".to_owned()));
        assert_eq!(report.predictions.unwrap().len(), 5);
    }

    #[test]
    fn missing_categorical_column_is_reported() {
        let cfg = PipelineConfig {
            categorical_columns: vec!["country".to_owned(), "language".to_owned()],
            ..config(ClassifierKind::NaiveBayes)
        };
        match Pipeline::new(cfg).unwrap().run_on(synthetic(20, true, 0), None) {
            Err(Error::ColumnNotFound(ref c)) if c == "language" => {}
            other => panic!("unexpected {:?}", other.map(|r| r.test_accuracy)),
        }
    }

    #[test]
    fn text_column_left_in_features_is_reported() {
        let cfg = PipelineConfig {
            categorical_columns: vec![],
            ..config(ClassifierKind::NaiveBayes)
        };
        match Pipeline::new(cfg).unwrap().run_on(synthetic(20, true, 0), None) {
            Err(Error::NonNumericColumn(ref c)) if c == "country" => {}
            other => panic!("unexpected {:?}", other.map(|r| r.test_accuracy)),
        }
    }

    #[test]
    fn too_many_folds_for_training_rows() {
        let cfg = PipelineConfig {
            cross_validation: Some(CrossValidationConfig {
                folds: 10,
                shuffle: false,
            }),
            ..config(ClassifierKind::NaiveBayes)
        };
        // 10 rows leave 8 for training
        match Pipeline::new(cfg).unwrap().run_on(synthetic(10, true, 0), None) {
            Err(Error::InsufficientSamples {
                required: 10,
                available: 8,
            }) => {}
            other => panic!("unexpected {:?}", other.map(|r| r.test_accuracy)),
        }
    }

    #[test]
    fn invalid_configs_are_rejected_up_front() {
        let bad_fraction = PipelineConfig {
            test_fraction: 1.5,
            ..PipelineConfig::base()
        };
        assert!(Pipeline::new(bad_fraction).is_err());

        let bad_folds = PipelineConfig {
            cross_validation: Some(CrossValidationConfig {
                folds: 1,
                shuffle: true,
            }),
            ..PipelineConfig::base()
        };
        assert!(bad_folds.validate().is_err());
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(
            r#"{
                "classifier": {"random_forest": {"n_trees": 20}},
                "categorical": "encode",
                "seed": 7,
                "predict_path": null
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.categorical, CategoricalTreatment::Encode);
        assert_eq!(cfg.predict_path, None);
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.categorical_columns.len(), MOVIE_CATEGORICAL_COLUMNS.len());
        match cfg.classifier_spec().kind {
            ClassifierKind::RandomForest(ref p) => {
                assert_eq!(p.n_trees, 20);
                assert_eq!(p.seed, Some(7));
            }
            ref other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn run_reads_and_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let train_path = dir.path().join("train.csv");
        let test_path = dir.path().join("test.csv");
        let out_path = dir.path().join("predictions.csv");

        let mut train = String::from("id,country,a,b,imdb_score_binned\n");
        for i in 0..40 {
            let class = i % 2;
            train.push_str(&format!("{},UK,{},{},{}\n", i, class * 10 + i % 3, i % 5, class));
        }
        fs::write(&train_path, train).unwrap();
        fs::write(&test_path, "id,country,a,b\n101,UK,0,1\n102,USA,11,2\n").unwrap();

        let cfg = PipelineConfig {
            train_path: train_path.clone(),
            predict_path: Some(test_path),
            output_path: out_path.clone(),
            ..config(ClassifierKind::NaiveBayes)
        };
        let report = Pipeline::new(cfg).unwrap().run().unwrap();
        assert_eq!(report.n_rows, 40);

        let written = fs::read_to_string(&out_path).unwrap();
        assert_eq!(written, "id,imdb_score_binned\n101,0\n102,1\n");
    }

    /// `synthetic` plus every movie text column, as the presets expect
    fn movie_like(n: usize) -> DataSet {
        let mut columns: Vec<(String, Column)> = Vec::new();
        let base = synthetic(n, true, 0);
        for name in base.names() {
            if name != "country" {
                columns.push((name.clone(), base.column(name).unwrap().clone()));
            }
        }
        for name in MOVIE_CATEGORICAL_COLUMNS.iter() {
            let values = (0..n).map(|i| format!("{} {}", name, i % 4)).collect();
            columns.insert(1, (name.to_string(), Column::Categorical(values)));
        }
        DataSet::new(columns).unwrap()
    }

    #[test]
    fn presets_run_on_movie_columns() {
        let presets = vec![
            PipelineConfig::naive_bayes_baseline(),
            PipelineConfig::naive_bayes_standardized_cv(),
            PipelineConfig {
                seed: Some(3),
                ..PipelineConfig::random_forest_submission()
            },
        ];
        for preset in presets {
            let with_cv = preset.cross_validation.is_some();
            let report = Pipeline::new(preset).unwrap().run_on(movie_like(100), None).unwrap();
            assert_eq!(report.n_features, 5);
            assert_eq!(report.n_test, 20);
            assert_eq!(report.cross_validation.is_some(), with_cv);
            assert!(report.test_accuracy >= 0.0 && report.test_accuracy <= 1.0);
        }
    }

    #[test]
    fn ids_are_written_back_as_read() {
        let mut text = String::from("id,f0,f1,f2,f3,f4,country\n");
        for id in &["007", "1.50", "12345678901234567891"] {
            text.push_str(&format!("{},0.1,0.2,0.3,0.4,0.5,UK\n", id));
        }
        let unlabeled = DataSet::from_reader(text.as_bytes()).unwrap();

        let report = Pipeline::new(config(ClassifierKind::NaiveBayes))
            .unwrap()
            .run_on(synthetic(40, true, 0), Some(unlabeled))
            .unwrap();

        let ids: Vec<_> = report
            .predictions
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["007", "1.50", "12345678901234567891"]);
    }

    #[test]
    fn encoding_follows_cell_text_at_inference() {
        let train = DataSet::from_reader("id,country,a,label\n1,10,0.5,x\n2,20,1.5,y\n3,x,2.5,x\n".as_bytes())
            .unwrap();
        let unlabeled = DataSet::from_reader("id,country,a\n7,10,0.5\n8,20,1.5\n".as_bytes()).unwrap();
        assert!(unlabeled.column("country").unwrap().is_numeric());

        let cfg = PipelineConfig {
            categorical: CategoricalTreatment::Encode,
            ..config(ClassifierKind::NaiveBayes)
        };
        let pipeline = Pipeline::new(cfg).unwrap();
        let (train, plan) = pipeline.prepare_training(train).unwrap();
        assert_eq!(train.column("country").unwrap(), &Column::Numeric(vec![0.0, 1.0, 2.0]));

        let (ids, data) = pipeline.prepare_unlabeled(&plan, unlabeled).unwrap();
        assert_eq!(ids, vec!["7", "8"]);
        assert_eq!(data.column("country").unwrap(), &Column::Numeric(vec![0.0, 1.0]));
    }
}
