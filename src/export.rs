//! Writing predictions for unlabeled data.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use log::info;

use crate::error::Result;
use crate::file_lock::LockedFile;

/// Predicted label of one unlabeled row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub id: String,
    pub label: String,
}

/// Write `id_header,label_header` followed by one row per prediction, in order.
pub fn write_predictions_to<W: Write>(
    writer: W,
    predictions: &[Prediction],
    id_header: &str,
    label_header: &str,
) -> Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(&[id_header, label_header])?;
    for p in predictions {
        w.write_record(&[p.id.as_str(), p.label.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

/// Write predictions to a CSV file, replacing any existing file.
pub fn write_predictions<P: AsRef<Path>>(
    path: P,
    predictions: &[Prediction],
    id_header: &str,
    label_header: &str,
) -> Result<()> {
    let path = path.as_ref();
    let file = LockedFile::create_exclusive(path)?;
    write_predictions_to(file, predictions, id_header, label_header)?;
    info!("Wrote {} predictions to {}", predictions.len(), path.display());
    Ok(())
}
