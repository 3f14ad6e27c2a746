use crate::core::service::PredictionService;
use crate::domain::model::PredictionRequest;
use crate::utils::error::{PredictorError, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    district: &'a str,
    latitude: &'a str,
    longitude: &'a str,
    prediction_ug_per_l: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Predicts every `district,latitude,longitude` row of `input` into `output`.
///
/// Row failures, including rows with the wrong number of fields, are written
/// to the `error` column; only I/O errors abort.
pub fn run_batch<R: Read, W: Write>(
    service: &PredictionService,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    let headers = reader.headers()?.clone();
    let columns = ["district", "latitude", "longitude"]
        .map(|name| headers.iter().position(|h| h == name));

    for record in reader.records() {
        summary.processed += 1;

        let (request, result) = match record {
            Ok(record) => {
                let [district, latitude, longitude] =
                    columns.map(|c| c.and_then(|i| record.get(i)).unwrap_or(""));
                let request = PredictionRequest::new(district, latitude, longitude);
                let checked = if record.len() != headers.len() {
                    Err(PredictorError::validation(format!(
                        "Row has {} fields but the header has {}",
                        record.len(),
                        headers.len()
                    )))
                } else {
                    service.submit(&request)
                };
                (request, checked)
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => (PredictionRequest::default(), Err(e.into())),
        };

        let (prediction, error) = match result {
            Ok(p) => {
                summary.succeeded += 1;
                (Some(format!("{:.2}", p.prediction)), None)
            }
            Err(e) => {
                summary.failed += 1;
                tracing::debug!("Row {} failed: {}", summary.processed, e);
                (None, Some(e.user_friendly_message()))
            }
        };

        writer.serialize(BatchRow {
            district: &request.district,
            latitude: &request.latitude,
            longitude: &request.longitude,
            prediction_ug_per_l: prediction,
            error,
        })?;
    }

    writer.flush()?;
    Ok(summary)
}

pub fn run_batch_files(
    service: &PredictionService,
    input_path: &Path,
    output_path: &Path,
) -> Result<BatchSummary> {
    tracing::info!("📥 Reading batch input from: {}", input_path.display());
    let input = std::fs::File::open(input_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let output = std::fs::File::create(output_path)?;

    let summary = run_batch(service, input, output)?;
    tracing::info!(
        "📊 Batch finished - processed: {}, succeeded: {}, failed: {}",
        summary.processed,
        summary.succeeded,
        summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureRecord;
    use crate::domain::ports::Predictor;
    use std::sync::Arc;

    struct LatitudeEcho;

    impl Predictor for LatitudeEcho {
        fn predict(&self, record: &FeatureRecord) -> Result<f64> {
            Ok(record.latitude / 10.0)
        }
    }

    #[test]
    fn test_rows_fail_independently() {
        let service = PredictionService::with_predictor(Arc::new(LatitudeEcho));
        let input = "district,latitude,longitude\n\
                     Ludhiana,30.9,75.85\n\
                     Ludhiana,40.0,75.85\n\
                     Amritsar, abc ,74.87\n\
                     Sangrur,30.25,75.84\n";
        let mut output = Vec::new();

        let summary = run_batch(&service, input.as_bytes(), &mut output).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                processed: 4,
                succeeded: 2,
                failed: 2
            }
        );

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "district,latitude,longitude,prediction_ug_per_l,error"
        );
        assert_eq!(lines[1], "Ludhiana,30.9,75.85,3.09,");
        assert_eq!(
            lines[2],
            "Ludhiana,40.0,75.85,,Latitude/Longitude out of valid region range."
        );
        assert_eq!(
            lines[3],
            "Amritsar,abc,74.87,,Latitude and Longitude must be valid numbers."
        );
        assert_eq!(lines[4], "Sangrur,30.25,75.84,3.02,");
    }

    #[test]
    fn test_missing_column_is_row_error() {
        let service = PredictionService::with_predictor(Arc::new(LatitudeEcho));
        let input = "district,latitude\nLudhiana,30.9\n";
        let mut output = Vec::new();
        // longitude 欄位缺少時以空字串處理，視為非數字
        let summary = run_batch(&service, input.as_bytes(), &mut output).unwrap();
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_ragged_row_does_not_abort() {
        let service = PredictionService::with_predictor(Arc::new(LatitudeEcho));
        let input = "district,latitude,longitude\n\
                     Ludhiana,30.9,75.85\n\
                     Moga,30.8,75.17,extra\n\
                     Mansa,30.0,75.4\n";
        let mut output = Vec::new();

        let summary = run_batch(&service, input.as_bytes(), &mut output).unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                processed: 3,
                succeeded: 2,
                failed: 1
            }
        );

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Ludhiana,30.9,75.85,3.09,");
        assert_eq!(
            lines[2],
            "Moga,30.8,75.17,,Row has 4 fields but the header has 3"
        );
        assert_eq!(lines[3], "Mansa,30.0,75.4,3.00,");
    }
}
