use crate::metrics::{Metrics, METRIC_COLUMNS};
use crate::report::ReportError;
use std::io::Write;
use std::path::Path;
use tracing::info;

//NaN is written as an empty field, infinities as inf / -inf
fn format_metric(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

//writes the header row and one row of metric values
pub fn write_metrics<W: Write>(metrics: &Metrics, writer: W) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(METRIC_COLUMNS)?;
    csv_writer.write_record(metrics.values().iter().map(|&v| format_metric(v)))?;
    csv_writer.flush()?;

    Ok(())
}

//saves the metrics table to a csv file at path
pub fn save_metrics_csv(metrics: &Metrics, path: &Path) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_metrics(metrics, file)?;

    info!(path = ?path, "saved metrics table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_metrics_layout() {
        let metrics = Metrics {
            total_return: 0.2,
            annualized_return: 25.2,
            max_drawdown: -0.05,
            sharpe_ratio: f64::NAN,
        };

        let mut buffer = Vec::new();
        write_metrics(&metrics, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "Total Return,Annualized Return,Max Drawdown,Sharpe Ratio\n0.2,25.2,-0.05,\n"
        );
    }

    #[test]
    fn test_infinite_metric_written_as_inf() {
        assert_eq!(format_metric(f64::INFINITY), "inf");
        assert_eq!(format_metric(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_save_metrics_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("metrics.csv");
        let metrics = Metrics {
            total_return: 0.0,
            annualized_return: 0.0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
        };

        assert!(matches!(
            save_metrics_csv(&metrics, &path),
            Err(ReportError::Io(_))
        ));
    }
}
