//! Movie plot dataset loading.

use crate::config::DatasetSettings;
use crate::error::{PlotRagError, Result};
use std::path::Path;
use tracing::{debug, info, instrument};

/// A source document: one movie and its plot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Movie title. Not guaranteed to be unique.
    pub title: String,
    /// Free-text plot summary.
    pub plot: String,
}

impl Record {
    /// Create a new record.
    pub fn new(title: &str, plot: &str) -> Self {
        Self {
            title: title.to_string(),
            plot: plot.to_string(),
        }
    }
}

/// Load the first `settings.sample_size` records from a CSV file.
///
/// Fails with [`PlotRagError::DatasetNotFound`] before reading anything when
/// the file does not exist. Cells missing from a short row read as empty text.
#[instrument(skip(path, settings), fields(path = %path.display()))]
pub fn load_records(path: &Path, settings: &DatasetSettings) -> Result<Vec<Record>> {
    if !path.exists() {
        return Err(PlotRagError::DatasetNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| PlotRagError::Dataset(format!("Missing column '{}' in {}", name, path.display())))
    };
    let title_idx = column(&settings.title_column)?;
    let plot_idx = column(&settings.plot_column)?;

    let mut records = Vec::with_capacity(settings.sample_size.min(4096));
    for row in reader.records().take(settings.sample_size) {
        let row = row?;
        records.push(Record {
            title: row.get(title_idx).unwrap_or_default().to_string(),
            plot: row.get(plot_idx).unwrap_or_default().to_string(),
        });
    }

    debug!("Read columns {} and {}", settings.title_column, settings.plot_column);
    info!("Loaded {} records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_is_dataset_not_found() {
        let err = load_records(Path::new("/definitely/not/here.csv"), &DatasetSettings::default()).unwrap_err();
        assert!(matches!(err, PlotRagError::DatasetNotFound(_)));
        assert!(err.to_string().contains("Dataset not found"));
    }

    #[test]
    fn test_loads_selected_columns_with_quoted_plots() {
        let file = write_csv(
            "Release Year,Title,Genre,Plot\n\
             1901,Kansas Saloon Smashers,comedy,\"A bartender is working at a saloon,\nserving drinks.\"\n\
             1902,Jack and the Beanstalk,fantasy,The earliest known adaptation.\n",
        );

        let records = load_records(file.path(), &DatasetSettings::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Kansas Saloon Smashers");
        assert_eq!(records[0].plot, "A bartender is working at a saloon,\nserving drinks.");
        assert_eq!(records[1].title, "Jack and the Beanstalk");
    }

    #[test]
    fn test_sample_size_limits_rows() {
        let file = write_csv("Title,Plot\nA,one\nB,two\nC,three\n");
        let settings = DatasetSettings {
            sample_size: 2,
            ..DatasetSettings::default()
        };

        let records = load_records(file.path(), &settings).unwrap();
        assert_eq!(records.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file = write_csv("Title,Summary\nA,one\n");
        let err = load_records(file.path(), &DatasetSettings::default()).unwrap_err();
        assert!(matches!(err, PlotRagError::Dataset(ref msg) if msg.contains("Plot")));
    }

    #[test]
    fn test_short_row_reads_empty_plot() {
        let file = write_csv("Title,Plot\nLonely Title\n");
        let records = load_records(file.path(), &DatasetSettings::default()).unwrap();
        assert_eq!(records, vec![Record::new("Lonely Title", "")]);
    }
}
