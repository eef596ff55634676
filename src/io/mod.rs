//! Dataset exporters.
//!
//! Every exporter writes a batch of interaction records to a single file.
//! The format is chosen from the output file extension.

pub mod csv;
pub mod json;
pub mod magnetic;
pub mod matlab;
pub mod vtk;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::ConfigError;
use crate::sim::dataset::Record;

pub use csv::CsvExporter;
pub use json::JsonExporter;
pub use magnetic::MagneticFieldExporter;
pub use matlab::MatlabExporter;
pub use vtk::VtkExporter;

/// Writes a batch of records to a file.
///
/// Shared by all tracing workers through the dataset, hence `Send + Sync`.
pub trait Exporter: Send + Sync {
    fn dump(&self, path: &Path, records: &[Record]) -> Result<()>;
}

/// Output formats selectable by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Matlab,
    Vtk,
    Json,
}

impl ExportFormat {
    /// Picks the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "dat" => Ok(Self::Matlab),
            "vtk" => Ok(Self::Vtk),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Csv => Box::new(CsvExporter),
            Self::Matlab => Box::new(MatlabExporter),
            Self::Vtk => Box::new(VtkExporter),
            Self::Json => Box::new(JsonExporter),
        }
    }
}

/// Opens `path` for buffered writing, creating missing parent directories.
pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("data.csv")).unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a/b.DAT")).unwrap(), ExportFormat::Matlab);
        assert_eq!(ExportFormat::from_path(Path::new("rays.vtk")).unwrap(), ExportFormat::Vtk);
        assert_eq!(ExportFormat::from_path(Path::new("rays.json")).unwrap(), ExportFormat::Json);
        assert!(matches!(
            ExportFormat::from_path(Path::new("rays.xlsx")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(ExportFormat::from_path(Path::new("rays")).is_err());
    }

    #[test]
    fn test_create_file_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");
        let exporter = ExportFormat::from_path(&path).unwrap().exporter();
        exporter.dump(&path, &test_records::sample()).unwrap();
        assert!(path.exists());
    }
}
