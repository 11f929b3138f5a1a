//! Startup loading of the serialized pipeline, extracting its archive on demand.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use veritas_core::ModelError;
use zip::result::ZipError;
use zip::ZipArchive;

use crate::artifact::ModelArtifact;
use crate::pipeline::Pipeline;

/// Errors from locating, extracting or parsing the model.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model file missing! Could not find {} or {}", .extracted.display(), .archive.display())]
    Missing { extracted: PathBuf, archive: PathBuf },

    #[error("Archive {} did not contain {}", .archive.display(), .expected.display())]
    NotInArchive { archive: PathBuf, expected: PathBuf },

    #[error("Failed to read model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract archive: {0}")]
    Archive(#[from] ZipError),

    #[error("Failed to parse model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Where the model is expected, extracted or archived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSource {
    extracted: PathBuf,
    archive: PathBuf,
}

impl ModelSource {
    pub fn new(extracted: impl Into<PathBuf>, archive: impl Into<PathBuf>) -> Self {
        Self { extracted: extracted.into(), archive: archive.into() }
    }

    pub fn extracted(&self) -> &Path {
        &self.extracted
    }

    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Makes sure the extracted model exists, unpacking the archive into the
    /// extracted file's directory when only the archive is present.
    pub fn ensure_extracted(&self) -> Result<&Path, LoadError> {
        if self.extracted.exists() {
            return Ok(&self.extracted);
        }

        if !self.archive.exists() {
            return Err(LoadError::Missing {
                extracted: self.extracted.clone(),
                archive: self.archive.clone(),
            });
        }

        let dest = match self.extracted.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        extract_archive(&self.archive, dest)?;

        if !self.extracted.exists() {
            return Err(LoadError::NotInArchive {
                archive: self.archive.clone(),
                expected: self.extracted.clone(),
            });
        }
        Ok(&self.extracted)
    }

    /// Extracts if needed, then loads the pipeline.
    pub fn load(&self) -> Result<Pipeline, LoadError> {
        let path = self.ensure_extracted()?;
        load_pipeline(path)
    }
}

/// Reads and validates a pipeline from an extracted model file.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let artifact: ModelArtifact = serde_json::from_reader(reader)?;
    let pipeline = Pipeline::from_artifact(artifact)?;

    info!(
        path = %path.display(),
        name = pipeline.name().unwrap_or("unnamed"),
        vectorizer = pipeline.vectorizer().kind(),
        classifier = pipeline.classifier().kind(),
        n_features = pipeline.vectorizer().n_features(),
        "Model loaded"
    );
    Ok(pipeline)
}

/// Unpacks every entry of a ZIP archive under `dest`. Entries whose paths
/// would escape `dest` are rejected by the archive reader.
fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize, LoadError> {
    info!("Unzipping {}...", archive_path.display());

    fs::create_dir_all(dest)?;
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    let entries = archive.len();
    archive.extract(dest)?;

    info!(entries, dest = %dest.display(), "Unzip complete");
    Ok(entries)
}
