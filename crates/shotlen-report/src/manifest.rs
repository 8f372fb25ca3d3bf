use crate::error::ReportError;
use pathdiff::diff_paths;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize)]
pub struct ReportManifest {
    pub generated_at: String,
    pub inputs: Vec<InputFile>,
    pub generated_files: Vec<GeneratedFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputFile {
    pub dataset: String,
    pub path: PathBuf,
    pub sha256: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFile {
    /// Relative to the output directory when possible.
    pub path: String,
    pub sha256: String,
    pub size: u64,
}

pub(crate) fn sha256_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn relative_to(path: &Path, base: &Path) -> String {
    diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

pub(crate) fn generated_file(path: &Path, out_dir: &Path) -> Result<GeneratedFile, ReportError> {
    let bytes = fs::read(path)?;
    Ok(GeneratedFile {
        path: relative_to(path, out_dir),
        sha256: sha256_bytes(&bytes),
        size: bytes.len() as u64,
    })
}

pub(crate) fn input_file(dataset: &str, path: &Path) -> Result<InputFile, ReportError> {
    let bytes = fs::read(path)?;
    Ok(InputFile {
        dataset: dataset.to_string(),
        path: path.to_path_buf(),
        sha256: sha256_bytes(&bytes),
        size: bytes.len() as u64,
    })
}

/// Hashes `files` and writes `manifest.json` into `out_dir`. The manifest does
/// not list itself.
pub fn write_manifest(
    out_dir: &Path,
    generated_at: &str,
    inputs: Vec<InputFile>,
    files: &[PathBuf],
) -> Result<(PathBuf, ReportManifest), ReportError> {
    let mut generated_files = files
        .iter()
        .map(|path| generated_file(path, out_dir))
        .collect::<Result<Vec<_>, _>>()?;
    generated_files.sort_by(|a, b| a.path.cmp(&b.path));
    let manifest = ReportManifest {
        generated_at: generated_at.to_string(),
        inputs,
        generated_files,
    };
    let manifest_path = out_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;
    Ok((manifest_path, manifest))
}
