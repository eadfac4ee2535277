use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::artifact::ModelArtifact;
use super::error::ModelError;

/// SHA-256 of a persisted blob, hex encoded
pub fn checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save artifact to disk, returns the blob checksum.
///
/// Written to a sibling `.tmp` file first and renamed into place, so the
/// previous artifact survives a failed write.
pub fn save_artifact(artifact: &ModelArtifact, path: &Path) -> Result<String, ModelError> {
    // Ensure directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let bytes = serde_json::to_vec(artifact)?;
    let staging = staging_path(path);

    let written = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&staging)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        fs::rename(&staging, path)
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    Ok(checksum(&bytes))
}

/// Load artifact from disk with validation, returns it with its checksum
pub fn load_artifact(path: &Path) -> Result<(ModelArtifact, String), ModelError> {
    if !path.exists() {
        return Err(ModelError::ArtifactNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let artifact: ModelArtifact = serde_json::from_slice(&bytes)?;
    artifact.validate().map_err(ModelError::InvalidArtifact)?;

    Ok((artifact, checksum(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable_hex() {
        let a = checksum(b"model");
        assert_eq!(a.len(), 64);
        assert_eq!(a, checksum(b"model"));
        assert_ne!(a, checksum(b"other"));
    }

    #[test]
    fn test_staging_path_is_sibling() {
        let p = staging_path(Path::new("/data/model.json"));
        assert_eq!(p, PathBuf::from("/data/model.json.tmp"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(load_artifact(&path), Err(ModelError::ArtifactNotFound(p)) if p == path));
    }

    #[test]
    fn test_load_garbage_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(load_artifact(&path), Err(ModelError::SerializationError(_))));
    }
}
