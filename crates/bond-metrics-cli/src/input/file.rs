use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    tracing::debug!(path = %canonical.display(), "loaded input file");
    Ok(value)
}

/// Resolve a possibly relative path and check that it names a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bond_metrics_core::config::BondParameters;
    use std::io::Write;

    #[test]
    fn test_read_partial_scenario() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"maturity": 7}}"#).unwrap();

        let params: BondParameters = read_json(file.path().to_str().unwrap()).unwrap();
        assert_eq!(params.maturity, 7);
        assert_eq!(params.coupon_rate, BondParameters::default().coupon_rate);
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_json::<BondParameters>("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"), "{err}");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json::<BondParameters>(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Not a file"), "{err}");
    }

    #[test]
    fn test_malformed_json_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_json::<BondParameters>(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"), "{err}");
    }
}
