use anyhow::Context;
use prooftext_syntax::ValidatorConfig;
use std::path::Path;

/// Reads a JSON validator config. Missing fields keep their defaults.
pub fn load(path: &Path) -> anyhow::Result<ValidatorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ValidatorConfig = serde_json::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

/// The config to validate with: file (or defaults) plus command line overrides.
pub fn resolve(path: Option<&Path>, keep_whitespace: bool) -> anyhow::Result<ValidatorConfig> {
    let mut config = match path {
        Some(path) => load(path)?,
        None => ValidatorConfig::default(),
    };
    if keep_whitespace {
        config.strip_whitespace = false;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, false).unwrap();
        assert_eq!(config, ValidatorConfig::default());

        let config = resolve(None, true).unwrap();
        assert!(!config.strip_whitespace);
    }

    #[test]
    fn test_load_from_file() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("prooftext.json");
        std::fs::write(&path, r#"{ "justification_marker": ";" }"#)?;

        let config = resolve(Some(&path), false)?;
        assert_eq!(config.justification_marker, ';');
        assert!(config.strip_whitespace);

        let config = resolve(Some(&path), true)?;
        assert_eq!(config.justification_marker, ';');
        assert!(!config.strip_whitespace);
        Ok(())
    }

    #[test]
    fn test_malformed_file() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "{{ \"strip_whitespace\": \"yes\" }}")?;

        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("parsing config"));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = load(Path::new("/nonexistent/prooftext.json")).unwrap_err();
        assert!(err.to_string().starts_with("reading config"));
    }
}
