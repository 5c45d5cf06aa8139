//! Build the configured translation and detection backends.

use std::sync::Arc;
use tolk_core::{
    config::Config,
    traits::{Detector, Translator},
};
use tolk_providers::{GoogleTranslate, TranslateShell};

/// Build the translator named by `translator.backend`.
pub fn build_translator(cfg: &Config) -> anyhow::Result<Arc<dyn Translator>> {
    match cfg.translator.backend.as_str() {
        "translate-shell" => Ok(Arc::new(TranslateShell::from_config(&cfg.translator))),
        "google" => Ok(Arc::new(GoogleTranslate::from_config(&cfg.translator)?)),
        other => anyhow::bail!("unsupported translator backend: {other}"),
    }
}

/// Build the detector named by `detector.backend`, or `None` when disabled.
pub fn build_detector(cfg: &Config) -> anyhow::Result<Option<Arc<dyn Detector>>> {
    if !cfg.detector.enabled {
        return Ok(None);
    }
    let detector: Arc<dyn Detector> = match cfg.detector.backend.as_str() {
        "translate-shell" => Arc::new(TranslateShell::from_config(&cfg.translator)),
        "google" => Arc::new(GoogleTranslate::from_config(&cfg.translator)?),
        other => anyhow::bail!("unsupported detector backend: {other}"),
    };
    Ok(Some(detector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backends() {
        let cfg = Config::default();
        assert_eq!(build_translator(&cfg).unwrap().name(), "translate-shell");
        assert!(build_detector(&cfg).unwrap().is_none());
    }

    #[test]
    fn test_google_requires_key() {
        let mut cfg = Config::default();
        cfg.translator.backend = "google".into();
        assert!(build_translator(&cfg).is_err());

        cfg.translator.google.api_key = "k".into();
        cfg.detector.enabled = true;
        cfg.detector.backend = "google".into();
        assert_eq!(build_translator(&cfg).unwrap().name(), "google");
        assert_eq!(build_detector(&cfg).unwrap().unwrap().name(), "google");
    }

    #[test]
    fn test_unknown_backend() {
        let mut cfg = Config::default();
        cfg.translator.backend = "babelfish".into();
        assert!(build_translator(&cfg).is_err());
    }
}
