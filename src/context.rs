//! Catalog context: the JSON document naming the card source and deck
//! directories.
//!
//! Location, first found wins:
//! 1. CLI `--context`
//! 2. `$UPKEEPY_CONTEXT`
//! 3. `[general] context_file` from the preferences file
//! 4. `<data dir>/upkeepy/mtg_scryfall-context.json`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::catalog::Bin;
use crate::error::{AppError, Result};

/// File name of the default context document.
pub const DEFAULT_CONTEXT_FILE: &str = "mtg_scryfall-context.json";

/// Label of the bin built from `sourcedir`.
pub const SOURCES_LABEL: &str = "Sources";
/// Label of the bin built from `deckdir`.
pub const DECKS_LABEL: &str = "Decks";

/// The two directory fields the catalog needs. Other fields are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CatalogContext {
    pub sourcedir: String,
    pub deckdir: String,
}

impl CatalogContext {
    /// Read and parse the context document at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AppError::Context {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let ctx: CatalogContext =
            serde_json::from_str(&content).map_err(|e| AppError::Context {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), "loaded catalog context");
        Ok(ctx)
    }

    /// Bins in display order, with home-relative paths expanded.
    pub fn bins(&self) -> Vec<Bin> {
        vec![
            Bin::new(SOURCES_LABEL, expand_home(&self.sourcedir)),
            Bin::new(DECKS_LABEL, expand_home(&self.deckdir)),
        ]
    }
}

/// Default context path under the platform data directory.
pub fn default_context_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("upkeepy").join(DEFAULT_CONTEXT_FILE))
}

/// Pick the context path from CLI, environment, preferences, then default.
pub fn resolve_context_path(
    cli_path: Option<&Path>,
    config_path: Option<&str>,
) -> Result<PathBuf> {
    if let Some(p) = cli_path {
        return Ok(p.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("UPKEEPY_CONTEXT") {
        if !env_path.is_empty() {
            return Ok(expand_home(&env_path));
        }
    }
    if let Some(p) = config_path {
        return Ok(expand_home(p));
    }
    default_context_path().ok_or_else(|| AppError::Context {
        path: PathBuf::from(DEFAULT_CONTEXT_FILE),
        reason: "no platform data directory".into(),
    })
}

/// Expand a leading `~` or `~/` to the home directory.
///
/// Other forms (including `~user`) are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    expand_home_with(path, dirs::home_dir().as_deref())
}

fn expand_home_with(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn expand_home_variants() {
        let home = Path::new("/home/mage");
        assert_eq!(expand_home_with("~", Some(home)), PathBuf::from("/home/mage"));
        assert_eq!(
            expand_home_with("~/cards/sources", Some(home)),
            PathBuf::from("/home/mage/cards/sources")
        );
        assert_eq!(expand_home_with("/abs/path", Some(home)), PathBuf::from("/abs/path"));
        assert_eq!(expand_home_with("~other/x", Some(home)), PathBuf::from("~other/x"));
        assert_eq!(expand_home_with("rel/~/x", Some(home)), PathBuf::from("rel/~/x"));
    }

    #[test]
    fn expand_home_without_home_dir() {
        assert_eq!(expand_home_with("~/cards", None), PathBuf::from("~/cards"));
    }

    #[test]
    fn load_valid_context_ignores_extra_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ctx.json");
        std::fs::write(
            &path,
            r#"{"sourcedir": "/cards/src", "deckdir": "/cards/decks", "format": "modern"}"#,
        )
        .unwrap();
        let ctx = CatalogContext::load(&path).unwrap();
        assert_eq!(ctx.sourcedir, "/cards/src");
        assert_eq!(ctx.deckdir, "/cards/decks");
    }

    #[test]
    fn bins_are_sources_then_decks() {
        let ctx = CatalogContext {
            sourcedir: "/cards/src".into(),
            deckdir: "/cards/decks".into(),
        };
        let bins = ctx.bins();
        assert_eq!(bins[0], Bin::new("Sources", "/cards/src"));
        assert_eq!(bins[1], Bin::new("Decks", "/cards/decks"));
    }

    #[test]
    fn missing_context_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = CatalogContext::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::Context { .. }));
    }

    #[test]
    fn malformed_context_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            CatalogContext::load(&path),
            Err(AppError::Context { .. })
        ));
    }

    #[test]
    fn missing_field_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"sourcedir": "/cards/src"}"#).unwrap();
        let err = CatalogContext::load(&path).unwrap_err();
        assert!(err.to_string().contains("deckdir"));
    }

    #[test]
    fn cli_path_wins() {
        let resolved =
            resolve_context_path(Some(Path::new("/explicit.json")), Some("/from-config.json"))
                .unwrap();
        assert_eq!(resolved, PathBuf::from("/explicit.json"));
    }
}
