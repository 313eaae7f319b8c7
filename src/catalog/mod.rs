//! The in-memory card catalog: bins, their directory trees, and the tree
//! model the UI binds to.

pub mod builder;
pub mod model;
pub mod state;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;

pub use builder::{build_tree, CatalogNode};

/// A named top-level root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bin {
    label: String,
    root: PathBuf,
}

impl Bin {
    pub fn new(label: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            root: root.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// One bin together with its scanned tree.
///
/// `tree` is always a `CatalogNode::Directory` named after the bin label.
#[derive(Debug, Clone)]
pub struct BinTree {
    pub bin: Bin,
    pub tree: CatalogNode,
}

/// All configured bins, scanned.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub bins: Vec<BinTree>,
}

impl Catalog {
    /// Scan every bin in order.
    ///
    /// Any unreadable directory aborts the load; no partial catalog is
    /// returned.
    pub fn load(bins: &[Bin]) -> Result<Self> {
        let mut loaded = Vec::with_capacity(bins.len());
        for bin in bins {
            debug!(bin = bin.label(), root = %bin.root().display(), "scanning bin");
            let children = build_tree(bin.root())?;
            let tree = CatalogNode::Directory {
                name: bin.label().to_string(),
                children,
            };
            info!(bin = bin.label(), cards = tree.leaf_count(), "bin loaded");
            loaded.push(BinTree {
                bin: bin.clone(),
                tree,
            });
        }
        Ok(Self { bins: loaded })
    }

    /// Top-level nodes, one per bin.
    pub fn roots(&self) -> impl Iterator<Item = &CatalogNode> {
        self.bins.iter().map(|b| &b.tree)
    }

    /// Total number of leaves across all bins.
    pub fn leaf_count(&self) -> usize {
        self.roots().map(CatalogNode::leaf_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn two_bins() -> (TempDir, Vec<Bin>) {
        let dir = TempDir::new().unwrap();
        let sources = dir.path().join("sources");
        let decks = dir.path().join("decks");
        fs::create_dir(&sources).unwrap();
        fs::create_dir(&decks).unwrap();
        File::create(sources.join("fireball.json")).unwrap();
        let bins = vec![Bin::new("Sources", sources), Bin::new("Decks", decks)];
        (dir, bins)
    }

    #[test]
    fn load_keeps_bin_order_and_labels() {
        let (_dir, bins) = two_bins();
        let catalog = Catalog::load(&bins).unwrap();
        let labels: Vec<&str> = catalog.roots().map(CatalogNode::name).collect();
        assert_eq!(labels, vec!["Sources", "Decks"]);

        let sources = &catalog.bins[0].tree;
        assert_eq!(sources.children().len(), 1);
        assert_eq!(sources.children()[0].name(), "fireball");
        assert!(catalog.bins[1].tree.children().is_empty());
        assert_eq!(catalog.leaf_count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn load_fails_when_second_bin_is_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, bins) = two_bins();
        let decks = dir.path().join("decks");
        let locked = decks.join("burn");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits.
        let readable = fs::read_dir(&locked).is_ok();
        let result = Catalog::load(&bins);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        match result {
            Err(AppError::Catalog { path, .. }) => assert_eq!(path, locked),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(catalog) => panic!("partial catalog with {} bins", catalog.bins.len()),
        }
    }

    #[test]
    fn load_fails_when_any_bin_is_missing() {
        let (dir, mut bins) = two_bins();
        bins.push(Bin::new("Extra", dir.path().join("missing")));
        let err = Catalog::load(&bins).unwrap_err();
        assert!(matches!(err, AppError::Catalog { .. }));
    }
}
