//! Directory tree builder: turns one bin directory into an ordered tree of
//! catalog nodes.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{AppError, Result};

/// A node in the catalog: a directory with ordered children, or a file leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    Directory {
        name: String,
        children: Vec<CatalogNode>,
    },
    Leaf {
        /// File name with its last extension stripped.
        name: String,
        path: PathBuf,
    },
}

impl CatalogNode {
    pub fn name(&self) -> &str {
        match self {
            CatalogNode::Directory { name, .. } | CatalogNode::Leaf { name, .. } => name,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, CatalogNode::Directory { .. })
    }

    /// Children of a directory; leaves have none.
    pub fn children(&self) -> &[CatalogNode] {
        match self {
            CatalogNode::Directory { children, .. } => children,
            CatalogNode::Leaf { .. } => &[],
        }
    }

    /// File path of a leaf.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CatalogNode::Leaf { path, .. } => Some(path),
            CatalogNode::Directory { .. } => None,
        }
    }

    /// Number of leaves at or below this node.
    pub fn leaf_count(&self) -> usize {
        match self {
            CatalogNode::Leaf { .. } => 1,
            CatalogNode::Directory { children, .. } => {
                children.iter().map(CatalogNode::leaf_count).sum()
            }
        }
    }
}

/// Strip exactly one trailing extension from a file name.
///
/// Leading dots never start an extension, so `.hidden` stays `.hidden`.
pub fn display_name(file_name: &str) -> &str {
    let lead = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[lead..].rfind('.') {
        Some(dot) => &file_name[..lead + dot],
        None => file_name,
    }
}

/// Children of one directory in insertion order, indexed by name.
struct Siblings {
    nodes: Vec<CatalogNode>,
    positions: HashMap<String, usize>,
}

impl Siblings {
    fn with_capacity(n: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(n),
            positions: HashMap::with_capacity(n),
        }
    }

    /// Add `node`, replacing a same-named sibling in place.
    ///
    /// A replaced sibling keeps its position and takes the new value.
    fn insert(&mut self, node: CatalogNode) {
        match self.positions.get(node.name()) {
            Some(&idx) => {
                trace!(name = node.name(), "sibling name collision, keeping last entry");
                self.nodes[idx] = node;
            }
            None => {
                self.positions.insert(node.name().to_string(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }
}

/// Build the ordered children of `dir`.
///
/// Entries are visited in byte order of their raw names. Directories
/// (symlinks followed) recurse; anything else becomes a leaf. A directory
/// that cannot be listed fails the whole build. Symlink cycles are not
/// detected.
pub fn build_tree(dir: &Path) -> Result<Vec<CatalogNode>> {
    let entries = fs::read_dir(dir).map_err(|e| AppError::catalog(dir, e))?;

    let mut names: Vec<OsString> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::catalog(dir, e))?;
        names.push(entry.file_name());
    }
    names.sort();

    let mut children = Siblings::with_capacity(names.len());
    for raw in names {
        let path = dir.join(&raw);
        let file_name = raw.to_string_lossy();
        let node = if path.is_dir() {
            CatalogNode::Directory {
                name: file_name.to_string(),
                children: build_tree(&path)?,
            }
        } else {
            CatalogNode::Leaf {
                name: display_name(&file_name).to_string(),
                path,
            }
        };
        children.insert(node);
    }

    trace!(dir = %dir.display(), entries = children.nodes.len(), "listed directory");
    Ok(children.nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs::{self, File};
    use tempfile::TempDir;

    /// Leaf file paths in depth-first pre-order.
    fn leaf_paths(node: &CatalogNode) -> Vec<&Path> {
        match node {
            CatalogNode::Leaf { path, .. } => vec![path.as_path()],
            CatalogNode::Directory { children, .. } => {
                children.iter().flat_map(leaf_paths).collect()
            }
        }
    }

    fn names(nodes: &[CatalogNode]) -> Vec<&str> {
        nodes.iter().map(CatalogNode::name).collect()
    }

    /// Every (name chain, leaf path) reachable from `nodes`.
    fn flatten(nodes: &[CatalogNode], chain: &mut Vec<String>, out: &mut Vec<(Vec<String>, Option<PathBuf>)>) {
        for node in nodes {
            chain.push(node.name().to_string());
            out.push((chain.clone(), node.path().map(Path::to_path_buf)));
            flatten(node.children(), chain, out);
            chain.pop();
        }
    }

    fn walk_fs(dir: &Path, rel: &Path, dirs: &mut BTreeSet<PathBuf>, files: &mut BTreeSet<PathBuf>) {
        for entry in fs::read_dir(dir).unwrap() {
            let entry = entry.unwrap();
            let rel_path = rel.join(entry.file_name());
            if entry.path().is_dir() {
                dirs.insert(rel_path.clone());
                walk_fs(&entry.path(), &rel_path, dirs, files);
            } else {
                files.insert(entry.path());
            }
        }
    }

    #[test]
    fn display_name_strips_single_extension() {
        assert_eq!(display_name("fireball.json"), "fireball");
        assert_eq!(display_name("card.v2.json"), "card.v2");
        assert_eq!(display_name("README"), "README");
    }

    #[test]
    fn display_name_ignores_leading_dots() {
        assert_eq!(display_name(".hidden"), ".hidden");
        assert_eq!(display_name(".config.json"), ".config");
        assert_eq!(display_name("..x"), "..x");
    }

    #[test]
    fn display_name_trailing_dot() {
        assert_eq!(display_name("card."), "card");
    }

    #[test]
    fn siblings_sorted_by_raw_name() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("b.txt")).unwrap();
        File::create(dir.path().join("A.txt")).unwrap();
        File::create(dir.path().join("c.txt")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["A", "b", "c"]);
        assert_eq!(tree[0].path(), Some(dir.path().join("A.txt").as_path()));
    }

    #[test]
    fn order_follows_raw_names_not_stripped_keys() {
        let dir = TempDir::new().unwrap();
        // '-' sorts before '.', so "a-x.txt" is listed before "a.txt"
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("a-x.txt")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["a-x", "a"]);
    }

    #[test]
    fn directories_recurse() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("red").join("burn")).unwrap();
        File::create(dir.path().join("red").join("burn").join("shock.json")).unwrap();
        File::create(dir.path().join("red").join("bolt.json")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["red"]);
        let red = &tree[0];
        assert!(red.is_directory());
        assert_eq!(names(red.children()), vec!["bolt", "burn"]);
        let burn = &red.children()[1];
        assert!(burn.is_directory());
        assert_eq!(names(burn.children()), vec!["shock"]);
    }

    #[test]
    fn empty_directory_has_no_children() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        let tree = build_tree(dir.path()).unwrap();
        assert!(tree[0].is_directory());
        assert!(tree[0].children().is_empty());
    }

    #[test]
    fn collision_last_sorted_entry_wins_in_first_position() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("notes")).unwrap();
        File::create(dir.path().join("notes").join("inner.txt")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("alpha.txt")).unwrap();
        File::create(dir.path().join("zeta.txt")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["alpha", "notes", "zeta"]);
        // "notes" is listed before "notes.txt", so the file overwrites the directory
        assert!(!tree[1].is_directory());
        assert_eq!(tree[1].path(), Some(dir.path().join("notes.txt").as_path()));
    }

    #[test]
    fn collision_across_unrelated_sibling() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("notes")).unwrap();
        File::create(dir.path().join("notes-b.txt")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["notes", "notes-b"]);
        assert!(!tree[0].is_directory());
        assert_eq!(tree[0].path(), Some(dir.path().join("notes.txt").as_path()));
    }

    #[test]
    fn large_directory_keeps_every_card() {
        let dir = TempDir::new().unwrap();
        for i in 0..5_000 {
            File::create(dir.path().join(format!("card-{:06}.jpg", i))).unwrap();
        }
        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree.len(), 5_000);
        assert_eq!(tree[0].name(), "card-000000");
        assert_eq!(tree[4_999].name(), "card-004999");
    }

    #[test]
    fn collision_between_files() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("card.json")).unwrap();
        File::create(dir.path().join("card.png")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].path(), Some(dir.path().join("card.png").as_path()));
    }

    #[test]
    fn hidden_entries_are_included() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec![".hidden"]);
    }

    #[test]
    fn tree_is_complete() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("sets").join("alpha")).unwrap();
        fs::create_dir_all(root.join("sets").join("beta")).unwrap();
        fs::create_dir(root.join("empty")).unwrap();
        File::create(root.join("sets").join("alpha").join("lotus.json")).unwrap();
        File::create(root.join("sets").join("alpha").join("mox.json")).unwrap();
        File::create(root.join("sets").join("beta").join("recall.png")).unwrap();
        File::create(root.join("loose.txt")).unwrap();

        let tree = build_tree(root).unwrap();
        let mut flat = Vec::new();
        flatten(&tree, &mut Vec::new(), &mut flat);

        let mut dirs = BTreeSet::new();
        let mut files = BTreeSet::new();
        walk_fs(root, Path::new(""), &mut dirs, &mut files);

        let built_files: BTreeSet<PathBuf> = flat.iter().filter_map(|(_, p)| p.clone()).collect();
        let built_dirs: BTreeSet<PathBuf> = flat
            .iter()
            .filter(|(_, p)| p.is_none())
            .map(|(chain, _)| chain.iter().collect())
            .collect();

        assert_eq!(built_files, files);
        assert_eq!(built_dirs, dirs);
        assert_eq!(flat.len(), dirs.len() + files.len());
    }

    #[test]
    fn leaf_helpers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("deck")).unwrap();
        File::create(dir.path().join("deck").join("a.json")).unwrap();
        File::create(dir.path().join("b.json")).unwrap();

        let root = CatalogNode::Directory {
            name: "Sources".into(),
            children: build_tree(dir.path()).unwrap(),
        };
        assert_eq!(root.leaf_count(), 2);
        assert_eq!(
            leaf_paths(&root),
            vec![
                dir.path().join("b.json").as_path(),
                dir.path().join("deck").join("a.json").as_path(),
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = build_tree(&missing).unwrap_err();
        match err {
            AppError::Catalog { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_as_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();
        assert!(matches!(build_tree(&file), Err(AppError::Catalog { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        File::create(locked.join("hidden.json")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root ignores permission bits.
        let readable = fs::read_dir(&locked).is_ok();
        let result = build_tree(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if readable {
            return;
        }

        match result.unwrap_err() {
            AppError::Catalog { path, source } => {
                assert_eq!(path, locked);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_followed() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("real")).unwrap();
        File::create(dir.path().join("real").join("card.json")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["link", "real"]);
        assert!(tree[0].is_directory());
        assert_eq!(names(tree[0].children()), vec!["card"]);
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_a_leaf() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling.json"))
            .unwrap();
        let tree = build_tree(dir.path()).unwrap();
        assert_eq!(names(&tree), vec!["dangling"]);
        assert!(!tree[0].is_directory());
    }
}
