//! UI-facing tree model and the populator that fills it from the catalog.
//!
//! Rows live in a flat arena and refer to each other by `RowId`. The
//! populator is written against the `TreeStore` trait so that any tree-model
//! abstraction can be filled the same way.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::{Catalog, CatalogNode};

/// Index of a row in a `TreeModel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u32);

impl RowId {
    fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One display row: a single string column plus the leaf's file path.
#[derive(Debug, Clone)]
pub struct Row {
    pub label: String,
    /// `Some` for leaves, `None` for directories and bins.
    pub path: Option<PathBuf>,
    pub parent: Option<RowId>,
    pub children: Vec<RowId>,
}

impl Row {
    pub fn is_leaf(&self) -> bool {
        self.path.is_some()
    }
}

/// A tree-model abstraction rows can be appended to.
pub trait TreeStore {
    type Handle: Copy;

    /// Append a row as the last child of `parent` (top level when `None`).
    fn append(&mut self, parent: Option<Self::Handle>, label: &str, path: Option<&Path>)
        -> Self::Handle;
}

/// Arena-backed tree model.
#[derive(Debug, Clone, Default)]
pub struct TreeModel {
    rows: Vec<Row>,
    roots: Vec<RowId>,
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model holding every bin of `catalog`.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut model = Self::new();
        populate_catalog(&mut model, catalog);
        model
    }

    pub fn roots(&self) -> &[RowId] {
        &self.roots
    }

    pub fn row(&self, id: RowId) -> &Row {
        &self.rows[id.idx()]
    }

    pub fn get(&self, id: RowId) -> Option<&Row> {
        self.rows.get(id.idx())
    }

    pub fn children(&self, id: RowId) -> &[RowId] {
        &self.rows[id.idx()].children
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: RowId) -> usize {
        let mut depth = 0;
        let mut cur = self.row(id).parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.row(p).parent;
        }
        depth
    }

    /// The top-level row `id` descends from.
    pub fn top_level(&self, id: RowId) -> RowId {
        let mut cur = id;
        while let Some(p) = self.row(cur).parent {
            cur = p;
        }
        cur
    }

    /// Position among the top-level rows of the row `id` descends from.
    pub fn root_index(&self, id: RowId) -> Option<usize> {
        let top = self.top_level(id);
        self.roots.iter().position(|&r| r == top)
    }

    /// Labels from the top-level row down to `id`.
    pub fn label_chain(&self, id: RowId) -> Vec<&str> {
        let mut chain = vec![self.row(id).label.as_str()];
        let mut cur = self.row(id).parent;
        while let Some(p) = cur {
            chain.push(self.row(p).label.as_str());
            cur = self.row(p).parent;
        }
        chain.reverse();
        chain
    }

    /// Number of leaf rows at or below `id`.
    pub fn leaf_count(&self, id: RowId) -> usize {
        let row = self.row(id);
        if row.is_leaf() {
            return 1;
        }
        row.children.iter().map(|&c| self.leaf_count(c)).sum()
    }

    /// Render the model as an indented outline, two spaces per level.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            self.outline_row(root, 0, &mut out);
        }
        out
    }

    fn outline_row(&self, id: RowId, depth: usize, out: &mut String) {
        let row = self.row(id);
        let _ = writeln!(out, "{}{}", "  ".repeat(depth), row.label);
        for &child in &row.children {
            self.outline_row(child, depth + 1, out);
        }
    }
}

impl TreeStore for TreeModel {
    type Handle = RowId;

    fn append(&mut self, parent: Option<RowId>, label: &str, path: Option<&Path>) -> RowId {
        let id = RowId::new(self.rows.len());
        self.rows.push(Row {
            label: label.to_string(),
            path: path.map(Path::to_path_buf),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.rows[p.idx()].children.push(id),
            None => self.roots.push(id),
        }
        id
    }
}

/// Append `nodes` under `parent` in order, recursing into directories.
pub fn populate<S: TreeStore>(store: &mut S, nodes: &[CatalogNode], parent: Option<S::Handle>) {
    for node in nodes {
        let handle = store.append(parent, node.name(), node.path());
        if node.is_directory() {
            populate(store, node.children(), Some(handle));
        }
    }
}

/// Append every bin of `catalog` as a top-level row.
pub fn populate_catalog<S: TreeStore>(store: &mut S, catalog: &Catalog) {
    for bin in &catalog.bins {
        populate(store, std::slice::from_ref(&bin.tree), None);
    }
}
