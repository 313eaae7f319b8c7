use std::collections::HashSet;

use super::model::{Row, RowId, TreeModel};

/// A flattened representation of a visible model row for rendering.
#[derive(Debug, Clone)]
pub struct FlatItem {
    pub row: RowId,
    pub label: String,
    pub depth: usize,
    pub is_leaf: bool,
    pub is_expanded: bool,
    pub is_last_sibling: bool,
}

/// View state over a `TreeModel`: expansion, selection and scrolling.
pub struct TreeState {
    pub model: TreeModel,
    pub expanded: HashSet<RowId>,
    pub flat_items: Vec<FlatItem>,
    pub selected_index: usize,
    pub scroll_offset: usize,
}

impl TreeState {
    /// Wrap a populated model. With `expand_top_level`, bins start open.
    pub fn new(model: TreeModel, expand_top_level: bool) -> Self {
        let expanded = if expand_top_level {
            model.roots().iter().copied().collect()
        } else {
            HashSet::new()
        };
        let mut state = Self {
            model,
            expanded,
            flat_items: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
        };
        state.flatten();
        state
    }

    /// Rebuild the flat items list from the model and expansion set.
    pub fn flatten(&mut self) {
        self.flat_items.clear();
        let roots = self.model.roots();
        for (i, &root) in roots.iter().enumerate() {
            Self::flatten_row(
                &self.model,
                &self.expanded,
                root,
                0,
                i == roots.len() - 1,
                &mut self.flat_items,
            );
        }
        if !self.flat_items.is_empty() && self.selected_index >= self.flat_items.len() {
            self.selected_index = self.flat_items.len() - 1;
        }
    }

    fn flatten_row(
        model: &TreeModel,
        expanded: &HashSet<RowId>,
        id: RowId,
        depth: usize,
        is_last: bool,
        items: &mut Vec<FlatItem>,
    ) {
        let row = model.row(id);
        let is_expanded = !row.is_leaf() && expanded.contains(&id);
        items.push(FlatItem {
            row: id,
            label: row.label.clone(),
            depth,
            is_leaf: row.is_leaf(),
            is_expanded,
            is_last_sibling: is_last,
        });

        if is_expanded {
            let children = &row.children;
            for (i, &child) in children.iter().enumerate() {
                Self::flatten_row(
                    model,
                    expanded,
                    child,
                    depth + 1,
                    i == children.len() - 1,
                    items,
                );
            }
        }
    }

    /// The focused flat item.
    pub fn selected(&self) -> Option<&FlatItem> {
        self.flat_items.get(self.selected_index)
    }

    /// The model row behind the focused item.
    pub fn selected_row(&self) -> Option<&Row> {
        self.selected().and_then(|item| self.model.get(item.row))
    }

    /// Position of `row` in the flat list, if visible.
    pub fn find_index(&self, row: RowId) -> Option<usize> {
        self.flat_items.iter().position(|item| item.row == row)
    }

    pub fn select_next(&mut self) {
        let len = self.flat_items.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    pub fn select_last(&mut self) {
        let len = self.flat_items.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Expand the selected directory; no-op on leaves.
    pub fn expand_selected(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        if item.is_leaf || item.is_expanded {
            return;
        }
        let row = item.row;
        self.expanded.insert(row);
        self.flatten();
    }

    /// Collapse the selected directory, or jump to the parent row.
    pub fn collapse_selected(&mut self) {
        let Some(item) = self.selected() else {
            return;
        };
        let row = item.row;

        if item.is_expanded {
            self.expanded.remove(&row);
            self.flatten();
            return;
        }

        if let Some(parent) = self.model.row(row).parent {
            if let Some(idx) = self.find_index(parent) {
                self.selected_index = idx;
            }
        }
    }

    /// Update the scroll offset to keep the selected item visible.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index - visible_height + 1;
        }
    }
}
