use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::catalog::state::{FlatItem, TreeState};
use crate::theme::ThemeColors;

/// Catalog tree widget, rendered with box-drawing characters.
pub struct TreeWidget<'a> {
    tree_state: &'a TreeState,
    theme: &'a ThemeColors,
    use_icons: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree_state: &'a TreeState, theme: &'a ThemeColors, use_icons: bool) -> Self {
        Self {
            tree_state,
            theme,
            use_icons,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Build the indentation prefix for `item` from its ancestors' sibling
    /// positions.
    fn build_prefix(item: &FlatItem, items: &[FlatItem], item_index: usize) -> String {
        if item.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        for d in 1..item.depth {
            let mut ancestor_is_last = false;
            for j in (0..item_index).rev() {
                if items[j].depth == d {
                    ancestor_is_last = items[j].is_last_sibling;
                    break;
                }
                if items[j].depth < d {
                    break;
                }
            }
            prefix.push_str(if ancestor_is_last { "   " } else { "│  " });
        }
        prefix.push_str(if item.is_last_sibling { "└──" } else { "├──" });
        prefix
    }

    fn item_indicator(&self, item: &FlatItem) -> &'static str {
        match (self.use_icons, item.is_leaf, item.is_expanded) {
            (true, false, true) => "\u{f115} ",
            (true, false, false) => "\u{f114} ",
            (true, true, _) => self.leaf_icon(item),
            (false, false, true) => "▾ ",
            (false, false, false) => "▸ ",
            (false, true, _) => "  ",
        }
    }

    /// Nerd Font icon for a leaf, chosen by its file extension.
    fn leaf_icon(&self, item: &FlatItem) -> &'static str {
        let ext = self
            .tree_state
            .model
            .row(item.row)
            .path
            .as_deref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => "\u{e60b} ",
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" => "\u{f1c5} ",
            "txt" | "dec" | "dck" | "md" => "\u{f15c} ",
            _ => "\u{f15b} ",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let items = &self.tree_state.flat_items;
        let visible_height = inner_area.height as usize;
        if items.is_empty() || visible_height == 0 {
            return;
        }

        let selected = self.tree_state.selected_index;
        let scroll = self.tree_state.scroll_offset;

        for (i, (idx, item)) in items
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            let y = inner_area.y + i as u16;

            let style = if idx == selected {
                Style::default()
                    .bg(self.theme.tree_selected_bg)
                    .fg(self.theme.tree_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.depth == 0 {
                Style::default()
                    .fg(self.theme.bin_fg)
                    .add_modifier(Modifier::BOLD)
            } else if item.is_leaf {
                Style::default().fg(self.theme.tree_file_fg)
            } else {
                Style::default().fg(self.theme.tree_dir_fg)
            };

            let content = format!(
                "{}{}{}",
                Self::build_prefix(item, items, idx),
                self.item_indicator(item),
                item.label
            );
            let line = Line::from(Span::styled(content, style));
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
