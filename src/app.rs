use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use syntect::highlighting::Theme;
use syntect::parsing::SyntaxSet;
use tracing::{debug, info, warn};

use crate::catalog::model::{RowId, TreeModel};
use crate::catalog::state::TreeState;
use crate::catalog::{BinTree, Catalog};
use crate::components::details::DetailField;
use crate::components::menu_bar::{MenuAction, MenuState};
use crate::components::preview::PreviewState;
use crate::config::AppConfig;
use crate::preview_content;
use crate::theme::{self, ThemeColors};

/// Seconds a status message stays on the status bar.
const STATUS_TTL_SECS: u64 = 3;

/// Application context: configuration, the loaded catalog, and all view
/// state. Built once after the catalog loads.
pub struct App {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub tree_state: TreeState,
    pub theme: ThemeColors,
    pub menu: MenuState,
    pub preview: PreviewState,
    pub details: Vec<DetailField>,
    /// Message, creation time, and whether it reports an error.
    pub status_message: Option<(String, Instant, bool)>,
    pub should_quit: bool,
    syntax_set: SyntaxSet,
    syntax_theme: Theme,
    /// Row whose content the document and details panes currently show.
    shown_row: Option<RowId>,
}

impl App {
    /// Build the context around an already loaded catalog.
    pub fn new(config: AppConfig, catalog: Catalog) -> Self {
        let model = TreeModel::from_catalog(&catalog);
        info!(rows = model.len(), "tree model populated");
        let tree_state = TreeState::new(model, config.expand_bins());
        let theme = theme::resolve_theme(&config.theme);
        debug!(scheme = config.theme_scheme(), "theme resolved");
        let syntax_theme = preview_content::load_theme(config.syntax_theme_name());

        let mut app = Self {
            config,
            catalog,
            tree_state,
            theme,
            menu: MenuState::default(),
            preview: PreviewState::default(),
            details: Vec::new(),
            status_message: None,
            should_quit: false,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            syntax_theme,
            shown_row: None,
        };
        app.refresh_selection();
        app
    }

    /// Reload the document and details panes if the selection moved.
    pub fn refresh_selection(&mut self) {
        let current = self.tree_state.selected().map(|item| item.row);
        if current == self.shown_row {
            return;
        }
        self.shown_row = current;

        let Some(row) = current else {
            self.preview.clear();
            self.details.clear();
            return;
        };
        self.details = self.build_details(row);
        self.load_document(row);
    }

    fn load_document(&mut self, id: RowId) {
        let model = &self.tree_state.model;
        let row = model.row(id);

        // Card files can vanish or lose permissions after the catalog loads.
        let unreadable = row.path.as_deref().and_then(|path| {
            fs::metadata(path)
                .err()
                .map(|e| format!("Cannot open {}: {}", path.display(), e))
        });

        let (lines, total) = match &row.path {
            Some(_) if !self.config.preview_enabled() => (Vec::new(), 0),
            Some(path) if preview_content::is_binary_file(path) => {
                preview_content::load_binary_summary(path)
            }
            Some(path) => {
                debug!(path = %path.display(), "loading document");
                preview_content::load_highlighted_content(
                    path,
                    &self.syntax_set,
                    &self.syntax_theme,
                    self.config.max_lines(),
                )
            }
            None => directory_listing(model, id),
        };
        self.preview.set(lines, total);

        if let Some(msg) = unreadable {
            warn!("{}", msg);
            self.set_error_message(msg);
        }
    }

    fn build_details(&self, id: RowId) -> Vec<DetailField> {
        let model = &self.tree_state.model;
        let row = model.row(id);
        let bin = self.bin_tree(id).map(|b| &b.bin);

        let mut fields = vec![DetailField::new("Name", row.label.clone())];
        if let Some(bin) = bin {
            fields.push(DetailField::new("Bin", bin.label()));
        }

        match &row.path {
            Some(path) => {
                let kind = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| format!("{} card", e.to_ascii_uppercase()))
                    .unwrap_or_else(|| "Card".to_string());
                fields.push(DetailField::new("Kind", kind));
                if let Some(file) = path.file_name() {
                    fields.push(DetailField::new("File", file.to_string_lossy()));
                }
                fields.push(DetailField::new("Path", path.display().to_string()));
            }
            None => {
                let kind = if row.parent.is_none() { "Bin" } else { "Folder" };
                fields.push(DetailField::new("Kind", kind));
                fields.push(DetailField::new("Entries", row.children.len().to_string()));
                fields.push(DetailField::new("Cards", model.leaf_count(id).to_string()));
                if let Some(dir) = self.directory_path(id) {
                    fields.push(DetailField::new("Path", dir.display().to_string()));
                }
            }
        }
        fields
    }

    /// The bin a row belongs to. Top-level rows follow catalog bin order.
    fn bin_tree(&self, id: RowId) -> Option<&BinTree> {
        let idx = self.tree_state.model.root_index(id)?;
        self.catalog.bins.get(idx)
    }

    /// Filesystem path of a directory row: its bin root joined with the
    /// directory labels below the bin.
    fn directory_path(&self, id: RowId) -> Option<PathBuf> {
        let model = &self.tree_state.model;
        let bin = self.bin_tree(id)?;
        let mut path = bin.bin.root().to_path_buf();
        for label in model.label_chain(id).into_iter().skip(1) {
            path.push(label);
        }
        Some(path)
    }

    /// Path of the selection for the status bar.
    pub fn selection_path_display(&self) -> String {
        let Some(row) = self.tree_state.selected_row() else {
            return String::new();
        };
        match &row.path {
            Some(path) => path.display().to_string(),
            None => self
                .tree_state
                .selected()
                .and_then(|item| self.directory_path(item.row))
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Card and bin counts for the status bar.
    pub fn catalog_summary(&self) -> String {
        let cards = self.catalog.leaf_count();
        let bins = self.catalog.bins.len();
        format!(
            "{} card{} in {} bin{}",
            cards,
            if cards == 1 { "" } else { "s" },
            bins,
            if bins == 1 { "" } else { "s" }
        )
    }

    /// Run a menu command. Everything except Quit is a placeholder.
    pub fn run_menu_action(&mut self, label: &str, action: MenuAction) {
        match action {
            MenuAction::Quit => self.quit(),
            MenuAction::NewDeck
            | MenuAction::Save
            | MenuAction::SaveAs
            | MenuAction::Import
            | MenuAction::Export => {
                debug!(?action, "unbound menu action");
                self.set_status_message(format!("{} is not available yet", label));
            }
        }
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), false));
    }

    /// Set an error status message with current timestamp.
    pub fn set_error_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now(), true));
    }

    /// Clear the status message once it has been shown long enough.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, created, _)) = &self.status_message {
            if created.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        info!("quit requested");
        self.should_quit = true;
    }

    pub fn select_next(&mut self) {
        self.tree_state.select_next();
        self.refresh_selection();
    }

    pub fn select_previous(&mut self) {
        self.tree_state.select_previous();
        self.refresh_selection();
    }

    pub fn select_first(&mut self) {
        self.tree_state.select_first();
        self.refresh_selection();
    }

    pub fn select_last(&mut self) {
        self.tree_state.select_last();
        self.refresh_selection();
    }

    pub fn expand_selected(&mut self) {
        self.tree_state.expand_selected();
        self.refresh_selection();
    }

    /// Collapse the selected directory, or jump to its parent.
    pub fn collapse_selected(&mut self) {
        self.tree_state.collapse_selected();
        self.refresh_selection();
    }
}

/// Child labels of a directory row, folders marked with a trailing slash.
fn directory_listing(model: &TreeModel, id: RowId) -> (Vec<Line<'static>>, usize) {
    let children = model.children(id);
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{} entr{}",
            children.len(),
            if children.len() == 1 { "y" } else { "ies" }
        ),
        dim,
    ))];
    for &child in children {
        let row = model.row(child);
        let label = if row.is_leaf() {
            row.label.clone()
        } else {
            format!("{}/", row.label)
        };
        lines.push(Line::from(label));
    }
    let total = lines.len();
    (lines, total)
}
