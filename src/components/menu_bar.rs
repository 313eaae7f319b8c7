//! Menu bar: File, Edit, View, Tools, Help.
//!
//! Only Quit is bound; every other entry is a placeholder that the app
//! reports as unavailable.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// Commands reachable from the menu bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewDeck,
    Save,
    SaveAs,
    Import,
    Export,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Action(&'static str, MenuAction),
    Separator,
}

impl MenuItem {
    fn is_selectable(&self) -> bool {
        matches!(self, MenuItem::Action(..))
    }
}

#[derive(Debug)]
pub struct Menu {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            MenuItem::Action("New deck", MenuAction::NewDeck),
            MenuItem::Action("Save", MenuAction::Save),
            MenuItem::Action("Save as", MenuAction::SaveAs),
            MenuItem::Separator,
            MenuItem::Action("Import from file", MenuAction::Import),
            MenuItem::Action("Export to file", MenuAction::Export),
            MenuItem::Separator,
            MenuItem::Action("Quit", MenuAction::Quit),
        ],
    },
    Menu {
        title: "Edit",
        items: &[],
    },
    Menu {
        title: "View",
        items: &[],
    },
    Menu {
        title: "Tools",
        items: &[],
    },
    Menu {
        title: "Help",
        items: &[],
    },
];

/// Which menu is open and which entry is highlighted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub open: Option<usize>,
    /// `None` when the open menu has no selectable entries.
    pub highlighted: Option<usize>,
}

impl MenuState {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open the first menu, or close whichever is open.
    pub fn toggle(&mut self) {
        if self.is_open() {
            self.close();
        } else {
            self.open_menu(0);
        }
    }

    pub fn close(&mut self) {
        self.open = None;
        self.highlighted = None;
    }

    fn open_menu(&mut self, index: usize) {
        self.open = Some(index);
        self.highlighted = MENUS[index].items.iter().position(MenuItem::is_selectable);
    }

    pub fn next_menu(&mut self) {
        if let Some(i) = self.open {
            self.open_menu((i + 1) % MENUS.len());
        }
    }

    pub fn previous_menu(&mut self) {
        if let Some(i) = self.open {
            self.open_menu((i + MENUS.len() - 1) % MENUS.len());
        }
    }

    pub fn next_item(&mut self) {
        self.step_item(1);
    }

    pub fn previous_item(&mut self) {
        self.step_item(-1);
    }

    /// Move the highlight by `delta`, wrapping and skipping separators.
    fn step_item(&mut self, delta: isize) {
        let (Some(menu), Some(current)) = (self.open, self.highlighted) else {
            return;
        };
        let items = MENUS[menu].items;
        let len = items.len() as isize;
        let mut idx = current as isize;
        for _ in 0..items.len() {
            idx = (idx + delta).rem_euclid(len);
            if items[idx as usize].is_selectable() {
                self.highlighted = Some(idx as usize);
                return;
            }
        }
    }

    /// Close the menu and return the highlighted action, if any.
    pub fn activate(&mut self) -> Option<(&'static str, MenuAction)> {
        let picked = match (self.open, self.highlighted) {
            (Some(menu), Some(item)) => match MENUS[menu].items[item] {
                MenuItem::Action(label, action) => Some((label, action)),
                MenuItem::Separator => None,
            },
            _ => None,
        };
        self.close();
        picked
    }

    /// Screen area of the open dropdown, placed under its title in `bar`.
    pub fn dropdown_area(&self, bar: Rect, screen: Rect) -> Option<Rect> {
        let menu = self.open?;
        let x_offset: usize = MENUS[..menu].iter().map(|m| m.title.len() + 2).sum();
        let items = MENUS[menu].items;
        let content_width = items
            .iter()
            .map(|item| match item {
                MenuItem::Action(label, _) => label.len(),
                MenuItem::Separator => 0,
            })
            .max()
            .unwrap_or(0)
            .max(MENUS[menu].title.len());

        let x = bar.x.saturating_add(x_offset as u16);
        let y = bar.y.saturating_add(1);
        let width = (content_width as u16 + 4).min(screen.right().saturating_sub(x));
        let height = (items.len().max(1) as u16 + 2).min(screen.bottom().saturating_sub(y));
        Some(Rect::new(x, y, width, height))
    }
}

/// The one-line bar of menu titles.
pub struct MenuBarWidget<'a> {
    state: &'a MenuState,
    theme: &'a ThemeColors,
}

impl<'a> MenuBarWidget<'a> {
    pub fn new(state: &'a MenuState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for MenuBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default().bg(self.theme.menu_bg).fg(self.theme.menu_fg);
        buf.set_style(area, base);

        let spans: Vec<Span> = MENUS
            .iter()
            .enumerate()
            .map(|(i, menu)| {
                let style = if self.state.open == Some(i) {
                    Style::default()
                        .bg(self.theme.menu_selected_bg)
                        .fg(self.theme.menu_selected_fg)
                        .add_modifier(Modifier::BOLD)
                } else {
                    base
                };
                Span::styled(format!(" {} ", menu.title), style)
            })
            .collect();
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

/// The open menu's item list, drawn over the panes below the bar.
pub struct MenuDropdownWidget<'a> {
    state: &'a MenuState,
    theme: &'a ThemeColors,
}

impl<'a> MenuDropdownWidget<'a> {
    pub fn new(state: &'a MenuState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }
}

impl<'a> Widget for MenuDropdownWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(menu) = self.state.open else {
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }

        Clear.render(area, buf);
        let base = Style::default().bg(self.theme.menu_bg).fg(self.theme.menu_fg);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(base.fg(self.theme.border_fg))
            .style(base);
        let inner = block.inner(area);
        block.render(area, buf);

        let items = MENUS[menu].items;
        if items.is_empty() {
            let line = Line::from(Span::styled(
                "(empty)",
                base.fg(self.theme.dim_fg).add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        for (i, item) in items.iter().take(inner.height as usize).enumerate() {
            let y = inner.y + i as u16;
            let line = match item {
                MenuItem::Separator => Line::from(Span::styled(
                    "─".repeat(inner.width as usize),
                    base.fg(self.theme.border_fg),
                )),
                MenuItem::Action(label, _) => {
                    let style = if self.state.highlighted == Some(i) {
                        Style::default()
                            .bg(self.theme.menu_selected_bg)
                            .fg(self.theme.menu_selected_fg)
                    } else {
                        base
                    };
                    Line::from(Span::styled(
                        format!(" {:<width$}", label, width = inner.width.saturating_sub(1) as usize),
                        style,
                    ))
                }
            };
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}
