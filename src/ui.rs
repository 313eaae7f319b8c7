use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::details::DetailsWidget;
use crate::components::menu_bar::{MenuBarWidget, MenuDropdownWidget};
use crate::components::preview::PreviewWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;

/// Render the application UI.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // menu bar | panes | status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);
    let (menu_area, body_area, status_area) = (rows[0], rows[1], rows[2]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(app.config.tree_width()),
            Constraint::Length(app.config.document_width()),
            Constraint::Min(10),
        ])
        .split(body_area);

    // Keep the selection visible; borders take two rows.
    let visible_height = panes[0].height.saturating_sub(2) as usize;
    app.tree_state.update_scroll(visible_height);

    let border_style = Style::default().fg(app.theme.border_fg);
    let pane_block = |title: &'static str| {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style)
    };

    frame.render_widget(
        TreeWidget::new(&app.tree_state, &app.theme, app.config.use_icons())
            .block(pane_block(" Catalog ")),
        panes[0],
    );
    frame.render_widget(
        PreviewWidget::new(&app.preview, &app.theme).block(pane_block(" Document ")),
        panes[1],
    );
    frame.render_widget(
        DetailsWidget::new(&app.details, &app.theme).block(pane_block(" Card Details ")),
        panes[2],
    );

    render_status_bar(app, frame, status_area);

    // Dropdown last so it overlays the panes.
    frame.render_widget(MenuBarWidget::new(&app.menu, &app.theme), menu_area);
    if let Some(dropdown) = app.menu.dropdown_area(menu_area, area) {
        frame.render_widget(MenuDropdownWidget::new(&app.menu, &app.theme), dropdown);
    }
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let path = app.selection_path_display();
    let info = app.catalog_summary();
    let mut widget = StatusBarWidget::new(&path, &info, &app.theme);
    if let Some((msg, _, is_error)) = &app.status_message {
        widget = widget.status_message(msg, *is_error);
    }
    frame.render_widget(widget, area);
}
