use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

/// Loaded content of the document pane.
#[derive(Debug, Default)]
pub struct PreviewState {
    pub content_lines: Vec<Line<'static>>,
    /// Line count of the underlying file or listing.
    pub total_lines: usize,
    pub scroll_offset: usize,
}

impl PreviewState {
    pub fn set(&mut self, lines: Vec<Line<'static>>, total: usize) {
        self.content_lines = lines;
        self.total_lines = total;
        self.scroll_offset = 0;
    }

    pub fn clear(&mut self) {
        self.set(Vec::new(), 0);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.content_lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }
}

/// Document pane widget.
pub struct PreviewWidget<'a> {
    preview_state: &'a PreviewState,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> PreviewWidget<'a> {
    pub fn new(preview_state: &'a PreviewState, theme: &'a ThemeColors) -> Self {
        Self {
            preview_state,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> Widget for PreviewWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let lines = &self.preview_state.content_lines;
        if lines.is_empty() {
            let line = Line::from(Span::styled(
                "No document",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let start = self.preview_state.scroll_offset.min(lines.len());
        for (i, line) in lines[start..].iter().take(inner.height as usize).enumerate() {
            buf.set_line(inner.x, inner.y + i as u16, line, inner.width);
        }
    }
}
