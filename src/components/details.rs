use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;

/// One labelled field in the details pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// "Card Details" pane: a list of label/value fields for the selection.
pub struct DetailsWidget<'a> {
    fields: &'a [DetailField],
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> DetailsWidget<'a> {
    pub fn new(fields: &'a [DetailField], theme: &'a ThemeColors) -> Self {
        Self {
            fields,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl<'a> Widget for DetailsWidget<'a> {
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

        if self.fields.is_empty() {
            let line = Line::from(Span::styled(
                "No card selected",
                Style::default().fg(self.theme.dim_fg),
            ));
            buf.set_line(inner.x, inner.y, &line, inner.width);
            return;
        }

        let label_width = self.fields.iter().map(|f| f.label.len()).max().unwrap_or(0);
        let label_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let value_style = Style::default().fg(self.theme.tree_fg);

        for (i, field) in self.fields.iter().take(inner.height as usize).enumerate() {
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", field.label, width = label_width),
                    label_style,
                ),
                Span::styled(field.value.clone(), value_style),
            ]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
