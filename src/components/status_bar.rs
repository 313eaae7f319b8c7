use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " F10:menu  ←/→:fold  q:quit ";

/// Status bar showing the selection path and catalog counts, or a transient
/// status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            is_error: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }
}

/// Keep the last `budget` characters of `s`, marking the cut with `...`.
fn truncate_left(s: &str, budget: usize) -> String {
    let len = s.chars().count();
    if len <= budget {
        return s.to_string();
    }
    if budget <= 3 {
        return s.chars().take(budget).collect();
    }
    let tail: String = s.chars().skip(len - (budget - 3)).collect();
    format!("...{}", tail)
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let width = area.width as usize;
        let base = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        buf.set_style(area, base);

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                base.bg(self.theme.error_fg)
            } else {
                base.fg(self.theme.success_fg)
            };
            let shown: String = msg.chars().take(width).collect();
            let line = Line::from(Span::styled(format!("{:<width$}", shown), style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // [path] ... [info] [hints]
        let hints_len = KEY_HINTS.chars().count();
        let info_len = self.info.chars().count();
        let path_budget = width
            .saturating_sub(hints_len)
            .saturating_sub(info_len)
            .saturating_sub(1);
        let path_display = truncate_left(self.path_str, path_budget);
        let gap = width
            .saturating_sub(hints_len)
            .saturating_sub(info_len)
            .saturating_sub(path_display.chars().count());

        let spans = vec![
            Span::styled(path_display, base),
            Span::raw(" ".repeat(gap)),
            Span::styled(self.info, base.fg(self.theme.info_fg)),
            Span::styled(
                KEY_HINTS,
                base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ),
        ];
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn row_text(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn test_status_message_success() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/path", "3 cards", &tc)
            .status_message("Save is not available yet", false)
            .render(area, &mut buf);
        assert!(row_text(&buf, 60).contains("Save is not available yet"));
        assert_eq!(buf.cell((0, 0)).unwrap().fg, tc.success_fg);
    }

    #[test]
    fn test_status_message_error() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/path", "", &tc)
            .status_message("Permission denied", true)
            .render(area, &mut buf);
        assert!(row_text(&buf, 60).contains("Permission denied"));
        assert_eq!(buf.cell((0, 0)).unwrap().bg, tc.error_fg);
    }

    #[test]
    fn test_normal_bar_rendering() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 100, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/cards/sources/fireball.json", "12 cards in 2 bins", &tc)
            .render(area, &mut buf);
        let content = row_text(&buf, 100);
        assert!(content.starts_with("/cards/sources/fireball.json"));
        assert!(content.contains("12 cards in 2 bins"));
        assert!(content.contains("F10:menu"));
    }

    #[test]
    fn long_path_is_truncated_from_the_left() {
        assert_eq!(truncate_left("/a/b/c/fireball.json", 12), "...ball.json");
        assert_eq!(truncate_left("short", 12), "short");
        assert_eq!(truncate_left("abcdef", 2), "ab");
    }

    #[test]
    fn multibyte_message_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 5, 1);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/path", "", &tc)
            .status_message("⚠ Ünavailable", true)
            .render(area, &mut buf);
    }

    #[test]
    fn test_zero_area_does_not_panic() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        StatusBarWidget::new("/path", "info", &tc).render(area, &mut buf);
    }
}
