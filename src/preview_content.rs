use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

/// Detect the syntax name for a card file based on its extension.
pub fn detect_syntax_name(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => "JSON",
        Some("yaml" | "yml") => "YAML",
        Some("toml") => "TOML",
        Some("xml" | "cod") => "XML",
        Some("md" | "markdown") => "Markdown",
        Some("csv" | "tsv") => "Plain Text",
        // Deck lists (.dec, .dck, .txt) are plain text
        _ => "Plain Text",
    }
}

/// Load a theme from the built-in theme set by name, with fallback.
pub fn load_theme(theme_name: &str) -> Theme {
    let mut ts = ThemeSet::load_defaults();
    match ts.themes.remove(theme_name) {
        Some(theme) => theme,
        None => ts
            .themes
            .remove("base16-ocean.dark")
            .unwrap_or_default(),
    }
}

fn syntect_color_to_ratatui(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Load and syntax-highlight up to `max_lines` lines of a file.
///
/// Returns `(lines, total_line_count)`; the total counts every line in the
/// file, not only the loaded ones. On error, returns a single error line.
pub fn load_highlighted_content(
    path: &Path,
    ss: &SyntaxSet,
    theme: &Theme,
    max_lines: usize,
) -> (Vec<Line<'static>>, usize) {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) => return (vec![error_line(format!("Error reading file: {}", e))], 1),
    };

    let syntax = ss
        .find_syntax_by_name(detect_syntax_name(path))
        .unwrap_or_else(|| ss.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = Vec::new();
    let mut total = 0usize;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                lines.push(error_line(format!("Error reading file: {}", e)));
                break;
            }
        }
        total += 1;
        if lines.len() >= max_lines {
            continue;
        }
        let text = String::from_utf8_lossy(&buf);
        lines.push(highlight_line(&mut highlighter, &text, ss, total));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "(empty file)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    if total > max_lines {
        lines.push(Line::from(Span::styled(
            format!("… {} more lines", total - max_lines),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    (lines, total.max(1))
}

fn highlight_line(
    highlighter: &mut HighlightLines<'_>,
    text: &str,
    ss: &SyntaxSet,
    number: usize,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{:>4} │ ", number),
        Style::default().fg(Color::DarkGray),
    )];
    match highlighter.highlight_line(text, ss) {
        Ok(ranges) => {
            for (style, piece) in ranges {
                let piece = piece.trim_end_matches(['\n', '\r']);
                if piece.is_empty() {
                    continue;
                }
                spans.push(Span::styled(
                    piece.to_string(),
                    Style::default().fg(syntect_color_to_ratatui(style.foreground)),
                ));
            }
        }
        Err(_) => spans.push(Span::raw(text.trim_end_matches(['\n', '\r']).to_string())),
    }
    Line::from(spans)
}

fn error_line(msg: String) -> Line<'static> {
    Line::from(Span::styled(msg, Style::default().fg(Color::Red)))
}

/// Card image and archive extensions that never render as text.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "zip", "gz", "7z", "pdf",
];

/// Check if a file is binary by extension or null-byte scan.
pub fn is_binary_file(path: &Path) -> bool {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if BINARY_EXTENSIONS
            .iter()
            .any(|&b| b.eq_ignore_ascii_case(ext))
        {
            return true;
        }
    }

    // Fallback: scan first 8KB for null bytes
    let Ok(file) = fs::File::open(path) else {
        return false;
    };
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 8192];
    match reader.read(&mut buf) {
        Ok(n) => buf[..n].contains(&0),
        Err(_) => false,
    }
}

/// Format bytes into human-readable size string.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * KB;
    const GB: u64 = 1024 * MB;
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Lines describing a binary card file (typically a card image).
pub fn load_binary_summary(path: &Path) -> (Vec<Line<'static>>, usize) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(
        "Binary file",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        lines.push(Line::from(vec![
            Span::styled("Type: ", dim),
            Span::raw(ext.to_ascii_uppercase()),
        ]));
    }
    if let Ok(meta) = fs::metadata(path) {
        lines.push(Line::from(vec![
            Span::styled("Size: ", dim),
            Span::raw(format_size(meta.len())),
        ]));
    }
    let total = lines.len();
    (lines, total)
}
