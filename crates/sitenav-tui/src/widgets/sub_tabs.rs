//! Inline tab strip for category and status filters.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One line with every label; the active one is bracketed and bold.
pub fn render_sub_tabs<S: AsRef<str>>(labels: &[S], active_index: usize) -> Line<'static> {
    let mut spans = Vec::with_capacity(labels.len() * 2);

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }
        let label = label.as_ref();
        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(label.to_owned(), theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

/// Step `index` by one within `len` entries, wrapping both ways.
pub fn cycle(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn active_tab_is_bracketed() {
        let line = render_sub_tabs(&["All", "Tools", "News"], 1);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "All  [Tools]  News");
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(cycle(2, 3, true), 0);
        assert_eq!(cycle(0, 3, false), 2);
        assert_eq!(cycle(0, 0, true), 0);
    }
}
