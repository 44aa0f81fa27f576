//! Single-line text input: key mapping and a bordered field renderer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, InputRequest};

use crate::theme;

/// Translate an editing key into a `tui-input` request.
pub fn input_request(key: KeyEvent) -> Option<InputRequest> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => Some(InputRequest::DeleteLine),
        KeyCode::Char('w') if ctrl => Some(InputRequest::DeletePrevWord),
        KeyCode::Char('a') if ctrl => Some(InputRequest::GoToStart),
        KeyCode::Char('e') if ctrl => Some(InputRequest::GoToEnd),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}

/// Draw `input` in a rounded box titled `label`; places the cursor when focused.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    input: &Input,
    focused: bool,
    placeholder: &str,
) {
    let block = Block::default()
        .title(format!(" {label} "))
        .title_style(if focused {
            theme::title_style()
        } else {
            theme::key_hint()
        })
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width.max(1) - 1);
    let scroll = input.visual_scroll(width);

    let line = if input.value().is_empty() && !focused {
        Line::from(Span::styled(placeholder.to_owned(), theme::key_hint()))
    } else {
        Line::from(Span::styled(input.value().to_owned(), theme::card_text()))
    };
    frame.render_widget(
        Paragraph::new(line).scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX))),
        inner,
    );

    if focused {
        let offset = input.visual_cursor().saturating_sub(scroll);
        let x = inner
            .x
            .saturating_add(u16::try_from(offset).unwrap_or(inner.width));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn typing_edits_the_value() {
        let mut input = Input::default();
        let keys = "rusty"
            .chars()
            .map(|c| key(KeyCode::Char(c), KeyModifiers::NONE))
            .chain([key(KeyCode::Backspace, KeyModifiers::NONE)]);
        for req in keys.filter_map(input_request) {
            input.handle(req);
        }
        assert_eq!(input.value(), "rust");
    }

    #[test]
    fn control_chords_are_not_inserted() {
        assert!(input_request(key(KeyCode::Char('f'), KeyModifiers::CONTROL)).is_none());
        assert!(matches!(
            input_request(key(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(InputRequest::DeleteLine)
        ));
    }
}
