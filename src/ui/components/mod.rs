pub mod date_input;
pub mod popup;
pub mod task_list;

use crossterm::event::KeyCode;

/// Apply a key press to a free-text field.
pub fn edit_text(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Wrapping selection step used by list screens.
pub fn step_index(current: Option<usize>, len: usize, forward: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match current {
        Some(i) if forward => {
            if i >= len - 1 {
                0
            } else {
                i + 1
            }
        }
        Some(i) => {
            if i == 0 {
                len - 1
            } else {
                i - 1
            }
        }
        None => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_editing() {
        let mut value = String::from("ab");
        edit_text(&mut value, KeyCode::Char('c'));
        edit_text(&mut value, KeyCode::Backspace);
        edit_text(&mut value, KeyCode::Backspace);
        edit_text(&mut value, KeyCode::Enter);
        assert_eq!(value, "a");
    }

    #[test]
    fn index_wraps_both_ways() {
        assert_eq!(step_index(None, 0, true), None);
        assert_eq!(step_index(None, 3, false), Some(0));
        assert_eq!(step_index(Some(2), 3, true), Some(0));
        assert_eq!(step_index(Some(0), 3, false), Some(2));
        assert_eq!(step_index(Some(1), 3, true), Some(2));
    }
}
