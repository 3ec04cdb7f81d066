use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use querydeck_api::ConnectionConfig;

use crate::widgets::{
    connection_form::{ConnectionForm, FormAction, FormItem},
    query_editor::{EditorField, QueryEditor},
    search_filter::SearchFilter,
};

/// Macro to generate text input key handling logic
macro_rules! handle_text_input {
    ($key:expr, $widget:expr, $on_change:block, $on_esc_enter:block, $handle_esc:expr) => {{
        match ($key.modifiers, $key.code) {
            (_, KeyCode::Esc | KeyCode::Enter) if $handle_esc => {
                $on_esc_enter;
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                $widget.move_cursor_to_start();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                $widget.move_cursor_to_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                $widget.clear();
                $on_change;
                true
            }
            (modifiers, KeyCode::Char(ch))
                if !ch.is_control()
                    && !modifiers.intersects(
                        KeyModifiers::CONTROL | KeyModifiers::ALT,
                    ) =>
            {
                $widget.add_char(ch);
                $on_change;
                true
            }
            (_, KeyCode::Backspace) => {
                $widget.delete_char();
                $on_change;
                true
            }
            (_, KeyCode::Left) => {
                $widget.move_cursor_left();
                true
            }
            (_, KeyCode::Right) => {
                $widget.move_cursor_right();
                true
            }
            (_, KeyCode::Home) => {
                $widget.move_cursor_to_start();
                true
            }
            (_, KeyCode::End) => {
                $widget.move_cursor_to_end();
                true
            }
            _ => false,
        }
    }};
}

/// Handles search filter key events
pub fn handle_search_filter_input(
    key: KeyEvent,
    search_filter: &mut SearchFilter,
    on_filter_change: &mut dyn FnMut(&str),
) -> bool {
    let mut changed = false;
    let handled = handle_text_input!(
        key,
        search_filter,
        {
            changed = true;
        },
        {
            search_filter.deactivate();
        },
        true
    );
    if changed {
        on_filter_change(search_filter.query());
    }
    handled
}

/// Handles typing in the prompt or query box.
///
/// Enter inserts a line break in the query box and is left to the caller in
/// the prompt box, where it starts a generation.
pub fn handle_query_editor_input(
    key: KeyEvent,
    editor: &mut QueryEditor,
) -> bool {
    if key.code == KeyCode::Enter {
        return match editor.field {
            EditorField::Query => {
                editor.focused_input_mut().new_line();
                true
            }
            EditorField::Prompt => false,
        };
    }
    let input = editor.focused_input_mut();
    handle_text_input!(key, input, {}, {}, false)
}

/// Handles key events while the connection form is open.
///
/// Field edits are written straight into `config`, so the live config always
/// mirrors the form.
pub fn handle_connection_form_input(
    key: KeyEvent,
    form: &mut ConnectionForm,
    config: &mut ConnectionConfig,
) -> FormAction {
    match (key.code, form.focused_item()) {
        (KeyCode::Esc, _) | (KeyCode::Enter, FormItem::Cancel) => {
            form.close();
            FormAction::Cancel
        }
        (KeyCode::Tab | KeyCode::Down, _) => {
            form.next_item();
            FormAction::None
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            form.prev_item();
            FormAction::None
        }
        (KeyCode::Enter, FormItem::Connect) => {
            form.apply_to(config);
            match config.validate() {
                Ok(()) => {
                    form.validation_error = None;
                    FormAction::Connect
                }
                Err(message) => {
                    form.validation_error = Some(message);
                    FormAction::None
                }
            }
        }
        (KeyCode::Enter, _) => {
            form.next_item();
            FormAction::None
        }
        (
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' '),
            FormItem::Kind,
        ) => {
            form.toggle_kind();
            form.apply_to(config);
            FormAction::Changed
        }
        (KeyCode::Left, FormItem::Cancel) => {
            form.focus_item(FormItem::Connect);
            FormAction::None
        }
        (KeyCode::Right, FormItem::Connect) => {
            form.focus_item(FormItem::Cancel);
            FormAction::None
        }
        _ => {
            let mut changed = false;
            if let Some(input) = form.focused_input_mut() {
                handle_text_input!(
                    key,
                    input,
                    {
                        changed = true;
                    },
                    {},
                    false
                );
            }
            if changed {
                form.apply_to(config);
                FormAction::Changed
            } else {
                FormAction::None
            }
        }
    }
}
