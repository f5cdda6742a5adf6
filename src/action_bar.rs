use egui::{vec2, Ui};

use crate::annotation::Rotation;
use crate::state::EditorState;
use crate::theme;
use crate::ui_controls;

pub struct ActionBarOutput {
    pub copy: bool,
    pub save: bool,
}

/// Which key hints apply to the focused annotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyHints {
    /// Current orientation when the focused annotation can rotate.
    pub rotation: Option<Rotation>,
    pub delete: bool,
}

pub fn key_hints(state: &EditorState) -> KeyHints {
    let focused = state
        .controller
        .focus()
        .and_then(|id| state.board.get(id));
    KeyHints {
        rotation: focused
            .and_then(|annotation| annotation.rotatable())
            .map(|shape| shape.rotation()),
        delete: focused.is_some(),
    }
}

/// Modifier glyph shown on the keycaps next to the buttons.
pub fn command_key_label(macos: bool) -> &'static str {
    if macos {
        "⌘"
    } else {
        "Ctrl"
    }
}

fn rotate_label(rotation: Option<Rotation>) -> String {
    match rotation {
        Some(rotation) => format!("rotate ({}°)", rotation.degrees()),
        None => "rotate".to_owned(),
    }
}

pub fn show_action_bar(ui: &mut Ui, hints: KeyHints, copied_feedback: bool) -> ActionBarOutput {
    let theme = theme::athletics_theme();
    let modifier = command_key_label(cfg!(target_os = "macos"));
    let mut out = ActionBarOutput {
        copy: false,
        save: false,
    };

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(theme.layout.space_2, 0.0);

        if ui_controls::coral_button(ui, &theme, "Save Image", theme.layout.action_button)
            .on_hover_text(format!("{modifier}+S"))
            .clicked()
        {
            out.save = true;
        }

        let copy_text = if copied_feedback { "Copied" } else { "Copy Image" };
        if ui_controls::coral_button(ui, &theme, copy_text, theme.layout.action_button)
            .on_hover_text(format!("{modifier}+C"))
            .clicked()
        {
            out.copy = true;
        }

        ui.add_space(theme.layout.space_3);
        ui.add_enabled_ui(hints.rotation.is_some(), |ui| {
            ui_controls::keycap(ui, &theme, "R");
            ui.label(rotate_label(hints.rotation));
        });
        ui.add_enabled_ui(hints.delete, |ui| {
            ui_controls::keycap(ui, &theme, "Del");
            ui.label("delete");
        });
    });

    out
}

#[cfg(test)]
mod tests {
    use super::{command_key_label, key_hints, rotate_label, KeyHints};
    use crate::annotation::{LineStyle, NewAnnotation, Point};
    use crate::reference::ImageLibrary;
    use crate::settings::UserSettings;
    use crate::annotation::Rotation;
use crate::state::EditorState;

    #[test]
    fn shortcut_modifier_follows_platform() {
        assert_eq!(command_key_label(true), "⌘");
        assert_eq!(command_key_label(false), "Ctrl");
    }

    #[test]
    fn hints_follow_the_focused_annotation() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state =
            EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());
        assert_eq!(key_hints(&state), KeyHints::default());

        state.add_annotation(NewAnnotation::Number(4));
        state.controller.pointer_down(&state.board, Point::new(110.0, 110.0));
        assert_eq!(
            key_hints(&state),
            KeyHints {
                rotation: None,
                delete: true
            }
        );

        let line = state
            .board
            .create(NewAnnotation::Line(LineStyle::Curved), Point::new(400.0, 200.0));
        state.controller.pointer_down(&state.board, Point::new(420.0, 230.0));
        assert_eq!(state.controller.focus(), Some(line));
        assert_eq!(key_hints(&state).rotation.map(|r| r.degrees()), Some(0));

        state.board.set_rotation(line);
        state.board.set_rotation(line);
        let hints = key_hints(&state);
        assert_eq!(rotate_label(hints.rotation), "rotate (30°)");
        assert_eq!(rotate_label(None), "rotate");
    }
}
