//! View tab: shows a pre-made diagram picked from two dropdowns.

use egui::{Align2, Color32, ComboBox, FontId, Pos2, Rect, Sense, Ui};

use crate::reference::{EVENTS, EVENT_PLACEHOLDER, UMPIRE_COUNTS, UMPIRE_PLACEHOLDER};
use crate::state::{canvas_size_vec2, EditorState};
use crate::theme::{self, color32, DIAGRAM};
use crate::ui_controls;

pub struct ViewPanelOutput {
    pub copy: bool,
}

pub fn show_view_panel(ui: &mut Ui, state: &mut EditorState) -> ViewPanelOutput {
    let theme = theme::athletics_theme();
    let mut out = ViewPanelOutput { copy: false };

    let (rect, response) = ui.allocate_exact_size(canvas_size_vec2(), Sense::click());
    let texture_id = state.reference.image.as_mut().and_then(|image| {
        image.ensure_texture(ui.ctx());
        image.texture.as_ref().map(|texture| texture.id())
    });
    let painter = ui.painter_at(rect);
    match texture_id {
        Some(texture_id) => {
            painter.image(
                texture_id,
                rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(rect, 0.0, color32(DIAGRAM.canvas_fill));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No diagram loaded",
                FontId::monospace(16.0),
                theme.text.primary,
            );
        }
    }

    let _ = response.context_menu(|ui| {
        if ui.button("Copy Image").clicked() {
            out.copy = true;
            ui.close_menu();
        }
    });

    ui.add_space(theme.layout.space_2);
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui_controls::field_label(ui, &theme, "Event");
            let mut event = state.reference.selection.event;
            let selected = state
                .reference
                .selection
                .event_label()
                .unwrap_or(EVENT_PLACEHOLDER);
            ComboBox::from_id_source("event_combo")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for (index, label) in EVENTS.iter().enumerate() {
                        ui.selectable_value(&mut event, Some(index), *label);
                    }
                });
            state.select_event(event);
        });

        ui.add_space(theme.layout.space_3);

        ui.vertical(|ui| {
            ui_controls::field_label(ui, &theme, "Umpires");
            let mut umpires = state.reference.selection.umpires;
            let selected = umpires.map_or_else(|| UMPIRE_PLACEHOLDER.to_owned(), |n| n.to_string());
            ComboBox::from_id_source("umpire_combo")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    for count in UMPIRE_COUNTS {
                        ui.selectable_value(&mut umpires, Some(count), count.to_string());
                    }
                });
            state.select_umpires(umpires);
        });
    });

    out
}
