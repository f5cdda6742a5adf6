//! The two button columns beside the edit canvas.

use egui::{vec2, Align, Layout, Ui};

use crate::annotation::{LineStyle, NewAnnotation};
use crate::state::EditorState;
use crate::theme;
use crate::ui_controls;

/// Left column: markers 1-6, then Line and Text. Right column: markers 7-12,
/// then Curve.
pub fn button_columns() -> [Vec<NewAnnotation>; 2] {
    let left = (1..=6)
        .map(NewAnnotation::Number)
        .chain([NewAnnotation::Line(LineStyle::Straight), NewAnnotation::TextBox])
        .collect();
    let right = (7..=12)
        .map(NewAnnotation::Number)
        .chain([NewAnnotation::Line(LineStyle::Curved)])
        .collect();
    [left, right]
}

pub fn button_label(action: NewAnnotation) -> String {
    match action {
        NewAnnotation::Number(number) => number.to_string(),
        NewAnnotation::Line(LineStyle::Straight) => "Line".to_owned(),
        NewAnnotation::Line(LineStyle::Curved) => "Curve".to_owned(),
        NewAnnotation::TextBox => "Text".to_owned(),
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut EditorState) {
    let theme = theme::athletics_theme();
    let gap = theme.layout.number_gap;

    ui.horizontal_top(|ui| {
        ui.spacing_mut().item_spacing = vec2(gap, gap);
        for column in button_columns() {
            ui.with_layout(Layout::top_down(Align::Min), |ui| {
                ui.set_width(theme.layout.number_button.x);
                for action in column {
                    let label = button_label(action);
                    if ui_controls::coral_button(ui, &theme, &label, theme.layout.number_button)
                        .clicked()
                    {
                        let id = state.add_annotation(action);
                        tracing::debug!(id, ?action, "toolbar created annotation");
                    }
                }
            });
        }
    });
}
