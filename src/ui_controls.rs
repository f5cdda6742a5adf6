use egui::{vec2, Frame, Margin, RichText, Rounding, Stroke, Ui, Vec2};

use crate::theme::AppTheme;

pub fn tab_bar_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.app_bg)
        .inner_margin(Margin::symmetric(theme.layout.space_3, theme.layout.space_2))
}

pub fn panel_frame(theme: &AppTheme) -> Frame {
    Frame::none()
        .fill(theme.surfaces.app_bg)
        .inner_margin(Margin::symmetric(theme.layout.space_3, theme.layout.space_2))
}

pub fn tab_chip(ui: &mut Ui, theme: &AppTheme, label: &str, selected: bool) -> egui::Response {
    let fill = if selected {
        theme.surfaces.tab_selected
    } else {
        theme.surfaces.label_bg
    };
    let stroke_width = if selected { 2.0 } else { 1.0 };

    ui.add(
        egui::Button::new(RichText::new(label).strong())
            .min_size(vec2(90.0, 26.0))
            .fill(fill)
            .stroke(Stroke::new(stroke_width, theme.surfaces.stroke))
            .rounding(Rounding::same(theme.controls.button_rounding)),
    )
}

/// Fixed-size coral button used by the annotation columns and the action bar.
pub fn coral_button(ui: &mut Ui, theme: &AppTheme, label: &str, size: Vec2) -> egui::Response {
    ui.add_sized(
        size,
        egui::Button::new(RichText::new(label).strong())
            .rounding(Rounding::same(theme.controls.button_rounding)),
    )
}

/// Caption on a burlywood plate, placed above the View tab dropdowns.
pub fn field_label(ui: &mut Ui, theme: &AppTheme, text: &str) {
    Frame::none()
        .fill(theme.surfaces.label_bg)
        .rounding(Rounding::same(theme.controls.button_rounding))
        .inner_margin(Margin::symmetric(theme.layout.space_2, theme.layout.space_1))
        .show(ui, |ui| {
            ui.label(RichText::new(text).strong());
        });
}

pub fn keycap(ui: &mut Ui, theme: &AppTheme, label: &str) {
    Frame::none()
        .fill(theme.surfaces.label_bg)
        .stroke(Stroke::new(1.0, theme.surfaces.stroke))
        .rounding(Rounding::same(3.0))
        .inner_margin(Margin::symmetric(5.0, 1.0))
        .show(ui, |ui| {
            ui.label(RichText::new(label).small().strong());
        });
}

pub fn status_text(ui: &mut Ui, theme: &AppTheme, text: &str, is_error: bool) {
    let color = if is_error {
        theme.text.error
    } else {
        theme.text.primary
    };
    ui.label(RichText::new(text).small().color(color));
}
