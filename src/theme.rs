use egui::{
    vec2, Color32, Context, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals,
};

#[derive(Clone, Debug)]
pub struct AppTheme {
    pub surfaces: SurfaceTokens,
    pub text: TextTokens,
    pub controls: ControlTokens,
    pub layout: LayoutTokens,
}

#[derive(Clone, Debug)]
pub struct SurfaceTokens {
    pub app_bg: Color32,
    pub button: Color32,
    pub button_hover: Color32,
    pub label_bg: Color32,
    pub tab_selected: Color32,
    pub stroke: Color32,
}

#[derive(Clone, Debug)]
pub struct TextTokens {
    pub primary: Color32,
    pub error: Color32,
}

#[derive(Clone, Debug)]
pub struct ControlTokens {
    pub button_rounding: f32,
    pub body_size: f32,
    pub heading_size: f32,
}

#[derive(Clone, Debug)]
pub struct LayoutTokens {
    pub space_1: f32,
    pub space_2: f32,
    pub space_3: f32,
    pub number_button: egui::Vec2,
    pub number_gap: f32,
    pub action_button: egui::Vec2,
}

/// Straight RGBA colors shared by the live canvas and the PNG export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagramPalette {
    pub canvas_fill: [u8; 4],
    pub line: [u8; 4],
    pub caption: [u8; 4],
    pub text_box_fill: [u8; 4],
    pub text_box_border: [u8; 4],
    pub handle: [u8; 4],
}

pub const DIAGRAM: DiagramPalette = DiagramPalette {
    // lightgoldenrodyellow
    canvas_fill: [250, 250, 210, 255],
    line: [0, 0, 255, 255],
    caption: [0, 0, 0, 255],
    text_box_fill: [255, 255, 255, 255],
    text_box_border: [0, 0, 0, 255],
    handle: [0x66, 0x66, 0x66, 255],
};

pub const LINE_STROKE_WIDTH: f32 = 3.0;
pub const NUMBER_FONT_SIZE: f32 = 17.0;
pub const TEXT_BOX_FONT_SIZE: f32 = 16.0;

pub fn color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

pub fn athletics_theme() -> AppTheme {
    AppTheme {
        surfaces: SurfaceTokens {
            app_bg: color32(DIAGRAM.canvas_fill),
            // lightcoral, salmon
            button: Color32::from_rgb(240, 128, 128),
            button_hover: Color32::from_rgb(250, 128, 114),
            // burlywood
            label_bg: Color32::from_rgb(222, 184, 135),
            tab_selected: Color32::from_rgb(238, 232, 170),
            stroke: Color32::from_rgb(0x55, 0x4B, 0x3C),
        },
        text: TextTokens {
            primary: Color32::BLACK,
            error: Color32::from_rgb(0xB0, 0x1E, 0x1E),
        },
        controls: ControlTokens {
            button_rounding: 3.0,
            body_size: 14.0,
            heading_size: 20.0,
        },
        layout: LayoutTokens {
            space_1: 3.0,
            space_2: 6.0,
            space_3: 12.0,
            number_button: vec2(80.0, 50.0),
            number_gap: 3.0,
            action_button: vec2(120.0, 32.0),
        },
    }
}

pub fn apply_theme(ctx: &Context, theme: &AppTheme) {
    let mut style: Style = (*ctx.style()).clone();

    style.spacing.item_spacing = vec2(theme.layout.space_2, theme.layout.space_2);
    style.spacing.button_padding = vec2(theme.layout.space_2, theme.layout.space_1);
    style.spacing.combo_width = 220.0;

    style.visuals = Visuals::light();
    style.visuals.override_text_color = Some(theme.text.primary);
    style.visuals.panel_fill = theme.surfaces.app_bg;
    style.visuals.window_fill = theme.surfaces.app_bg;
    style.visuals.extreme_bg_color = Color32::WHITE;

    let rounding = Rounding::same(theme.controls.button_rounding);
    let widgets = &mut style.visuals.widgets;
    widgets.noninteractive.bg_fill = theme.surfaces.app_bg;
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, theme.text.primary);
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke);

    widgets.inactive.bg_fill = theme.surfaces.button;
    widgets.inactive.weak_bg_fill = theme.surfaces.button;
    widgets.inactive.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke);
    widgets.inactive.fg_stroke = Stroke::new(1.0, theme.text.primary);

    widgets.hovered.bg_fill = theme.surfaces.button_hover;
    widgets.hovered.weak_bg_fill = theme.surfaces.button_hover;
    widgets.hovered.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke);
    widgets.hovered.fg_stroke = Stroke::new(1.0, theme.text.primary);

    widgets.active.bg_fill = theme.surfaces.button_hover;
    widgets.active.weak_bg_fill = theme.surfaces.button_hover;
    widgets.active.bg_stroke = Stroke::new(1.5, theme.surfaces.stroke);
    widgets.active.fg_stroke = Stroke::new(1.0, theme.text.primary);

    widgets.open.bg_fill = theme.surfaces.label_bg;
    widgets.open.weak_bg_fill = theme.surfaces.label_bg;
    widgets.open.bg_stroke = Stroke::new(1.0, theme.surfaces.stroke);
    widgets.open.fg_stroke = Stroke::new(1.0, theme.text.primary);

    for visuals in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        visuals.rounding = rounding;
    }

    style.visuals.selection.bg_fill = theme.surfaces.tab_selected;
    style.visuals.selection.stroke = Stroke::new(1.0, theme.text.primary);

    // The whole UI uses a Courier-like face.
    let mono = |size: f32| FontId::new(size, FontFamily::Monospace);
    style
        .text_styles
        .insert(TextStyle::Heading, mono(theme.controls.heading_size));
    style
        .text_styles
        .insert(TextStyle::Body, mono(theme.controls.body_size));
    style
        .text_styles
        .insert(TextStyle::Button, mono(theme.controls.body_size));
    style
        .text_styles
        .insert(TextStyle::Monospace, mono(theme.controls.body_size));
    style.text_styles.insert(TextStyle::Small, mono(12.0));

    ctx.set_style(style);
}
