//! The edit canvas: paints the board over the background and feeds raw
//! pointer input to the gesture controller.

use egui::text::CCursor;
use egui::text_selection::CCursorRange;
use egui::{
    vec2, Align2, Color32, Context, CursorIcon, FontId, Frame, Id, Order, Painter, Pos2, Rect,
    Response, Sense, Shape, Stroke, TextEdit, Ui,
};

use crate::annotation::{Annotation, AnnotationBody, AnnotationId, Draggable, Point, Resizable};
use crate::interaction::Gesture;
use crate::state::{canvas_size_vec2, EditorState};
use crate::theme::{color32, DIAGRAM, LINE_STROKE_WIDTH, NUMBER_FONT_SIZE, TEXT_BOX_FONT_SIZE};

const CURVE_SEGMENTS: usize = 32;

pub fn show_canvas(ui: &mut Ui, state: &mut EditorState) {
    let ctx = ui.ctx().clone();
    let (canvas_rect, response) =
        ui.allocate_exact_size(canvas_size_vec2(), Sense::click_and_drag());
    let origin = canvas_rect.min;

    let painter = ui.painter_at(canvas_rect);
    draw_background(&painter, &ctx, state, canvas_rect);
    draw_annotations(&painter, state, origin);

    handle_pointer_interaction(ui, &ctx, state, &response, canvas_rect);
    draw_text_editor(&ctx, state, origin);
}

fn draw_background(painter: &Painter, ctx: &Context, state: &mut EditorState, canvas_rect: Rect) {
    let texture_id = state.background.as_mut().and_then(|background| {
        background.ensure_texture(ctx);
        background.texture.as_ref().map(|texture| texture.id())
    });

    match texture_id {
        Some(texture_id) => {
            painter.image(
                texture_id,
                canvas_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(canvas_rect, 0.0, color32(DIAGRAM.canvas_fill));
        }
    }
}

fn draw_annotations(painter: &Painter, state: &EditorState, origin: Pos2) {
    for annotation in state.board.iter() {
        let editing = state.controller.is_editing(annotation.id);
        draw_annotation(painter, annotation, origin, editing);
    }
}

fn draw_annotation(painter: &Painter, annotation: &Annotation, origin: Pos2, editing: bool) {
    let bounds = annotation.bounds().translate(origin.to_vec2());
    // Nothing paints outside its own box, rotated lines included.
    let painter = painter.with_clip_rect(bounds);
    let caption_color = color32(DIAGRAM.caption);

    match &annotation.body {
        AnnotationBody::Number(marker) => {
            painter.text(
                bounds.center(),
                Align2::CENTER_CENTER,
                &marker.label,
                FontId::monospace(NUMBER_FONT_SIZE),
                caption_color,
            );
        }
        AnnotationBody::Line(line) => {
            let stroke = Stroke::new(LINE_STROKE_WIDTH, color32(DIAGRAM.line));
            let (start, control, end) = line.geometry(annotation.pos).rotated();
            let start = canvas_to_screen(start, origin);
            let end = canvas_to_screen(end, origin);
            match control {
                Some(control) => {
                    let control = canvas_to_screen(control, origin);
                    let points = quadratic_polyline(start, control, end, CURVE_SEGMENTS);
                    painter.add(Shape::line(points, stroke));
                }
                None => {
                    painter.line_segment([start, end], stroke);
                }
            }
        }
        AnnotationBody::TextBox(text_box) => {
            painter.rect_filled(bounds, 0.0, color32(DIAGRAM.text_box_fill));
            painter.rect_stroke(
                bounds.shrink(0.5),
                0.0,
                Stroke::new(1.0, color32(DIAGRAM.text_box_border)),
            );
            // The inline editor draws its own text on top.
            if editing {
                return;
            }
            if let Some(text) = annotation.editable() {
                painter.text(
                    bounds.center(),
                    Align2::CENTER_CENTER,
                    text.text(),
                    FontId::monospace(TEXT_BOX_FONT_SIZE),
                    caption_color,
                );
            }
            let handle = text_box
                .resize_handle(annotation.pos)
                .translate(origin.to_vec2());
            painter.rect_filled(handle, 0.0, color32(DIAGRAM.handle));
        }
    }
}

fn handle_pointer_interaction(
    ui: &Ui,
    ctx: &Context,
    state: &mut EditorState,
    response: &Response,
    canvas_rect: Rect,
) {
    let origin = canvas_rect.min;
    let (pressed, released, press_pos, latest_pos) = ctx.input(|input| {
        (
            input.pointer.primary_pressed(),
            input.pointer.primary_released(),
            input.pointer.interact_pos(),
            input.pointer.latest_pos(),
        )
    });

    if pressed {
        if let Some(pos) = press_pos.filter(|_| ui.rect_contains_pointer(canvas_rect)) {
            state
                .controller
                .pointer_down(&state.board, screen_to_canvas(pos, origin));
        }
    }

    if state.controller.gesture() != Gesture::Idle {
        if let Some(pos) = latest_pos {
            if state
                .controller
                .pointer_move(&mut state.board, screen_to_canvas(pos, origin))
            {
                ctx.request_repaint();
            }
        }
    }

    if released {
        state.controller.pointer_up();
    }

    if response.double_clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            state
                .controller
                .double_click(&state.board, screen_to_canvas(pos, origin));
        }
    }

    let over_handle = response.hover_pos().is_some_and(|pos| {
        let point = screen_to_canvas(pos, origin);
        state
            .board
            .pick(point)
            .is_some_and(|annotation| annotation.handle_contains(point))
    });
    if over_handle || matches!(state.controller.gesture(), Gesture::Resizing { .. }) {
        ctx.set_cursor_icon(CursorIcon::ResizeNwSe);
    }
}

/// Single-line editor laid over the text box being edited. Commits when it
/// loses focus, which includes Enter.
fn draw_text_editor(ctx: &Context, state: &mut EditorState, origin: Pos2) {
    let Some(edit) = state.controller.text_edit() else {
        return;
    };
    let Some(bounds) = state.board.get(edit.annotation_id).map(|a| a.bounds()) else {
        return;
    };

    let editor_id = text_editor_id(edit.annotation_id);
    let select_all = edit.select_all_pending;
    let mut buffer = edit.buffer.clone();
    let screen_rect = bounds.translate(origin.to_vec2());

    let response = egui::Area::new(editor_id.with("area"))
        .order(Order::Foreground)
        .fixed_pos(screen_rect.min)
        .show(ctx, |ui| {
            Frame::none()
                .fill(color32(DIAGRAM.text_box_fill))
                .stroke(Stroke::new(1.0, color32(DIAGRAM.text_box_border)))
                .show(ui, |ui| {
                    ui.add_sized(
                        screen_rect.size(),
                        TextEdit::singleline(&mut buffer)
                            .id(editor_id)
                            .font(FontId::monospace(TEXT_BOX_FONT_SIZE))
                            .text_color(color32(DIAGRAM.caption))
                            .margin(vec2(4.0, 2.0))
                            .frame(false),
                    )
                })
                .inner
        })
        .inner;

    if select_all {
        let mut text_state = TextEdit::load_state(ctx, editor_id).unwrap_or_default();
        let end = buffer.chars().count();
        text_state
            .cursor
            .set_char_range(Some(CCursorRange::two(CCursor::new(0), CCursor::new(end))));
        text_state.store(ctx, editor_id);
        response.request_focus();
    }
    let commit = response.lost_focus();

    if let Some(edit) = state.controller.text_edit_mut() {
        edit.buffer = buffer;
        edit.select_all_pending = false;
    }
    if commit {
        state.controller.finish_editing(&mut state.board);
    }
}

fn text_editor_id(annotation_id: AnnotationId) -> Id {
    Id::new("umpire_text_box_editor").with(annotation_id)
}

fn quadratic_polyline(start: Pos2, control: Pos2, end: Pos2, segments: usize) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(segments + 1);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let u = 1.0 - t;
        let a = u * u;
        let b = 2.0 * u * t;
        let c = t * t;
        points.push(Pos2::new(
            a * start.x + b * control.x + c * end.x,
            a * start.y + b * control.y + c * end.y,
        ));
    }

    points
}

fn canvas_to_screen(point: Point, origin: Pos2) -> Pos2 {
    origin + point.to_pos2().to_vec2()
}

fn screen_to_canvas(pos: Pos2, origin: Pos2) -> Point {
    Point::from_pos2(Pos2::ZERO + (pos - origin))
}
