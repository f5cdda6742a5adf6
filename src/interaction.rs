//! Pointer and keyboard gestures over the annotation board.
//!
//! The controller never talks to egui: `canvas.rs` translates raw input into
//! the entry points below, so every gesture is reproducible in tests.

use egui::Vec2;

use crate::annotation::{AnnotationId, Draggable, Point, Size};
use crate::board::Board;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    Idle,
    Dragging {
        id: AnnotationId,
        /// Pointer position relative to the annotation's origin at press time.
        offset: Vec2,
    },
    Resizing {
        id: AnnotationId,
        initial_size: Size,
        initial_pointer: Point,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorKey {
    Rotate,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextEditState {
    pub annotation_id: AnnotationId,
    pub buffer: String,
    /// Set until the binding has focused the input and selected its text.
    pub select_all_pending: bool,
}

#[derive(Clone, Debug)]
pub struct Controller {
    gesture: Gesture,
    focus: Option<AnnotationId>,
    text_edit: Option<TextEditState>,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            gesture: Gesture::Idle,
            focus: None,
            text_edit: None,
        }
    }
}

impl Controller {
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn focus(&self) -> Option<AnnotationId> {
        self.focus
    }

    pub fn text_edit(&self) -> Option<&TextEditState> {
        self.text_edit.as_ref()
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEditState> {
        self.text_edit.as_mut()
    }

    pub fn is_editing(&self, id: AnnotationId) -> bool {
        self.text_edit
            .as_ref()
            .is_some_and(|edit| edit.annotation_id == id)
    }

    /// Starts a drag or, on a text box handle, a resize. Returns whether an
    /// annotation was hit.
    pub fn pointer_down(&mut self, board: &Board, pointer: Point) -> bool {
        if let Some(edit) = self.text_edit.as_ref() {
            let inside_edited = board
                .get(edit.annotation_id)
                .is_some_and(|annotation| annotation.contains(pointer));
            if inside_edited {
                return true;
            }
        }

        let Some(annotation) = board.pick(pointer) else {
            self.focus = None;
            self.gesture = Gesture::Idle;
            return false;
        };

        if let Some(shape) = annotation.resizable() {
            if shape.resize_handle(annotation.pos).contains(pointer.to_pos2()) {
                self.gesture = Gesture::Resizing {
                    id: annotation.id,
                    initial_size: shape.current_size(),
                    initial_pointer: pointer,
                };
                return true;
            }
        }

        self.gesture = Gesture::Dragging {
            id: annotation.id,
            offset: annotation.pos.delta(pointer),
        };
        self.focus = Some(annotation.id);
        true
    }

    /// Applies the active gesture. Returns whether the board changed.
    pub fn pointer_move(&mut self, board: &mut Board, pointer: Point) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Dragging { id, offset } => {
                board.set_position(id, pointer.offset(-offset))
            }
            Gesture::Resizing {
                id,
                initial_size,
                initial_pointer,
            } => {
                let delta = initial_pointer.delta(pointer);
                let requested = Size::new(initial_size.w + delta.x, initial_size.h + delta.y);
                board.set_size(id, requested).is_some()
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Handles a key aimed at the focused annotation. Returns whether a
    /// redraw is needed.
    pub fn key_down(&mut self, board: &mut Board, key: EditorKey) -> bool {
        if self.text_edit.is_some() {
            return false;
        }
        let Some(focused) = self.focus else {
            return false;
        };

        match key {
            EditorKey::Rotate => board.set_rotation(focused).is_some(),
            EditorKey::Delete => {
                let removed = board.delete(focused);
                self.release(focused);
                removed
            }
        }
    }

    /// Opens the inline editor when `pointer` is on a text box.
    pub fn double_click(&mut self, board: &Board, pointer: Point) -> bool {
        let Some(annotation) = board.pick(pointer) else {
            return false;
        };
        let Some(text) = annotation.editable() else {
            return false;
        };

        self.gesture = Gesture::Idle;
        self.focus = Some(annotation.id);
        self.text_edit = Some(TextEditState {
            annotation_id: annotation.id,
            buffer: text.text().to_string(),
            select_all_pending: true,
        });
        true
    }

    /// Commits the inline editor's buffer, even when empty, and closes it.
    pub fn finish_editing(&mut self, board: &mut Board) -> bool {
        let Some(edit) = self.text_edit.take() else {
            return false;
        };
        board.set_text(edit.annotation_id, edit.buffer)
    }

    /// Drops focus, gestures and edits that reference an annotation which is
    /// gone.
    pub fn forget_missing(&mut self, board: &Board) {
        let stale = |id: Option<AnnotationId>| id.is_some_and(|id| !board.contains(id));
        if stale(self.focus) {
            self.focus = None;
        }
        if stale(self.gesture_target()) {
            self.gesture = Gesture::Idle;
        }
        if stale(self.text_edit.as_ref().map(|edit| edit.annotation_id)) {
            self.text_edit = None;
        }
    }

    fn gesture_target(&self) -> Option<AnnotationId> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Dragging { id, .. } | Gesture::Resizing { id, .. } => Some(id),
        }
    }

    fn release(&mut self, id: AnnotationId) {
        if self.focus == Some(id) {
            self.focus = None;
        }
        if self.gesture_target() == Some(id) {
            self.gesture = Gesture::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Controller, EditorKey, Gesture};
    use crate::annotation::{LineStyle, NewAnnotation, Point, Size, SPAWN_POINT, TEXT_BOX_MIN_SIZE};
    use crate::board::Board;

    #[test]
    fn drag_keeps_grab_offset() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::Number(4), Point::new(100.0, 100.0));
        let mut controller = Controller::default();

        assert!(controller.pointer_down(&board, Point::new(110.0, 105.0)));
        assert_eq!(controller.focus(), Some(id));
        assert!(matches!(controller.gesture(), Gesture::Dragging { .. }));

        assert!(controller.pointer_move(&mut board, Point::new(200.0, 150.0)));
        assert_eq!(board.get(id).map(|a| a.pos), Some(Point::new(190.0, 145.0)));

        controller.pointer_up();
        assert_eq!(controller.gesture(), Gesture::Idle);
        assert!(!controller.pointer_move(&mut board, Point::new(0.0, 0.0)));
        assert_eq!(board.get(id).map(|a| a.pos), Some(Point::new(190.0, 145.0)));
    }

    #[test]
    fn drag_can_leave_the_canvas() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::Line(LineStyle::Straight), SPAWN_POINT);
        let mut controller = Controller::default();

        controller.pointer_down(&board, Point::new(101.0, 101.0));
        controller.pointer_move(&mut board, Point::new(-400.0, -400.0));
        assert_eq!(board.get(id).map(|a| a.pos), Some(Point::new(-401.0, -401.0)));
    }

    #[test]
    fn press_on_empty_canvas_clears_focus() {
        let mut board = Board::default();
        board.create(NewAnnotation::Number(1), SPAWN_POINT);
        let mut controller = Controller::default();

        controller.pointer_down(&board, Point::new(110.0, 110.0));
        assert!(controller.focus().is_some());
        assert!(!controller.pointer_down(&board, Point::new(600.0, 350.0)));
        assert!(controller.focus().is_none());
        assert!(!controller.key_down(&mut board, EditorKey::Delete));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn handle_press_resizes_with_floor() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::TextBox, Point::new(100.0, 100.0));
        let mut controller = Controller::default();

        assert!(controller.pointer_down(&board, Point::new(216.0, 126.0)));
        assert!(matches!(controller.gesture(), Gesture::Resizing { .. }));

        controller.pointer_move(&mut board, Point::new(256.0, 146.0));
        let size = |board: &Board| {
            board
                .get(id)
                .and_then(|a| a.resizable())
                .map(|shape| shape.current_size())
        };
        assert_eq!(size(&board), Some(Size::new(160.0, 50.0)));

        controller.pointer_move(&mut board, Point::new(0.0, 0.0));
        assert_eq!(size(&board), Some(TEXT_BOX_MIN_SIZE));
        assert_eq!(board.get(id).map(|a| a.pos), Some(Point::new(100.0, 100.0)));

        controller.pointer_up();
        assert_eq!(controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn rotate_key_turns_focused_line() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::Line(LineStyle::Curved), SPAWN_POINT);
        let mut controller = Controller::default();
        controller.pointer_down(&board, Point::new(150.0, 130.0));
        controller.pointer_up();

        for _ in 0..24 {
            assert!(controller.key_down(&mut board, EditorKey::Rotate));
        }
        let degrees = board
            .get(id)
            .and_then(|a| a.rotatable())
            .map(|line| line.rotation().degrees());
        assert_eq!(degrees, Some(0));

        controller.key_down(&mut board, EditorKey::Rotate);
        let degrees = board
            .get(id)
            .and_then(|a| a.rotatable())
            .map(|line| line.rotation().degrees());
        assert_eq!(degrees, Some(15));
    }

    #[test]
    fn rotate_key_ignored_for_numbers() {
        let mut board = Board::default();
        board.create(NewAnnotation::Number(5), SPAWN_POINT);
        let mut controller = Controller::default();
        controller.pointer_down(&board, Point::new(105.0, 105.0));
        assert!(!controller.key_down(&mut board, EditorKey::Rotate));
    }

    #[test]
    fn delete_key_removes_focused_and_releases_focus() {
        let mut board = Board::default();
        let keep = board.create(NewAnnotation::Number(1), Point::new(300.0, 300.0));
        let doomed = board.create(NewAnnotation::Number(2), SPAWN_POINT);
        let mut controller = Controller::default();

        controller.pointer_down(&board, Point::new(105.0, 105.0));
        assert!(controller.key_down(&mut board, EditorKey::Delete));
        assert!(!board.contains(doomed));
        assert!(board.contains(keep));
        assert_eq!(controller.focus(), None);
        assert_eq!(controller.gesture(), Gesture::Idle);
        assert!(!controller.key_down(&mut board, EditorKey::Delete));
    }

    #[test]
    fn double_click_edits_and_commits_empty_text() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::TextBox, SPAWN_POINT);
        let mut controller = Controller::default();

        assert!(controller.double_click(&board, Point::new(150.0, 110.0)));
        let edit = controller.text_edit().expect("editor open");
        assert_eq!(edit.buffer, "Text");
        assert!(edit.select_all_pending);
        assert!(controller.is_editing(id));

        // Keys belong to the inline input while it is open.
        assert!(!controller.key_down(&mut board, EditorKey::Delete));
        assert!(board.contains(id));

        controller.text_edit_mut().expect("editor open").buffer.clear();
        assert!(controller.finish_editing(&mut board));
        assert!(controller.text_edit().is_none());
        let content = board
            .get(id)
            .and_then(|a| a.editable())
            .map(|text| text.text().to_string());
        assert_eq!(content.as_deref(), Some(""));
    }

    #[test]
    fn double_click_ignores_non_text() {
        let mut board = Board::default();
        board.create(NewAnnotation::Line(LineStyle::Straight), SPAWN_POINT);
        let mut controller = Controller::default();
        assert!(!controller.double_click(&board, Point::new(150.0, 130.0)));
        assert!(controller.text_edit().is_none());
    }

    #[test]
    fn forget_missing_drops_stale_state() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::TextBox, SPAWN_POINT);
        let mut controller = Controller::default();
        controller.double_click(&board, Point::new(150.0, 110.0));
        board.delete(id);

        controller.forget_missing(&board);
        assert!(controller.focus().is_none());
        assert!(controller.text_edit().is_none());
        assert!(!controller.finish_editing(&mut board));
    }
}
