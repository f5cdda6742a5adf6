//! The ordered collection of annotations placed on the edit canvas.
//!
//! Creation order is render order: the first annotation is painted first
//! and the last one wins hit-tests.

use crate::annotation::{
    Annotation, AnnotationId, Draggable, NewAnnotation, Point, Rotation, Size,
};

#[derive(Clone, Debug)]
pub struct Board {
    annotations: Vec<Annotation>,
    next_id: AnnotationId,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            annotations: Vec::new(),
            next_id: 1,
        }
    }
}

impl Board {
    pub fn create(&mut self, kind: NewAnnotation, pos: Point) -> AnnotationId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        self.annotations.push(Annotation::new(id, kind, pos));
        tracing::debug!(id, ?kind, x = pos.x, y = pos.y, "annotation created");
        id
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|annotation| annotation.id == id)
    }

    pub fn get_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations
            .iter_mut()
            .find(|annotation| annotation.id == id)
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn set_position(&mut self, id: AnnotationId, pos: Point) -> bool {
        let Some(annotation) = self.get_mut(id) else {
            return false;
        };
        annotation.set_position(pos);
        true
    }

    /// Advances a line's rotation by one step. `None` for unknown ids and for
    /// annotations that do not rotate.
    pub fn set_rotation(&mut self, id: AnnotationId) -> Option<Rotation> {
        let rotation = self.get_mut(id)?.rotatable_mut()?.rotate_step();
        tracing::debug!(id, degrees = rotation.degrees(), "annotation rotated");
        Some(rotation)
    }

    /// Resizes a text box, returning the clamped size that was applied.
    pub fn set_size(&mut self, id: AnnotationId, size: Size) -> Option<Size> {
        Some(self.get_mut(id)?.resizable_mut()?.resize_to(size))
    }

    pub fn set_text(&mut self, id: AnnotationId, content: impl Into<String>) -> bool {
        let Some(editable) = self.get_mut(id).and_then(|a| a.editable_mut()) else {
            return false;
        };
        editable.set_text(content.into());
        true
    }

    pub fn delete(&mut self, id: AnnotationId) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|annotation| annotation.id != id);
        let removed = self.annotations.len() != before;
        if removed {
            tracing::debug!(id, "annotation deleted");
        }
        removed
    }

    /// Topmost annotation under `point`.
    pub fn pick(&self, point: Point) -> Option<&Annotation> {
        self.annotations
            .iter()
            .rev()
            .find(|annotation| annotation.contains(point))
    }
}
