use egui::{Pos2, Rect, Vec2};

pub type AnnotationId = u64;

/// Where every new annotation appears on the edit canvas.
pub const SPAWN_POINT: Point = Point { x: 100.0, y: 100.0 };

pub const NUMBER_MARKER_SIZE: Size = Size { w: 35.0, h: 30.0 };
pub const LINE_SIZE: Size = Size { w: 110.0, h: 70.0 };
pub const TEXT_BOX_DEFAULT_SIZE: Size = Size { w: 120.0, h: 30.0 };
pub const TEXT_BOX_MIN_SIZE: Size = Size { w: 80.0, h: 30.0 };
pub const RESIZE_HANDLE_SIDE: f32 = 8.0;
pub const TEXT_BOX_PLACEHOLDER: &str = "Text";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pos2(self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn from_pos2(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }

    /// Vector pointing from `self` to `other`.
    pub fn delta(self, other: Point) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }

    pub fn offset(self, by: Vec2) -> Point {
        Point::new(self.x + by.x, self.y + by.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn at_least(self, floor: Size) -> Size {
        Size::new(self.w.max(floor.w), self.h.max(floor.h))
    }
}

/// Line orientation in degrees, always a multiple of [`Rotation::STEP`]
/// in `0..360`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rotation(u16);

impl Rotation {
    pub const ZERO: Self = Self(0);
    pub const STEP: u16 = 15;

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn advanced(self) -> Self {
        Self((self.0 + Self::STEP) % 360)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Straight,
    Curved,
}

/// What a toolbar action asks the board to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewAnnotation {
    Number(u8),
    Line(LineStyle),
    TextBox,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NumberMarker {
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineShape {
    pub style: LineStyle,
    rotation: Rotation,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextBox {
    content: String,
    size: Size,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationBody {
    Number(NumberMarker),
    Line(LineShape),
    TextBox(TextBox),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub id: AnnotationId,
    pub pos: Point,
    pub body: AnnotationBody,
}

/// Shared by every annotation: the controller moves anything it can grab.
pub trait Draggable {
    fn position(&self) -> Point;
    fn set_position(&mut self, pos: Point);
    fn size(&self) -> Size;

    fn bounds(&self) -> Rect {
        Rect::from_min_size(self.position().to_pos2(), self.size().to_vec2())
    }

    fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point.to_pos2())
    }
}

pub trait Rotatable {
    fn rotation(&self) -> Rotation;
    /// Advances by one step and returns the new orientation.
    fn rotate_step(&mut self) -> Rotation;
}

pub trait Resizable {
    fn min_size(&self) -> Size;
    fn current_size(&self) -> Size;
    /// Applies `requested` clamped to [`Resizable::min_size`] and returns the
    /// size actually set.
    fn resize_to(&mut self, requested: Size) -> Size;

    /// Grab region anchored at the bottom-right corner of the shape placed
    /// at `origin`.
    fn resize_handle(&self, origin: Point) -> Rect {
        let size = self.current_size();
        let max = Pos2::new(origin.x + size.w, origin.y + size.h);
        Rect::from_min_max(max - Vec2::splat(RESIZE_HANDLE_SIDE), max)
    }
}

pub trait Editable {
    fn text(&self) -> &str;
    fn set_text(&mut self, content: String);
}

impl LineShape {
    pub fn new(style: LineStyle) -> Self {
        Self {
            style,
            rotation: Rotation::ZERO,
        }
    }

    /// Unrotated stroke geometry for a shape whose top-left is `origin`.
    pub fn geometry(&self, origin: Point) -> LineGeometry {
        let mid_y = origin.y + LINE_SIZE.h / 2.0;
        let start = Point::new(origin.x, mid_y);
        let end = Point::new(origin.x + LINE_SIZE.w, mid_y);
        let control = match self.style {
            LineStyle::Straight => None,
            LineStyle::Curved => Some(Point::new(
                origin.x + LINE_SIZE.w / 2.0,
                origin.y + LINE_SIZE.h,
            )),
        };
        LineGeometry {
            start,
            control,
            end,
            center: Point::new(origin.x + LINE_SIZE.w / 2.0, mid_y),
            rotation: self.rotation,
        }
    }
}

impl Rotatable for LineShape {
    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn rotate_step(&mut self) -> Rotation {
        self.rotation = self.rotation.advanced();
        self.rotation
    }
}

impl TextBox {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            size: TEXT_BOX_DEFAULT_SIZE,
        }
    }
}

impl Resizable for TextBox {
    fn min_size(&self) -> Size {
        TEXT_BOX_MIN_SIZE
    }

    fn current_size(&self) -> Size {
        self.size
    }

    fn resize_to(&mut self, requested: Size) -> Size {
        self.size = requested.at_least(self.min_size());
        self.size
    }
}

impl Editable for TextBox {
    fn text(&self) -> &str {
        &self.content
    }

    fn set_text(&mut self, content: String) {
        self.content = content;
    }
}

/// Endpoints of a line or curve before its rotation is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineGeometry {
    pub start: Point,
    pub control: Option<Point>,
    pub end: Point,
    pub center: Point,
    pub rotation: Rotation,
}

impl LineGeometry {
    /// `(start, control, end)` with the rotation about `center` applied.
    pub fn rotated(&self) -> (Point, Option<Point>, Point) {
        let degrees = self.rotation.degrees() as f32;
        let rotate = |point: Point| rotate_about(point, self.center, degrees);
        (
            rotate(self.start),
            self.control.map(rotate),
            rotate(self.end),
        )
    }
}

/// Rotates `point` about `center` in a y-down frame, so positive angles
/// turn clockwise on screen.
pub fn rotate_about(point: Point, center: Point, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

impl Annotation {
    pub fn new(id: AnnotationId, kind: NewAnnotation, pos: Point) -> Self {
        let body = match kind {
            NewAnnotation::Number(number) => AnnotationBody::Number(NumberMarker {
                label: number.to_string(),
            }),
            NewAnnotation::Line(style) => AnnotationBody::Line(LineShape::new(style)),
            NewAnnotation::TextBox => AnnotationBody::TextBox(TextBox::new(TEXT_BOX_PLACEHOLDER)),
        };
        Self { id, pos, body }
    }

    pub fn rotatable(&self) -> Option<&dyn Rotatable> {
        match &self.body {
            AnnotationBody::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn rotatable_mut(&mut self) -> Option<&mut dyn Rotatable> {
        match &mut self.body {
            AnnotationBody::Line(line) => Some(line),
            _ => None,
        }
    }

    pub fn resizable(&self) -> Option<&dyn Resizable> {
        match &self.body {
            AnnotationBody::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }

    pub fn resizable_mut(&mut self) -> Option<&mut dyn Resizable> {
        match &mut self.body {
            AnnotationBody::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }

    pub fn editable(&self) -> Option<&dyn Editable> {
        match &self.body {
            AnnotationBody::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }

    pub fn editable_mut(&mut self) -> Option<&mut dyn Editable> {
        match &mut self.body {
            AnnotationBody::TextBox(text_box) => Some(text_box),
            _ => None,
        }
    }

    /// True when `point` lands on this annotation's resize handle.
    pub fn handle_contains(&self, point: Point) -> bool {
        self.resizable()
            .is_some_and(|shape| shape.resize_handle(self.pos).contains(point.to_pos2()))
    }
}

impl Draggable for Annotation {
    fn position(&self) -> Point {
        self.pos
    }

    fn set_position(&mut self, pos: Point) {
        self.pos = pos;
    }

    fn size(&self) -> Size {
        match &self.body {
            AnnotationBody::Number(_) => NUMBER_MARKER_SIZE,
            AnnotationBody::Line(_) => LINE_SIZE,
            AnnotationBody::TextBox(text_box) => text_box.current_size(),
        }
    }
}
