use egui::{ColorImage, Context as EguiContext, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;

use crate::annotation::{AnnotationId, NewAnnotation, SPAWN_POINT};
use crate::board::Board;
use crate::error::EditorError;
use crate::flatten;
use crate::interaction::Controller;
use crate::reference::{ImageLibrary, ReferenceSelection, BLANK_TRACK_IMAGE};
use crate::settings::UserSettings;

/// Pixel size of both the reference image area and the edit canvas.
pub const CANVAS_SIZE: [u32; 2] = [750, 400];

pub fn canvas_size_vec2() -> Vec2 {
    Vec2::new(CANVAS_SIZE[0] as f32, CANVAS_SIZE[1] as f32)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Help,
    View,
    Edit,
}

/// A decoded image stretched to the canvas, with its GPU texture created on
/// first paint.
pub struct EditorImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
    texture_name: &'static str,
}

impl EditorImage {
    pub fn new(source: DynamicImage, texture_name: &'static str) -> Self {
        Self {
            dynamic: flatten::fit_to_canvas(&source),
            texture: None,
            texture_name,
        }
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture(self.texture_name, color, TextureOptions::LINEAR);
        self.texture = Some(texture);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

#[derive(Default)]
pub struct ReferenceView {
    pub selection: ReferenceSelection,
    pub image: Option<EditorImage>,
}

pub struct EditorState {
    pub tab: Tab,
    pub board: Board,
    pub controller: Controller,
    pub background: Option<EditorImage>,
    pub reference: ReferenceView,
    pub library: ImageLibrary,
    pub settings: UserSettings,
    pub status: Option<StatusMessage>,
}

impl EditorState {
    pub fn new(settings: UserSettings) -> Self {
        let library = ImageLibrary::new(settings.resolve_image_dir());
        tracing::info!(dir = %library.dir().display(), "using image directory");
        Self::with_library(library, settings)
    }

    pub fn with_library(library: ImageLibrary, settings: UserSettings) -> Self {
        let mut state = Self {
            tab: Tab::default(),
            board: Board::default(),
            controller: Controller::default(),
            background: None,
            reference: ReferenceView::default(),
            library,
            settings,
            status: None,
        };

        match state.library.load(BLANK_TRACK_IMAGE) {
            Ok(blank) => {
                state.reference.image = Some(EditorImage::new(blank.clone(), "reference"));
                state.background = Some(EditorImage::new(blank, "edit_background"));
            }
            Err(err) => tracing::warn!("{err}; falling back to a plain canvas"),
        }
        state
    }

    pub fn add_annotation(&mut self, kind: NewAnnotation) -> AnnotationId {
        self.board.create(kind, SPAWN_POINT)
    }

    pub fn select_event(&mut self, event: Option<usize>) {
        if self.reference.selection.event == event {
            return;
        }
        self.reference.selection.event = event;
        self.refresh_reference();
    }

    pub fn select_umpires(&mut self, umpires: Option<u8>) {
        if self.reference.selection.umpires == umpires {
            return;
        }
        self.reference.selection.umpires = umpires;
        self.refresh_reference();
    }

    /// Loads the diagram for the current dropdown choice. A failed lookup
    /// leaves the displayed image untouched.
    fn refresh_reference(&mut self) {
        let Some(file_name) = self.reference.selection.file_name() else {
            return;
        };
        match self.library.load(&file_name) {
            Ok(image) => {
                self.reference.image = Some(EditorImage::new(image, "reference"));
                self.notify(format!("Showing {file_name}"));
            }
            Err(err) => self.report(&err),
        }
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::info!("{text}");
        self.status = Some(StatusMessage {
            text,
            is_error: false,
        });
    }

    pub fn report(&mut self, err: &EditorError) {
        tracing::warn!("{err}");
        self.status = Some(StatusMessage {
            text: err.to_string(),
            is_error: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{EditorState, CANVAS_SIZE};
    use crate::annotation::{NewAnnotation, Point, SPAWN_POINT};
    use crate::reference::{ImageLibrary, EVENTS};
    use crate::settings::UserSettings;

    fn write_png(dir: &std::path::Path, name: &str, color: [u8; 4]) {
        RgbaImage::from_pixel(20, 10, Rgba(color))
            .save(dir.join(name))
            .expect("write fixture");
    }

    fn event_index(label: &str) -> Option<usize> {
        EVENTS.iter().position(|event| *event == label)
    }

    #[test]
    fn blank_background_is_optional() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());
        assert!(state.background.is_none());
        assert!(state.reference.image.is_none());
    }

    #[test]
    fn blank_background_is_stretched_to_canvas() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "BlankOval.png", [255, 255, 255, 255]);
        let state = EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());
        let background = state.background.as_ref().expect("background loaded");
        assert_eq!(
            (background.dynamic.width(), background.dynamic.height()),
            (CANVAS_SIZE[0], CANVAS_SIZE[1])
        );
    }

    #[test]
    fn missing_reference_keeps_current_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "BlankOval.png", [10, 20, 30, 255]);
        let mut state =
            EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());

        state.select_event(event_index("60m"));
        assert!(state.status.is_none());
        state.select_umpires(Some(6));

        let status = state.status.as_ref().expect("diagnostic recorded");
        assert!(status.is_error);
        assert!(status.text.contains("60m6.png"));
        let shown = state.reference.image.as_ref().expect("blank still shown");
        assert_eq!(shown.dynamic.to_rgba8().get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn present_reference_replaces_image() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_png(dir.path(), "400m9.png", [0, 0, 255, 255]);
        let mut state =
            EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());

        state.select_umpires(Some(9));
        state.select_event(event_index("400m"));

        let shown = state.reference.image.as_ref().expect("reference loaded");
        assert_eq!(shown.dynamic.to_rgba8().get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(state.status.as_ref().map(|s| s.is_error), Some(false));
    }

    #[test]
    fn toolbar_actions_spawn_at_fixed_point() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut state =
            EditorState::with_library(ImageLibrary::new(dir.path()), UserSettings::default());
        let id = state.add_annotation(NewAnnotation::Number(12));
        assert_eq!(state.board.get(id).map(|a| a.pos), Some(SPAWN_POINT));

        assert!(state.controller.pointer_down(&state.board, Point::new(110.0, 110.0)));
        assert_eq!(state.controller.focus(), Some(id));
    }
}
