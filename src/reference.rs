//! Pre-made umpire diagrams, looked up by event and umpire count.

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{EditorError, EditorResult};

pub const EVENTS: &[&str] = &[
    "50m",
    "60m",
    "60m H",
    "200m",
    "300m",
    "400m",
    "600m",
    "800m",
    "1000m",
    "1200m",
    "1500m",
    "2000m",
    "3000m",
    "4 x 100m Relay",
    "4 x 200m Relay",
    "4 x 400m Relay",
    "4 x 800m Relay",
];

pub const UMPIRE_COUNTS: std::ops::RangeInclusive<u8> = 5..=10;

pub const EVENT_PLACEHOLDER: &str = "Select an event";
pub const UMPIRE_PLACEHOLDER: &str = "Select number of umpires";

/// Shown on both tabs until a diagram is chosen.
pub const BLANK_TRACK_IMAGE: &str = "BlankOval.png";

pub fn reference_file_name(event: &str, umpires: &str) -> String {
    format!("{event}{umpires}.png")
}

/// Read-only view over the image resource directory.
#[derive(Clone, Debug)]
pub struct ImageLibrary {
    dir: PathBuf,
}

impl ImageLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self, file_name: &str) -> EditorResult<DynamicImage> {
        let path = self.dir.join(file_name);
        tracing::debug!(path = %path.display(), "loading image");
        if !path.is_file() {
            return Err(EditorError::ResourceNotFound { path });
        }
        image::open(&path).map_err(|source| EditorError::ResourceUnreadable { path, source })
    }
}

/// The two dropdowns of the View tab. `None` means the placeholder entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferenceSelection {
    pub event: Option<usize>,
    pub umpires: Option<u8>,
}

impl ReferenceSelection {
    pub fn event_label(&self) -> Option<&'static str> {
        self.event.and_then(|index| EVENTS.get(index).copied())
    }

    /// File to show for the current choice, once both dropdowns are set.
    pub fn file_name(&self) -> Option<String> {
        let event = self.event_label()?;
        let umpires = self.umpires.filter(|count| UMPIRE_COUNTS.contains(count))?;
        Some(reference_file_name(event, &umpires.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{reference_file_name, ImageLibrary, ReferenceSelection, EVENTS};
    use crate::error::EditorError;

    #[test]
    fn file_name_concatenates_event_and_count() {
        assert_eq!(reference_file_name("60m", "6"), "60m6.png");
        assert_eq!(
            reference_file_name("4 x 400m Relay", "10"),
            "4 x 400m Relay10.png"
        );
    }

    #[test]
    fn selection_requires_both_choices() {
        let mut selection = ReferenceSelection::default();
        assert_eq!(selection.file_name(), None);

        selection.event = EVENTS.iter().position(|event| *event == "60m H");
        assert_eq!(selection.file_name(), None);

        selection.umpires = Some(8);
        assert_eq!(selection.file_name().as_deref(), Some("60m H8.png"));

        selection.umpires = Some(11);
        assert_eq!(selection.file_name(), None);
    }

    #[test]
    fn missing_file_is_resource_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let library = ImageLibrary::new(dir.path());
        let err = library.load("60m6.png").expect_err("file is absent");
        assert!(matches!(err, EditorError::ResourceNotFound { ref path } if path.ends_with("60m6.png")));
    }

    #[test]
    fn undecodable_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("200m5.png"), b"not a png").expect("write fixture");
        let library = ImageLibrary::new(dir.path());
        let err = library.load("200m5.png").expect_err("garbage bytes");
        assert!(matches!(err, EditorError::ResourceUnreadable { .. }));
    }

    #[test]
    fn existing_file_decodes() {
        let dir = tempfile::tempdir().expect("tempdir");
        image::RgbaImage::from_pixel(4, 3, image::Rgba([0, 0, 255, 255]))
            .save(dir.path().join("800m7.png"))
            .expect("write fixture");
        let library = ImageLibrary::new(dir.path());
        let image = library.load("800m7.png").expect("decodes");
        assert_eq!((image.width(), image.height()), (4, 3));
    }
}
