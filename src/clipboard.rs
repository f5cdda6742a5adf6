use std::borrow::Cow;

use arboard::{Clipboard, ImageData};
use image::DynamicImage;

use crate::error::EditorResult;

/// Places `image` on the system clipboard as raw RGBA.
pub fn write_image_to_clipboard(image: &DynamicImage) -> EditorResult<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_image(image_data(image))?;
    tracing::debug!(width = image.width(), height = image.height(), "copied image to clipboard");
    Ok(())
}

fn image_data(image: &DynamicImage) -> ImageData<'static> {
    let rgba = image.to_rgba8();
    ImageData {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        bytes: Cow::Owned(rgba.into_raw()),
    }
}
