use std::path::Path;
use std::sync::OnceLock;

use ab_glyph::FontArc;
use anyhow::{anyhow, Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::annotation::{
    Annotation, AnnotationBody, AnnotationId, Draggable, LineShape, Resizable,
};
use crate::board::Board;
use crate::error::{EditorError, EditorResult};
use crate::state::CANVAS_SIZE;
use crate::theme::{DIAGRAM, LINE_STROKE_WIDTH, NUMBER_FONT_SIZE, TEXT_BOX_FONT_SIZE};

/// Stretches `image` to exactly the canvas size.
pub fn fit_to_canvas(image: &DynamicImage) -> DynamicImage {
    let [width, height] = CANVAS_SIZE;
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Renders the canvas the way it is shown on screen: background, then every
/// annotation in creation order. A text box under edit keeps its box but
/// loses its handle, like the live view.
pub fn flatten(
    background: Option<&DynamicImage>,
    board: &Board,
    editing: Option<AnnotationId>,
) -> Result<DynamicImage> {
    let [width, height] = CANVAS_SIZE;
    let mut base = RgbaImage::from_pixel(width, height, Rgba(DIAGRAM.canvas_fill));
    if let Some(image) = background {
        imageops::overlay(&mut base, &fit_to_canvas(image).to_rgba8(), 0, 0);
    }

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| anyhow!("cannot allocate pixmap"))?;
    copy_image_to_pixmap(&base, &mut pixmap)?;

    for annotation in board.iter() {
        let show_handle = editing != Some(annotation.id);
        draw_annotation_shape(&mut pixmap, annotation, show_handle)?;

        // Captions go through imageproc, so flush the pixmap before the next
        // shape can paint over them.
        if let Some((caption, size)) = caption_of(annotation) {
            let mut output = pixmap_to_image(&pixmap)?;
            draw_centered_caption(&mut output, annotation, caption, size);
            copy_image_to_pixmap(&output, &mut pixmap)?;
        }
    }

    Ok(DynamicImage::ImageRgba8(pixmap_to_image(&pixmap)?))
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .context("cannot encode PNG")?;
    Ok(buffer.into_inner())
}

/// Writes `image` as PNG at `path`, creating or overwriting the file.
pub fn save_png(image: &DynamicImage, path: &Path) -> EditorResult<()> {
    let bytes = encode_png(image).map_err(|err| EditorError::export(path, err))?;
    std::fs::write(path, bytes)
        .with_context(|| format!("cannot write {}", path.display()))
        .map_err(|err| EditorError::export(path, err))
}

/// Composites the canvas and saves it in one step.
pub fn export_png(
    background: Option<&DynamicImage>,
    board: &Board,
    editing: Option<AnnotationId>,
    path: &Path,
) -> EditorResult<()> {
    let image = flatten(background, board, editing).map_err(|err| EditorError::export(path, err))?;
    save_png(&image, path)?;
    tracing::info!(path = %path.display(), annotations = board.len(), "exported canvas");
    Ok(())
}

fn copy_image_to_pixmap(image: &RgbaImage, pixmap: &mut Pixmap) -> Result<()> {
    let data = pixmap.data_mut();
    if data.len() != image.len() {
        return Err(anyhow!("source image and pixmap size mismatch"));
    }
    // Every pixel is opaque here, so straight and premultiplied RGBA agree.
    data.copy_from_slice(image.as_raw());
    Ok(())
}

fn pixmap_to_image(pixmap: &Pixmap) -> Result<RgbaImage> {
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
        .ok_or_else(|| anyhow!("cannot construct output image"))
}

fn solid_paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn draw_annotation_shape(
    pixmap: &mut Pixmap,
    annotation: &Annotation,
    show_handle: bool,
) -> Result<()> {
    match &annotation.body {
        AnnotationBody::Number(_) => {}
        AnnotationBody::Line(line) => stroke_line_shape(pixmap, annotation, line)?,
        AnnotationBody::TextBox(text_box) => {
            let bounds = annotation.bounds();
            let rect = Rect::from_xywh(
                bounds.min.x,
                bounds.min.y,
                bounds.width(),
                bounds.height(),
            )
            .ok_or_else(|| anyhow!("invalid text box bounds"))?;
            pixmap.fill_rect(rect, &solid_paint(DIAGRAM.text_box_fill), Transform::identity(), None);

            let inset = Rect::from_ltrb(
                rect.left() + 0.5,
                rect.top() + 0.5,
                rect.right() - 0.5,
                rect.bottom() - 0.5,
            )
            .ok_or_else(|| anyhow!("invalid text box border"))?;
            let border = PathBuilder::from_rect(inset);
            let stroke = Stroke {
                width: 1.0,
                ..Default::default()
            };
            pixmap.stroke_path(
                &border,
                &solid_paint(DIAGRAM.text_box_border),
                &stroke,
                Transform::identity(),
                None,
            );

            if show_handle {
                let handle = text_box.resize_handle(annotation.pos);
                let handle = Rect::from_xywh(
                    handle.min.x,
                    handle.min.y,
                    handle.width(),
                    handle.height(),
                )
                .ok_or_else(|| anyhow!("invalid resize handle"))?;
                pixmap.fill_rect(handle, &solid_paint(DIAGRAM.handle), Transform::identity(), None);
            }
        }
    }
    Ok(())
}

fn stroke_line_shape(pixmap: &mut Pixmap, annotation: &Annotation, line: &LineShape) -> Result<()> {
    let geometry = line.geometry(annotation.pos);
    let mut pb = PathBuilder::new();
    pb.move_to(geometry.start.x, geometry.start.y);
    match geometry.control {
        Some(control) => pb.quad_to(control.x, control.y, geometry.end.x, geometry.end.y),
        None => pb.line_to(geometry.end.x, geometry.end.y),
    }
    let path = pb.finish().ok_or_else(|| anyhow!("cannot build line path"))?;

    // A rotated stroke is cut off at the shape's own box.
    let bounds = annotation.bounds();
    let clip_rect = Rect::from_xywh(bounds.min.x, bounds.min.y, bounds.width(), bounds.height())
        .ok_or_else(|| anyhow!("invalid line bounds"))?;
    let mut clip = Mask::new(pixmap.width(), pixmap.height())
        .ok_or_else(|| anyhow!("cannot allocate clip mask"))?;
    clip.fill_path(
        &PathBuilder::from_rect(clip_rect),
        FillRule::Winding,
        false,
        Transform::identity(),
    );

    let stroke = Stroke {
        width: LINE_STROKE_WIDTH,
        ..Default::default()
    };
    let transform = Transform::from_rotate_at(
        geometry.rotation.degrees() as f32,
        geometry.center.x,
        geometry.center.y,
    );
    pixmap.stroke_path(&path, &solid_paint(DIAGRAM.line), &stroke, transform, Some(&clip));
    Ok(())
}

fn caption_of(annotation: &Annotation) -> Option<(&str, f32)> {
    match &annotation.body {
        AnnotationBody::Number(marker) => Some((marker.label.as_str(), NUMBER_FONT_SIZE)),
        AnnotationBody::TextBox(_) => annotation
            .editable()
            .map(|text| (text.text(), TEXT_BOX_FONT_SIZE)),
        AnnotationBody::Line(_) => None,
    }
}

/// Draws `caption` centred on the annotation, cut off at its bounds.
fn draw_centered_caption(image: &mut RgbaImage, annotation: &Annotation, caption: &str, size: f32) {
    if caption.is_empty() {
        return;
    }
    let Some(font) = caption_font() else {
        return;
    };

    let bounds = annotation.bounds();
    let left = bounds.min.x.max(0.0).round() as u32;
    let top = bounds.min.y.max(0.0).round() as u32;
    let right = (bounds.max.x.round().max(0.0) as u32).min(image.width());
    let bottom = (bounds.max.y.round().max(0.0) as u32).min(image.height());
    if right <= left || bottom <= top {
        return;
    }

    let (text_w, text_h) = text_size(size, font, caption);
    let center = bounds.center();
    let x = (center.x - text_w as f32 / 2.0).round() as i32 - left as i32;
    let y = (center.y - text_h as f32 / 2.0).round() as i32 - top as i32;
    let mut patch = imageops::crop_imm(&*image, left, top, right - left, bottom - top).to_image();
    draw_text_mut(&mut patch, Rgba(DIAGRAM.caption), x, y, size, font, caption);
    imageops::replace(image, &patch, i64::from(left), i64::from(top));
}

fn caption_font() -> Option<&'static FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(load_monospace_font).as_ref()
}

fn load_monospace_font() -> Option<FontArc> {
    let candidates = [
        "/System/Library/Fonts/Supplemental/Courier New Bold.ttf",
        "/System/Library/Fonts/Supplemental/Courier New.ttf",
        "C:\\Windows\\Fonts\\courbd.ttf",
        "C:\\Windows\\Fonts\\cour.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Bold.ttf",
        "/usr/share/fonts/liberation-mono/LiberationMono-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono-Bold.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono-Bold.ttf",
    ];

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontArc::try_from_vec(bytes) {
                tracing::debug!(path, "loaded caption font");
                return Some(font);
            }
        }
    }

    // egui ships Hack, a monospace face, so exports never lose their captions.
    let definitions = egui::FontDefinitions::default();
    let bundled = definitions.font_data.get("Hack")?;
    match FontArc::try_from_vec(bundled.font.to_vec()) {
        Ok(font) => Some(font),
        Err(err) => {
            tracing::warn!("no usable caption font: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{export_png, fit_to_canvas, flatten};
    use crate::annotation::{LineStyle, NewAnnotation, Point, SPAWN_POINT};
    use crate::board::Board;
    use crate::error::EditorError;
    use crate::state::CANVAS_SIZE;
    use crate::theme::DIAGRAM;

    fn pixel(image: &DynamicImage, x: u32, y: u32) -> [u8; 4] {
        image.to_rgba8().get_pixel(x, y).0
    }

    #[test]
    fn background_is_stretched_to_canvas() {
        let small = DynamicImage::ImageRgba8(RgbaImage::from_pixel(320, 200, Rgba([1, 2, 3, 255])));
        let fitted = fit_to_canvas(&small);
        assert_eq!((fitted.width(), fitted.height()), (CANVAS_SIZE[0], CANVAS_SIZE[1]));
    }

    #[test]
    fn empty_board_without_background_is_plain_fill() {
        let result = flatten(None, &Board::default(), None).expect("flatten should succeed");
        assert_eq!((result.width(), result.height()), (750, 400));
        assert_eq!(pixel(&result, 0, 0), DIAGRAM.canvas_fill);
        assert_eq!(pixel(&result, 749, 399), DIAGRAM.canvas_fill);
    }

    #[test]
    fn straight_line_is_horizontal_until_rotated() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::Line(LineStyle::Straight), SPAWN_POINT);

        // Box spans (100,100)..(210,170); the stroke runs along y = 135.
        let flat = flatten(None, &board, None).expect("flatten");
        assert_eq!(pixel(&flat, 155, 135), DIAGRAM.line);
        assert_eq!(pixel(&flat, 155, 100), DIAGRAM.canvas_fill);

        for _ in 0..6 {
            board.set_rotation(id);
        }
        let upright = flatten(None, &board, None).expect("flatten");
        assert_eq!(pixel(&upright, 155, 100), DIAGRAM.line);
        assert_eq!(pixel(&upright, 155, 169), DIAGRAM.line);
        assert_eq!(pixel(&upright, 120, 135), DIAGRAM.canvas_fill);
    }

    #[test]
    fn rotated_line_is_cut_off_at_its_box() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::Line(LineStyle::Straight), SPAWN_POINT);
        for _ in 0..6 {
            board.set_rotation(id);
        }

        // Upright, the 110px stroke would reach y = 80..190; the box stops at 100..170.
        let flat = flatten(None, &board, None).expect("flatten");
        for y in (80..99).chain(171..190) {
            assert_eq!(pixel(&flat, 155, y), DIAGRAM.canvas_fill, "y = {y}");
        }
    }

    #[test]
    fn long_caption_stays_inside_its_text_box() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::TextBox, SPAWN_POINT);
        board.set_text(id, "W".repeat(24));

        let flat = flatten(None, &board, None).expect("flatten").to_rgba8();
        // Box spans (100,100)..(220,130).
        for y in 100..130 {
            for x in (40..100).chain(221..300) {
                assert_eq!(flat.get_pixel(x, y).0, DIAGRAM.canvas_fill, "({x}, {y})");
            }
        }
        let inked = (102..218)
            .flat_map(|x| (104..126).map(move |y| (x, y)))
            .any(|(x, y)| flat.get_pixel(x, y).0 != DIAGRAM.text_box_fill);
        assert!(inked, "caption should be drawn inside the box");
    }

    #[test]
    fn text_box_is_white_with_handle() {
        let mut board = Board::default();
        let id = board.create(NewAnnotation::TextBox, SPAWN_POINT);
        board.set_text(id, "");

        let flat = flatten(None, &board, None).expect("flatten");
        assert_eq!(pixel(&flat, 105, 105), DIAGRAM.text_box_fill);
        assert_eq!(pixel(&flat, 216, 126), DIAGRAM.handle);

        let editing = flatten(None, &board, Some(id)).expect("flatten");
        assert_eq!(pixel(&editing, 216, 126), DIAGRAM.text_box_fill);
    }

    #[test]
    fn later_annotations_paint_over_earlier_ones() {
        let mut board = Board::default();
        board.create(NewAnnotation::Line(LineStyle::Straight), SPAWN_POINT);
        let id = board.create(NewAnnotation::TextBox, Point::new(140.0, 120.0));
        board.set_text(id, "");

        let flat = flatten(None, &board, None).expect("flatten");
        assert_eq!(pixel(&flat, 150, 135), DIAGRAM.text_box_fill);
    }

    #[test]
    fn export_writes_canvas_sized_png() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("diagram.png");
        let background =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 32, Rgba([255, 255, 255, 255])));
        let mut board = Board::default();
        board.create(NewAnnotation::Number(3), SPAWN_POINT);
        board.create(NewAnnotation::Line(LineStyle::Curved), Point::new(300.0, 200.0));

        export_png(Some(&background), &board, None, &path).expect("export");

        let written = image::open(&path).expect("decode export");
        assert_eq!((written.width(), written.height()), (750, 400));
        assert_eq!(pixel(&written, 700, 20), [255, 255, 255, 255]);
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent").join("diagram.png");
        let err = export_png(None, &Board::default(), None, &path).expect_err("no such directory");
        assert!(matches!(err, EditorError::ExportFailure { .. }));
    }
}
