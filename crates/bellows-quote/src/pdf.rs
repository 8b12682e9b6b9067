//! # PDF Surface
//!
//! [`DrawingSurface`] over `printpdf`: a single A4 page with the builtin
//! Helvetica faces.
//!
//! Layout coordinates run top-down; PDF user space runs bottom-up, so every
//! `y` is flipped against the page height here and nowhere else.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect,
};

use crate::document::{Align, Area, DrawingSurface, Paint, Rgb, TextStyle};
use crate::error::{QuoteError, QuoteResult};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;

const PT_PER_MM: f32 = 72.0 / 25.4;
const MM_PER_PT: f32 = 25.4 / 72.0;

/// Images are placed at this resolution and then scaled to their area.
const IMAGE_DPI: f32 = 300.0;

/// Mean Helvetica advance width as a fraction of the font size.
const REGULAR_ADVANCE_EM: f32 = 0.52;
const BOLD_ADVANCE_EM: f32 = 0.57;

pub struct PdfSurface {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfSurface {
    pub fn new(title: &str) -> QuoteResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Summary");
        let layer = doc.get_page(page).get_layer(layer);

        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        Ok(PdfSurface {
            doc,
            layer,
            regular,
            bold,
        })
    }

    /// Serializes the document.
    pub fn finish(self) -> QuoteResult<Vec<u8>> {
        Ok(self.doc.save_to_bytes()?)
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

/// Builtin fonts carry no metrics here, so alignment uses an average advance.
fn approximate_width_mm(text: &str, style: &TextStyle) -> f32 {
    let em = if style.bold {
        BOLD_ADVANCE_EM
    } else {
        REGULAR_ADVANCE_EM
    };
    text.chars().count() as f32 * style.size_pt * em * MM_PER_PT
}

fn aligned_x(text: &str, x: f32, style: &TextStyle) -> f32 {
    match style.align {
        Align::Left => x,
        Align::Center => x - approximate_width_mm(text, style) / 2.0,
        Align::Right => x - approximate_width_mm(text, style),
    }
}

impl DrawingSurface for PdfSurface {
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let font = if style.bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(color(style.color));
        self.layer.use_text(
            text,
            style.size_pt,
            Mm(aligned_x(text, x, style)),
            flip(y),
            font,
        );
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), rgb: Rgb, width: f32) {
        self.layer.set_outline_color(color(rgb));
        self.layer.set_outline_thickness(width * PT_PER_MM);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), flip(from.1)), false),
                (Point::new(Mm(to.0), flip(to.1)), false),
            ],
            is_closed: false,
        });
    }

    fn rect(&mut self, area: Area, paint: Paint) {
        let rect = Rect::new(
            Mm(area.x),
            flip(area.y + area.height),
            Mm(area.x + area.width),
            flip(area.y),
        );

        match paint {
            Paint::Fill(rgb) => {
                self.layer.set_fill_color(color(rgb));
                self.layer.add_rect(rect.with_mode(PaintMode::Fill));
            }
            Paint::Stroke { color: rgb, width } => {
                self.layer.set_outline_color(color(rgb));
                self.layer.set_outline_thickness(width * PT_PER_MM);
                self.layer.add_rect(rect.with_mode(PaintMode::Stroke));
            }
        }
    }

    fn image(&mut self, bytes: &[u8], area: Area) -> QuoteResult<()> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| QuoteError::asset("embedded image", e))?;
        // Alpha is dropped; the page underneath is white.
        let pixels = decoded.to_rgb8();
        let (width_px, height_px) = pixels.dimensions();
        if width_px == 0 || height_px == 0 {
            return Err(QuoteError::asset("embedded image", "empty image"));
        }

        let natural_width_mm = width_px as f32 / IMAGE_DPI * 25.4;
        let natural_height_mm = height_px as f32 / IMAGE_DPI * 25.4;
        let rgb = image::DynamicImage::ImageRgb8(pixels);

        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(area.x)),
                translate_y: Some(flip(area.y + area.height)),
                scale_x: Some(area.width / natural_width_mm),
                scale_y: Some(area.height / natural_height_mm),
                dpi: Some(IMAGE_DPI),
                ..Default::default()
            },
        );

        Ok(())
    }
}
