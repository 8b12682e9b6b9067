//! # Document Renderer
//!
//! Lays out the one-page quotation summary on any [`DrawingSurface`].
//!
//! ## Page Layout (A4, millimetres, top-left origin)
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐  y
//! │ [logo | "Bellows Systems"]          QUOTATION REQUEST SUMMARY │  10-18
//! │ ──────────────────────────────────────────────────────────── │  25 (red)
//! │ ┌ CUSTOMER CONTACT DETAILS ────────────────────────────────┐ │  35
//! │ │ name / company, e-mail / phone, address                  │ │
//! │ └──────────────────────────────────────────────────────────┘ │
//! │ ┌ BELLOWS CONFIGURATION ───────────────────────────────────┐ │  85
//! │ │ part, diameter, length, ends, application, plys  [image] │ │
//! │ └──────────────────────────────────────────────────────────┘ │
//! │ ┌ ENGINEERING DESIGN SPECIFICATIONS ───────────────────────┐ │  160
//! │ │ pressure / axial, temp / axial rate, cycles / lateral,   │ │
//! │ │ material / lateral rate, angular rows when enabled       │ │
//! │ └──────────────────────────────────────────────────────────┘ │
//! │ ──────────────────────────────────────────────────────────── │  275
//! │                    footer notice lines                        │  282, 286
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Asset Failures
//! The logo and the product image load one after the other and fail
//! independently: a missing logo becomes a text heading, a missing product
//! image leaves its frame empty. Neither aborts the document.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assets::AssetLoader;
use crate::error::{QuoteError, QuoteResult};
use crate::pdf::PdfSurface;
use bellows_core::quote::MovementDisplay;
use bellows_core::{ConfigurationDisplay, DOCUMENT_PREFIX};

const NOT_AVAILABLE: &str = "N/A";
const DEFAULT_APPLICATION: &str = "Standard Industrial";

// =============================================================================
// Drawing Surface
// =============================================================================

/// An RGB colour, 0-255 per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn gray(level: u8) -> Self {
        Rgb(level, level, level)
    }
}

const BRAND_RED: Rgb = Rgb(200, 10, 55);
const DARK_TEXT: Rgb = Rgb(65, 64, 66);
const WHITE: Rgb = Rgb::gray(255);

/// Horizontal anchor of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    const fn new(size_pt: f32, bold: bool, color: Rgb) -> Self {
        TextStyle {
            size_pt,
            bold,
            color,
            align: Align::Left,
        }
    }

    const fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// A rectangle in millimetres, measured from the top-left page corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Area {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Rgb),
    /// Outline with a line width in millimetres.
    Stroke { color: Rgb, width: f32 },
}

/// The drawing primitives the layout needs.
///
/// Coordinates are millimetres from the top-left corner of an A4 page; text
/// `y` is the baseline.
pub trait DrawingSurface {
    fn text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);

    /// A straight line; `width` in millimetres.
    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32);

    fn rect(&mut self, area: Area, paint: Paint);

    /// Decodes and places an encoded image, stretched to `area`.
    fn image(&mut self, bytes: &[u8], area: Area) -> QuoteResult<()>;
}

// =============================================================================
// Assets
// =============================================================================

/// State of the product photo slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductImage {
    /// The part has no image; no frame is drawn.
    None,
    /// The part has an image but it could not be loaded; the frame stays empty.
    Unavailable,
    Loaded(Vec<u8>),
}

/// Encoded images handed to the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentAssets {
    pub logo: Option<Vec<u8>>,
    pub product: ProductImage,
}

impl Default for DocumentAssets {
    fn default() -> Self {
        DocumentAssets {
            logo: None,
            product: ProductImage::None,
        }
    }
}

// =============================================================================
// Layout
// =============================================================================

const LABEL: TextStyle = TextStyle::new(9.0, true, DARK_TEXT);
const VALUE: TextStyle = TextStyle::new(9.0, false, DARK_TEXT);
const SECTION_TITLE: TextStyle = TextStyle::new(10.0, true, BRAND_RED);
const FOOTER: TextStyle = TextStyle::new(7.0, false, Rgb::gray(180)).aligned(Align::Center);

const LOGO_AREA: Area = Area::new(15.0, 10.0, 45.0, 10.0);

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn labelled<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    (label, value): (&str, &str),
    (label_x, value_x): (f32, f32),
    y: f32,
) {
    surface.text(label, label_x, y, &LABEL);
    surface.text(value, value_x, y, &VALUE);
}

fn section<S: DrawingSurface + ?Sized>(surface: &mut S, y: f32, height: f32, title: &str) {
    surface.rect(
        Area::new(15.0, y, 180.0, height),
        Paint::Stroke {
            color: Rgb::gray(200),
            width: 0.1,
        },
    );
    surface.rect(
        Area::new(15.1, y + 0.1, 179.8, 8.0),
        Paint::Fill(Rgb::gray(250)),
    );
    surface.text(title, 20.0, y + 6.0, &SECTION_TITLE);
}

fn contact_address(display: &ConfigurationDisplay) -> String {
    let c = &display.contact;
    if [&c.address, &c.city, &c.postal_code, &c.country]
        .iter()
        .all(|part| part.trim().is_empty())
    {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}, {} {}, {}", c.address, c.city, c.postal_code, c.country)
        .trim()
        .to_string()
}

/// Draws the full summary page.
pub fn draw_summary<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    display: &ConfigurationDisplay,
    assets: &DocumentAssets,
) {
    // Header
    let logo_drawn = match &assets.logo {
        Some(bytes) => match surface.image(bytes, LOGO_AREA) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Logo could not be embedded, using text heading");
                false
            }
        },
        None => false,
    };
    if !logo_drawn {
        surface.text(
            "Bellows Systems",
            15.0,
            18.0,
            &TextStyle::new(22.0, true, Rgb::gray(40)),
        );
    }
    surface.text(
        "QUOTATION REQUEST SUMMARY",
        195.0,
        18.0,
        &TextStyle::new(9.0, true, Rgb::gray(150)).aligned(Align::Right),
    );
    surface.line((15.0, 25.0), (195.0, 25.0), BRAND_RED, 0.5);

    // Customer contact
    let mut y = 35.0;
    section(surface, y, 38.0, "CUSTOMER CONTACT DETAILS");
    y += 15.0;

    let contact = &display.contact;
    let address = contact_address(display);
    labelled(surface, ("Contact Name:", or_placeholder(&contact.name, NOT_AVAILABLE)), (20.0, 55.0), y);
    labelled(surface, ("Company:", or_placeholder(&contact.company, NOT_AVAILABLE)), (105.0, 135.0), y);
    labelled(surface, ("Email Address:", or_placeholder(&contact.email, NOT_AVAILABLE)), (20.0, 55.0), y + 8.0);
    labelled(surface, ("Phone Number:", or_placeholder(&contact.phone, NOT_AVAILABLE)), (105.0, 135.0), y + 8.0);
    labelled(surface, ("Address:", address.as_str()), (20.0, 55.0), y + 16.0);

    y += 35.0;

    // Configuration
    section(surface, y, 65.0, "BELLOWS CONFIGURATION");
    let config_y = y;
    y += 15.0;

    let configuration = [
        ("Part Number:", display.part_number.as_deref().unwrap_or(NOT_AVAILABLE)),
        ("Nominal Diameter:", display.nominal_diameter.as_str()),
        ("Overall Length:", display.overall_length.as_str()),
        ("End Configuration:", display.end_configuration.as_str()),
        ("Application Type:", or_placeholder(&display.application, DEFAULT_APPLICATION)),
        ("No. of Plys:", or_placeholder(&display.plys, NOT_AVAILABLE)),
    ];
    for (row, pair) in configuration.into_iter().enumerate() {
        labelled(surface, pair, (20.0, 55.0), y + row as f32 * 8.0);
    }

    if assets.product != ProductImage::None {
        let frame = Area::new(125.0, config_y + 12.0, 60.0, 45.0);
        surface.rect(frame, Paint::Fill(WHITE));
        surface.rect(
            frame,
            Paint::Stroke {
                color: Rgb::gray(240),
                width: 0.1,
            },
        );
        if let ProductImage::Loaded(bytes) = &assets.product {
            let photo = Area::new(127.5, config_y + 14.5, 55.0, 40.0);
            if let Err(e) = surface.image(bytes, photo) {
                warn!(error = %e, "Product image could not be embedded");
            }
        }
    }

    y += 60.0;

    // Engineering specifications
    section(surface, y, 60.0, "ENGINEERING DESIGN SPECIFICATIONS");
    y += 15.0;

    let movement = |m: &Option<MovementDisplay>| -> String {
        m.as_ref().map_or(NOT_AVAILABLE.to_string(), |m| m.movement.clone())
    };
    let rate = |m: &Option<MovementDisplay>| -> String {
        m.as_ref().map_or(NOT_AVAILABLE.to_string(), |m| m.rate.clone())
    };

    let rows = [
        [("Design Pressure:", display.pressure.clone()), ("Axial Movement:", movement(&display.axial))],
        [("Design Temp:", display.temperature.clone()), ("Axial Spring Rate:", rate(&display.axial))],
        [("Cycle Life:", display.cycles.clone()), ("Lateral Movement:", movement(&display.lateral))],
        [("Bellows Material:", display.material.clone()), ("Lateral Spring Rate:", rate(&display.lateral))],
    ];
    for (row, [(left_label, left), (right_label, right)]) in rows.into_iter().enumerate() {
        let row_y = y + row as f32 * 8.0;
        labelled(surface, (left_label, left.as_str()), (20.0, 55.0), row_y);
        labelled(surface, (right_label, right.as_str()), (105.0, 150.0), row_y);
    }

    if let Some(angular) = &display.angular {
        labelled(surface, ("Angular Movement:", angular.movement.as_str()), (105.0, 150.0), y + 32.0);
        labelled(surface, ("Angular Spring Rate:", angular.rate.as_str()), (105.0, 150.0), y + 40.0);
    }

    // Footer
    surface.line((15.0, 275.0), (195.0, 275.0), Rgb::gray(230), 0.5);
    surface.text(
        "© 2024 Bellows Systems, Inc. | Professional Configuration Summary",
        105.0,
        282.0,
        &FOOTER,
    );
    surface.text(
        "All designs and data are subject to final engineering verification by BSI.",
        105.0,
        286.0,
        &FOOTER,
    );
}

// =============================================================================
// Renderer
// =============================================================================

/// `BSI_Quotation_<part-number>.pdf`.
pub fn document_file_name(part_number: &str) -> String {
    format!("{}_{}.pdf", DOCUMENT_PREFIX, part_number)
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    /// Writes the document into `dir`, creating it if needed.
    pub async fn save_to(&self, dir: &Path) -> QuoteResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;

        info!(path = %path.display(), "Quotation document saved");
        Ok(path)
    }
}

/// Loads images and renders the summary to PDF.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    assets: AssetLoader,
    logo_url: Option<String>,
}

impl DocumentRenderer {
    pub fn new(assets: AssetLoader, logo_url: Option<String>) -> Self {
        DocumentRenderer { assets, logo_url }
    }

    /// Loads the logo, then the product image. Failures become fallbacks.
    pub async fn load_assets(&self, product_image_url: Option<&str>) -> DocumentAssets {
        let logo = match self.logo_url.as_deref() {
            Some(url) => match self.assets.load(url).await {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    warn!(error = %e, "Logo unavailable, using text heading");
                    None
                }
            },
            None => None,
        };

        let product = match product_image_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => match self.assets.load(url).await {
                Ok(bytes) => ProductImage::Loaded(bytes),
                Err(e) => {
                    warn!(error = %e, "Product image unavailable, leaving frame empty");
                    ProductImage::Unavailable
                }
            },
            None => ProductImage::None,
        };

        DocumentAssets { logo, product }
    }

    /// Renders the summary for the selected part.
    ///
    /// ## Returns
    /// * `Err(QuoteError::NoPartSelected)` - nothing to name the document after
    pub async fn render(
        &self,
        display: &ConfigurationDisplay,
        product_image_url: Option<&str>,
    ) -> QuoteResult<RenderedDocument> {
        let part_number = display
            .part_number
            .clone()
            .ok_or(QuoteError::NoPartSelected)?;

        let assets = self.load_assets(product_image_url).await;

        debug!(part_number = %part_number, "Rendering quotation document");

        let mut surface = PdfSurface::new(&format!("Quotation {}", part_number))?;
        draw_summary(&mut surface, display, &assets);
        let bytes = surface.finish()?;

        Ok(RenderedDocument {
            file_name: document_file_name(&part_number),
            bytes,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use bellows_core::{CatalogOptions, Configuration, ContactDetails};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Text(String, f32, f32),
        Line,
        Rect(Area, Paint),
        Image(Area),
    }

    /// Records every call; images whose bytes are `b"bad"` fail to embed.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
    }

    impl Recorder {
        fn has_text(&self, needle: &str) -> bool {
            self.text_at(needle).is_some()
        }

        fn text_at(&self, needle: &str) -> Option<(f32, f32)> {
            self.ops.iter().find_map(|op| match op {
                Op::Text(t, x, y) if t == needle => Some((*x, *y)),
                _ => None,
            })
        }

        fn images(&self) -> Vec<Area> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Image(area) => Some(*area),
                    _ => None,
                })
                .collect()
        }
    }

    impl DrawingSurface for Recorder {
        fn text(&mut self, text: &str, x: f32, y: f32, _style: &TextStyle) {
            self.ops.push(Op::Text(text.to_string(), x, y));
        }

        fn line(&mut self, _from: (f32, f32), _to: (f32, f32), _color: Rgb, _width: f32) {
            self.ops.push(Op::Line);
        }

        fn rect(&mut self, area: Area, paint: Paint) {
            self.ops.push(Op::Rect(area, paint));
        }

        fn image(&mut self, bytes: &[u8], area: Area) -> QuoteResult<()> {
            if bytes == b"bad" {
                return Err(QuoteError::asset("test", "undecodable"));
            }
            self.ops.push(Op::Image(area));
            Ok(())
        }
    }

    fn display() -> ConfigurationDisplay {
        let mut config = Configuration::new(&CatalogOptions::default());
        config.selected_part = Some("104-020-0001".to_string());
        config.query.diameter = "4.00".to_string();
        config.query.length = "20.00".to_string();
        config.pressure = "150".to_string();
        config.temperature = "200".to_string();
        config.contact = ContactDetails {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..ContactDetails::default()
        };
        ConfigurationDisplay::from_configuration(&config)
    }

    #[test]
    fn test_text_heading_when_logo_missing_or_broken() {
        for logo in [None, Some(b"bad".to_vec())] {
            let mut surface = Recorder::default();
            let assets = DocumentAssets {
                logo,
                product: ProductImage::None,
            };
            draw_summary(&mut surface, &display(), &assets);
            assert_eq!(surface.text_at("Bellows Systems"), Some((15.0, 18.0)));
            assert!(surface.images().is_empty());
        }
    }

    #[test]
    fn test_logo_replaces_text_heading() {
        let mut surface = Recorder::default();
        let assets = DocumentAssets {
            logo: Some(b"png".to_vec()),
            product: ProductImage::None,
        };
        draw_summary(&mut surface, &display(), &assets);
        assert!(!surface.has_text("Bellows Systems"));
        assert_eq!(surface.images(), vec![LOGO_AREA]);
    }

    #[test]
    fn test_product_frame_survives_failed_image() {
        let frame = Area::new(125.0, 97.0, 60.0, 45.0);

        let mut surface = Recorder::default();
        let assets = DocumentAssets {
            logo: None,
            product: ProductImage::Unavailable,
        };
        draw_summary(&mut surface, &display(), &assets);
        assert!(surface.ops.contains(&Op::Rect(frame, Paint::Fill(WHITE))));
        assert!(surface.images().is_empty());
        assert!(surface.has_text("ENGINEERING DESIGN SPECIFICATIONS"));

        let mut surface = Recorder::default();
        let assets = DocumentAssets {
            logo: None,
            product: ProductImage::Loaded(b"png".to_vec()),
        };
        draw_summary(&mut surface, &display(), &assets);
        assert_eq!(surface.images(), vec![Area::new(127.5, 99.5, 55.0, 40.0)]);
    }

    #[test]
    fn test_placeholders_and_disabled_axes() {
        let mut surface = Recorder::default();
        draw_summary(&mut surface, &display(), &DocumentAssets::default());

        // Company, phone and address are blank.
        let placeholders = surface
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Text(t, ..) if t == NOT_AVAILABLE))
            .count();
        // company, phone, address, plys, 4 movement/rate cells
        assert_eq!(placeholders, 8);
        assert!(surface.has_text(DEFAULT_APPLICATION));
        assert!(surface.has_text("4.00 IN"));
        assert!(surface.has_text("150 PSIG"));
        assert!(!surface.has_text("Angular Movement:"));
    }

    #[test]
    fn test_angular_rows_only_when_enabled() {
        let mut display = display();
        display.angular = Some(MovementDisplay {
            movement: "5 Deg".to_string(),
            rate: "12 FT. LBS/DEG".to_string(),
        });

        let mut surface = Recorder::default();
        draw_summary(&mut surface, &display, &DocumentAssets::default());
        assert_eq!(surface.text_at("Angular Movement:"), Some((105.0, 207.0)));
        assert_eq!(surface.text_at("5 Deg"), Some((150.0, 207.0)));
        assert_eq!(surface.text_at("12 FT. LBS/DEG"), Some((150.0, 215.0)));
    }

    #[test]
    fn test_address_formatting() {
        let mut display = display();
        assert_eq!(contact_address(&display), NOT_AVAILABLE);

        display.contact.address = "1 Main St".to_string();
        display.contact.city = "Springfield".to_string();
        display.contact.postal_code = "12345".to_string();
        display.contact.country = "USA".to_string();
        assert_eq!(contact_address(&display), "1 Main St, Springfield 12345, USA");
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(
            document_file_name("104-020-0001"),
            "BSI_Quotation_104-020-0001.pdf"
        );
    }

    fn renderer(logo_url: Option<&str>) -> DocumentRenderer {
        DocumentRenderer::new(
            AssetLoader::new(Duration::from_secs(2))
                .unwrap()
                .local_root(std::env::temp_dir()),
            logo_url.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn test_render_pdf_with_unreachable_assets() {
        let renderer = renderer(Some("http://127.0.0.1:9/logo.webp"));

        let assets = renderer.load_assets(Some("/no/such/image.png")).await;
        assert_eq!(assets.logo, None);
        assert_eq!(assets.product, ProductImage::Unavailable);

        let document = renderer
            .render(&display(), Some("/no/such/image.png"))
            .await
            .unwrap();
        assert_eq!(document.file_name, "BSI_Quotation_104-020-0001.pdf");
        assert!(document.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_render_embeds_local_png() {
        let mut encoded = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image::RgbImage::new(4, 4))
            .write_to(&mut encoded, image::ImageFormat::Png)
            .unwrap();

        let path = std::env::temp_dir().join(format!("bellows-photo-{}.png", std::process::id()));
        tokio::fs::write(&path, encoded.into_inner()).await.unwrap();

        let document = renderer(None)
            .render(&display(), path.to_str())
            .await
            .unwrap();
        assert!(document.bytes.starts_with(b"%PDF"));

        let dir = std::env::temp_dir().join(format!("bellows-export-{}", std::process::id()));
        let saved = document.save_to(&dir).await.unwrap();
        assert!(saved.ends_with("BSI_Quotation_104-020-0001.pdf"));

        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_render_requires_selected_part() {
        let mut display = display();
        display.part_number = None;
        let err = renderer(None).render(&display, None).await.unwrap_err();
        assert!(matches!(err, QuoteError::NoPartSelected));
    }
}
