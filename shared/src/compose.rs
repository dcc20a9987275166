//! Layout compositor
//!
//! Turns a catalog [`Template`], an optional [`BrandContext`] and the user's
//! text into a [`ResolvedScene`]: absolute, scaled draw instructions with
//! every color role resolved. Pure and total; the same inputs always give
//! the same scene.
//!
//! The preview and download paths share this one function. They differ
//! only through [`ComposeMode`]:
//! - preview: text may be clipped to its box by the renderer
//! - download: text overflows freely, no line cap, nothing is dropped

use serde::{Deserialize, Serialize};

use crate::models::brand_kit::BrandContext;
use crate::models::template::{ColorRef, ColorRole, Dimensions, Element, FontWeight, Template};

/// Text element name substituted with [`UserText::headline`]
pub const HEADLINE: &str = "headline";
/// Text element name substituted with [`UserText::description`]
pub const DESCRIPTION: &str = "description";

/// Line height used when the template does not set one
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

/// User-entered text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserText {
    pub headline: String,
    pub description: String,
}

impl UserText {
    pub fn new(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            description: description.into(),
        }
    }

    /// Initial editor text: the template's own headline/description content,
    /// falling back to generic placeholders.
    pub fn defaults_for(template: &Template) -> Self {
        Self {
            headline: template
                .text_content(HEADLINE)
                .unwrap_or("Your Headline Here")
                .to_string(),
            description: template
                .text_content(DESCRIPTION)
                .unwrap_or("Your description text here")
                .to_string(),
        }
    }
}

/// Box the caller wants the scene to fit within
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub max_width: f64,
    pub max_height: f64,
}

impl TargetBox {
    /// Editor preview box
    pub const PREVIEW: TargetBox = TargetBox {
        max_width: 600.0,
        max_height: 600.0,
    };

    pub fn new(max_width: f64, max_height: f64) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Box that yields scale 1 for the given dimensions
    pub fn native(dimensions: &Dimensions) -> Self {
        Self::new(dimensions.width, dimensions.height)
    }
}

/// Text overflow policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeMode {
    /// Clip text to its nominal box (preview). When false, text and the
    /// scene itself overflow freely so nothing is lost (download).
    pub preview_clip: bool,
}

impl ComposeMode {
    pub const PREVIEW: ComposeMode = ComposeMode { preview_clip: true };
    pub const DOWNLOAD: ComposeMode = ComposeMode {
        preview_clip: false,
    };

    pub fn preview() -> Self {
        Self::PREVIEW
    }

    pub fn download() -> Self {
        Self::DOWNLOAD
    }
}

/// Per-text clip policy handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextClip {
    /// Renderer may clip to the box and clamp lines
    Clip,
    /// Renderer must wrap and keep every line visible
    Overflow,
}

/// Scene-level overflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    Hidden,
    Visible,
}

/// One resolved draw instruction, in absolute scaled pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// Fill the whole scene box
    Fill {
        color: String,
        width: f64,
        height: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    Text {
        name: String,
        content: String,
        x: f64,
        y: f64,
        font_size: f64,
        font_weight: FontWeight,
        color: String,
        text_align: String,
        line_height: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_width: Option<f64>,
        clip: TextClip,
    },
    Image {
        src: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

/// Fully computed, renderable form of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedScene {
    pub template_id: String,
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub overflow: Overflow,
    /// Paint order: later instructions draw over earlier ones
    pub instructions: Vec<DrawInstruction>,
}

impl ResolvedScene {
    /// Every image URL the scene references, in paint order
    pub fn image_sources(&self) -> Vec<String> {
        self.instructions
            .iter()
            .filter_map(|ins| match ins {
                DrawInstruction::Image { src, .. } => Some(src.clone()),
                _ => None,
            })
            .collect()
    }
}

/// `min(max_width / width, max_height / height, 1)`, never upscaling.
///
/// Degenerate boxes (zero, negative, NaN) give 0 rather than a negative or
/// non-finite scale.
pub fn scale_for(dimensions: &Dimensions, target: TargetBox) -> f64 {
    // NaN fails both comparisons
    if !(target.max_width > 0.0 && target.max_height > 0.0) {
        return 0.0;
    }
    let scale = (target.max_width / dimensions.width)
        .min(target.max_height / dimensions.height)
        .min(1.0);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        0.0
    }
}

/// Resolve a color reference. Without a brand a role resolves to its own
/// name, which renderers treat as an unknown color.
pub fn resolve_color(color: &ColorRef, brand: Option<&BrandContext>) -> String {
    match color {
        ColorRef::Literal(value) => value.clone(),
        ColorRef::Role(role) => match brand {
            Some(brand) => brand.color(*role).to_string(),
            None => role.name().to_string(),
        },
    }
}

// Text colors resolve the primary role only; other role names are emitted as-is.
fn resolve_text_color(color: &ColorRef, brand: Option<&BrandContext>) -> String {
    match color {
        ColorRef::Role(ColorRole::Primary) => resolve_color(color, brand),
        other => String::from(other.clone()),
    }
}

fn text_content<'a>(name: &str, template_content: &'a str, text: &'a UserText) -> &'a str {
    match name {
        HEADLINE => &text.headline,
        DESCRIPTION => &text.description,
        _ => template_content,
    }
}

/// Compose a template into a resolved scene.
pub fn compose(
    template: &Template,
    brand: Option<&BrandContext>,
    text: &UserText,
    target: TargetBox,
    mode: ComposeMode,
) -> ResolvedScene {
    let scale = scale_for(&template.dimensions, target);
    let width = template.dimensions.width * scale;
    let height = template.dimensions.height * scale;
    let clip = if mode.preview_clip {
        TextClip::Clip
    } else {
        TextClip::Overflow
    };

    let mut instructions = Vec::with_capacity(template.elements.len());
    for element in &template.elements {
        match element {
            Element::Background { color } => instructions.push(DrawInstruction::Fill {
                color: resolve_color(color, brand),
                width,
                height,
            }),
            Element::Shape {
                position,
                size,
                color,
            } => instructions.push(DrawInstruction::Rect {
                x: position.x * scale,
                y: position.y * scale,
                width: size.width * scale,
                height: size.height * scale,
                color: resolve_color(color, brand),
            }),
            Element::Text {
                name,
                content,
                position,
                style,
            } => instructions.push(DrawInstruction::Text {
                name: name.clone(),
                content: text_content(name, content, text).to_string(),
                x: position.x * scale,
                y: position.y * scale,
                font_size: style.font_size * scale,
                font_weight: style.font_weight.clone(),
                color: resolve_text_color(&style.color, brand),
                text_align: style.text_align.clone(),
                line_height: style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT),
                max_width: style.max_width.map(|w| w * scale),
                clip,
            }),
            Element::Logo { position, size } => {
                if let Some(src) = brand.and_then(BrandContext::logo) {
                    instructions.push(DrawInstruction::Image {
                        src: src.to_string(),
                        x: position.x * scale,
                        y: position.y * scale,
                        width: size.width * scale,
                        height: size.height * scale,
                    });
                }
            }
        }
    }

    ResolvedScene {
        template_id: template.id.clone(),
        scale,
        width,
        height,
        overflow: if mode.preview_clip {
            Overflow::Hidden
        } else {
            Overflow::Visible
        },
        instructions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::brand_kit::BrandColors;
    use crate::models::template::{Position, Size, TextStyle};

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn brand() -> BrandContext {
        BrandContext {
            logo_url: Some("https://cdn.example.com/logo.png".into()),
            colors: BrandColors {
                primary: "#4F46E5".into(),
                secondary: "#FFFFFF".into(),
                accent: "#F59E0B".into(),
            },
        }
    }

    fn text(name: &str, content: &str, color: &str) -> Element {
        Element::Text {
            name: name.into(),
            content: content.into(),
            position: Position { x: 540.0, y: 300.0 },
            style: TextStyle {
                font_size: 72.0,
                font_weight: FontWeight::Named("bold".into()),
                color: ColorRef::from(color),
                text_align: "center".into(),
                line_height: None,
                max_width: Some(900.0),
            },
        }
    }

    fn template() -> Template {
        Template {
            id: "sale-post".into(),
            name: "Sale Post".into(),
            category: "Social Media".into(),
            description: None,
            thumbnail: None,
            dimensions: Dimensions {
                width: 1080.0,
                height: 1080.0,
            },
            elements: vec![
                Element::Background {
                    color: ColorRef::Role(ColorRole::Secondary),
                },
                Element::Shape {
                    position: Position { x: 100.0, y: 100.0 },
                    size: Size {
                        width: 200.0,
                        height: 50.0,
                    },
                    color: ColorRef::Role(ColorRole::Accent),
                },
                text(HEADLINE, "Template headline", "primary"),
                text(DESCRIPTION, "Template description", "#333333"),
                text("cta", "Shop now", "accent"),
                Element::Logo {
                    position: Position { x: 40.0, y: 40.0 },
                    size: Size {
                        width: 120.0,
                        height: 120.0,
                    },
                },
            ],
        }
    }

    #[test]
    fn test_scale_example() {
        let t = template();
        let scene = compose(
            &t,
            Some(&brand()),
            &UserText::default(),
            TargetBox::new(600.0, 600.0),
            ComposeMode::PREVIEW,
        );
        assert!(approx(scene.scale, 0.5556, 1e-4));
        assert!(approx(scene.width, 600.0, 1e-9));

        match &scene.instructions[1] {
            DrawInstruction::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                assert!(approx(*x, 55.56, 0.01));
                assert!(approx(*y, 55.56, 0.01));
                assert!(approx(*width, 111.1, 0.05));
                assert!(approx(*height, 27.78, 0.01));
                assert_eq!(color, "#F59E0B");
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_scale_never_exceeds_box_or_one() {
        let dims = [(1080.0, 1080.0), (1920.0, 1080.0), (1080.0, 1920.0), (300.0, 250.0)];
        let boxes = [(600.0, 600.0), (2000.0, 2000.0), (100.0, 800.0), (1.0, 1.0)];
        for (w, h) in dims {
            for (bw, bh) in boxes {
                let d = Dimensions {
                    width: w,
                    height: h,
                };
                let s = scale_for(&d, TargetBox::new(bw, bh));
                assert!(s <= 1.0);
                assert!(s * w <= bw + 1e-9, "{w}x{h} in {bw}x{bh}");
                assert!(s * h <= bh + 1e-9, "{w}x{h} in {bw}x{bh}");
            }
        }
    }

    #[test]
    fn test_no_upscale_for_large_box() {
        let d = Dimensions {
            width: 300.0,
            height: 250.0,
        };
        assert_eq!(scale_for(&d, TargetBox::new(2000.0, 2000.0)), 1.0);
    }

    #[test]
    fn test_degenerate_box_gives_zero_scale() {
        let d = Dimensions {
            width: 300.0,
            height: 250.0,
        };
        assert_eq!(scale_for(&d, TargetBox::new(0.0, 100.0)), 0.0);
        assert_eq!(scale_for(&d, TargetBox::new(-10.0, 100.0)), 0.0);
        assert_eq!(scale_for(&d, TargetBox::new(f64::NAN, f64::NAN)), 0.0);
        assert_eq!(scale_for(&d, TargetBox::new(f64::NAN, 600.0)), 0.0);
        assert_eq!(scale_for(&d, TargetBox::new(600.0, f64::NAN)), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let t = template();
        let b = brand();
        let txt = UserText::new("Sale!", "Half price");
        let a = compose(&t, Some(&b), &txt, TargetBox::PREVIEW, ComposeMode::PREVIEW);
        let c = compose(&t, Some(&b), &txt, TargetBox::PREVIEW, ComposeMode::PREVIEW);
        assert_eq!(a, c);
        assert_eq!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&c).unwrap()
        );
    }

    #[test]
    fn test_role_resolution_with_and_without_brand() {
        let primary = ColorRef::Role(ColorRole::Primary);
        assert_eq!(resolve_color(&primary, Some(&brand())), "#4F46E5");
        assert_eq!(resolve_color(&primary, None), "primary");

        let literal = ColorRef::Literal("#000000".into());
        assert_eq!(resolve_color(&literal, Some(&brand())), "#000000");
        assert_eq!(resolve_color(&literal, None), "#000000");
    }

    #[test]
    fn test_text_color_resolves_primary_only() {
        let t = template();
        let scene = compose(
            &t,
            Some(&brand()),
            &UserText::default(),
            TargetBox::PREVIEW,
            ComposeMode::PREVIEW,
        );
        let colors: Vec<&str> = scene
            .instructions
            .iter()
            .filter_map(|ins| match ins {
                DrawInstruction::Text { color, .. } => Some(color.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec!["#4F46E5", "#333333", "accent"]);
    }

    #[test]
    fn test_paint_order_preserved() {
        let t = template();
        let scene = compose(
            &t,
            Some(&brand()),
            &UserText::default(),
            TargetBox::PREVIEW,
            ComposeMode::DOWNLOAD,
        );
        assert_eq!(scene.instructions.len(), t.elements.len());
        let kinds: Vec<&str> = scene
            .instructions
            .iter()
            .map(|ins| match ins {
                DrawInstruction::Fill { .. } => "fill",
                DrawInstruction::Rect { .. } => "rect",
                DrawInstruction::Text { .. } => "text",
                DrawInstruction::Image { .. } => "image",
            })
            .collect();
        assert_eq!(kinds, vec!["fill", "rect", "text", "text", "text", "image"]);
    }

    #[test]
    fn test_no_logo_without_brand() {
        let t = template();
        let scene = compose(
            &t,
            None,
            &UserText::default(),
            TargetBox::PREVIEW,
            ComposeMode::PREVIEW,
        );
        assert_eq!(scene.instructions.len(), t.elements.len() - 1);
        assert!(scene.image_sources().is_empty());
        match &scene.instructions[0] {
            DrawInstruction::Fill { color, .. } => assert_eq!(color, "secondary"),
            other => panic!("expected fill, got {other:?}"),
        }
    }

    #[test]
    fn test_no_logo_with_empty_url() {
        let mut b = brand();
        b.logo_url = None;
        let scene = compose(
            &template(),
            Some(&b),
            &UserText::default(),
            TargetBox::PREVIEW,
            ComposeMode::PREVIEW,
        );
        assert!(scene.image_sources().is_empty());
    }

    #[test]
    fn test_headline_substitution() {
        let scene = compose(
            &template(),
            None,
            &UserText::new("Sale!", "All week"),
            TargetBox::PREVIEW,
            ComposeMode::PREVIEW,
        );
        let contents: Vec<&str> = scene
            .instructions
            .iter()
            .filter_map(|ins| match ins {
                DrawInstruction::Text { content, .. } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(contents, vec!["Sale!", "All week", "Shop now"]);
    }

    #[test]
    fn test_text_geometry_scaled() {
        let scene = compose(
            &template(),
            None,
            &UserText::default(),
            TargetBox::new(540.0, 540.0),
            ComposeMode::PREVIEW,
        );
        match &scene.instructions[2] {
            DrawInstruction::Text {
                x,
                y,
                font_size,
                max_width,
                line_height,
                ..
            } => {
                assert_eq!(*x, 270.0);
                assert_eq!(*y, 150.0);
                assert_eq!(*font_size, 36.0);
                assert_eq!(*max_width, Some(450.0));
                assert_eq!(*line_height, DEFAULT_LINE_HEIGHT);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_download_mode_never_truncates() {
        let long_headline = "Limited offer ".repeat(200);
        let long_description = "line\n".repeat(500);
        let scene = compose(
            &template(),
            Some(&brand()),
            &UserText::new(long_headline.clone(), long_description.clone()),
            TargetBox::native(&template().dimensions),
            ComposeMode::DOWNLOAD,
        );
        assert_eq!(scene.scale, 1.0);
        assert_eq!(scene.overflow, Overflow::Visible);
        for ins in &scene.instructions {
            if let DrawInstruction::Text {
                name,
                content,
                clip,
                ..
            } = ins
            {
                assert_eq!(*clip, TextClip::Overflow);
                match name.as_str() {
                    HEADLINE => assert_eq!(content, &long_headline),
                    DESCRIPTION => assert_eq!(content, &long_description),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_preview_mode_marks_clip() {
        let scene = compose(
            &template(),
            None,
            &UserText::default(),
            TargetBox::PREVIEW,
            ComposeMode::PREVIEW,
        );
        assert_eq!(scene.overflow, Overflow::Hidden);
        assert!(scene.instructions.iter().all(|ins| match ins {
            DrawInstruction::Text { clip, .. } => *clip == TextClip::Clip,
            _ => true,
        }));
    }

    #[test]
    fn test_defaults_for_template() {
        let t = template();
        let defaults = UserText::defaults_for(&t);
        assert_eq!(defaults.headline, "Template headline");
        assert_eq!(defaults.description, "Template description");

        let mut bare = t.clone();
        bare.elements.retain(|el| el.text_name().is_none());
        let defaults = UserText::defaults_for(&bare);
        assert_eq!(defaults.headline, "Your Headline Here");
    }

    #[test]
    fn test_instruction_serialization_tag() {
        let ins = DrawInstruction::Image {
            src: "u".into(),
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
        };
        let json = serde_json::to_value(&ins).unwrap();
        assert_eq!(json["kind"], "image");
    }
}
