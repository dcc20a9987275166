//! Download export plan
//!
//! The bitmap capture itself happens outside this crate (browser canvas or a
//! headless renderer). [`ExportPlan`] is everything that renderer needs: the
//! scene composed at native size in download mode, the oversampling factor,
//! the background, the images to preload and the file name.

use serde::{Deserialize, Serialize};

use crate::compose::{ComposeMode, ResolvedScene, TargetBox, UserText, compose};
use crate::models::brand_kit::BrandContext;
use crate::models::template::Template;

/// Oversampling factor for downloads
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Canvas fill behind the scene
pub const EXPORT_BACKGROUND: &str = "#ffffff";

const DEFAULT_FILE_STEM: &str = "design";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPlan {
    pub scene: ResolvedScene,
    pub pixel_ratio: f64,
    pub output_width: u32,
    pub output_height: u32,
    pub background: String,
    /// Image URLs to load (cross-origin) before capturing
    pub preload: Vec<String>,
    pub file_name: String,
}

impl ExportPlan {
    /// Compose `template` at 1:1 with text overflow allowed.
    pub fn for_scene(template: &Template, brand: Option<&BrandContext>, text: &UserText) -> Self {
        let scene = compose(
            template,
            brand,
            text,
            TargetBox::native(&template.dimensions),
            ComposeMode::download(),
        );
        let preload = scene.image_sources();
        Self {
            output_width: (scene.width * EXPORT_PIXEL_RATIO).round() as u32,
            output_height: (scene.height * EXPORT_PIXEL_RATIO).round() as u32,
            pixel_ratio: EXPORT_PIXEL_RATIO,
            background: EXPORT_BACKGROUND.to_string(),
            preload,
            file_name: format!("{DEFAULT_FILE_STEM}.png"),
            scene,
        }
    }

    /// Set the file name to `{name}-{timestamp}.png`
    pub fn with_file_name(mut self, name: &str, timestamp_millis: i64) -> Self {
        self.file_name = file_name(name, timestamp_millis);
        self
    }
}

/// `{name}-{timestamp}.png`, with path separators and control characters
/// replaced. An empty name becomes `design`.
pub fn file_name(name: &str, timestamp_millis: i64) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = if stem.is_empty() {
        DEFAULT_FILE_STEM
    } else {
        stem.as_str()
    };
    format!("{stem}-{timestamp_millis}.png")
}
