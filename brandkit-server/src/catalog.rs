//! Template catalog
//!
//! Read-only, loaded once at startup. The catalog compiled into the binary
//! is used unless `TEMPLATES_PATH` points at a replacement file.

use shared::models::{Template, TemplateError};
use thiserror::Error;

const EMBEDDED_TEMPLATES: &str = include_str!("../data/templates.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read template catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse template catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] TemplateError),
    #[error("duplicate template id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<Template>,
}

impl Catalog {
    /// Load from `path`, or the embedded catalog when `None`.
    pub fn load(path: Option<&str>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.to_string(),
                    source,
                })?;
                Self::from_json(&json)
            }
            None => Self::from_json(EMBEDDED_TEMPLATES),
        }
    }

    /// Parse and validate a JSON array of templates.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<Template> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn new(templates: Vec<Template>) -> Result<Self, CatalogError> {
        for (i, template) in templates.iter().enumerate() {
            template.validate()?;
            if templates[..i].iter().any(|t| t.id == template.id) {
                return Err(CatalogError::DuplicateId(template.id.clone()));
            }
        }
        Ok(Self { templates })
    }

    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Unique categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for template in &self.templates {
            if !out.contains(&template.category.as_str()) {
                out.push(&template.category);
            }
        }
        out
    }

    /// Templates whose category matches, ignoring case
    pub fn by_category(&self, category: &str) -> Vec<&Template> {
        let wanted = category.to_lowercase();
        self.templates
            .iter()
            .filter(|t| t.category.to_lowercase() == wanted)
            .collect()
    }
}
