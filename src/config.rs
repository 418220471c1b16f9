//! # Configuration
//!
//! Everything the paginator and the renderer can be tuned with, loaded from a
//! camelCase JSON file. Every field has a default, so `{}` is a valid config.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PaginatorError;
use crate::model::{Edges, LayoutConstraint, PageSize};
use crate::style::ProseStyle;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginatorConfig {
    pub frame: FrameConfig,
    pub prose: ProseStyle,
    pub policy: BreakPolicy,
    pub branding: Branding,
    pub showcase: ShowcaseConfig,
    /// Explicit budgets. When absent they are derived from `frame`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<LayoutConstraint>,
}

impl PaginatorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PaginatorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PaginatorError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| PaginatorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The budgets the engine should run with.
    pub fn layout_constraint(&self) -> LayoutConstraint {
        self.constraint
            .unwrap_or_else(|| LayoutConstraint::from_frame(&self.frame))
    }
}

/// Geometry of a content page frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameConfig {
    pub page_size: PageSize,
    /// Title banner height.
    pub header_height: f64,
    /// Contact footer height.
    pub footer_height: f64,
    /// Padding of the body area between header and footer.
    pub body_padding: Edges,
    /// Extra top space reserved on every page after the first.
    pub continuation_gap: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            header_height: 192.0,
            footer_height: 57.0,
            body_padding: Edges {
                top: 32.0,
                right: 40.0,
                bottom: 96.0,
                left: 40.0,
            },
            continuation_gap: 32.0,
        }
    }
}

/// Tunables of the page-break decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakPolicy {
    /// Fewest list items left at the bottom of a page when a list splits.
    pub min_items_before_break: usize,
    /// Fewest list items carried to the next page when a list splits.
    pub min_items_after_break: usize,
    /// Push a heading to the next page when what follows it does not fit.
    pub avoid_orphan_headings: bool,
    /// Smallest frame a scaled table may get under its heading. Below this
    /// the heading stays alone and the table moves on. Zero always scales.
    pub min_scaled_table_height: f64,
}

impl Default for BreakPolicy {
    fn default() -> Self {
        Self {
            min_items_before_break: 1,
            min_items_after_break: 1,
            avoid_orphan_headings: true,
            min_scaled_table_height: 0.0,
        }
    }
}

/// Footer and cover identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub company_name: String,
    pub email: String,
    pub website: String,
    pub logo_path: Option<String>,
    pub header_pattern_path: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "Your Company".to_string(),
            email: "info@example.com".to_string(),
            website: "www.example.com".to_string(),
            logo_path: None,
            header_pattern_path: None,
        }
    }
}

/// The fixed showcase slides inserted after the cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowcaseConfig {
    /// Slide numbers used when a proposal carries no slide list of its own.
    pub slide_numbers: Vec<u32>,
    /// Image path with `{n}` standing for the slide number.
    pub image_pattern: String,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            slide_numbers: (2..=13).collect(),
            image_pattern: "/assets/slides/{n}.png".to_string(),
        }
    }
}

impl ShowcaseConfig {
    pub fn image_for(&self, n: u32) -> String {
        self.image_pattern.replace("{n}", &n.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_is_default() {
        let config = PaginatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, PaginatorConfig::default());
    }

    #[test]
    fn explicit_constraint_wins() {
        let config = PaginatorConfig::from_json_str(
            r#"{ "constraint": { "contentWidth": 600, "firstPageMaxHeight": 500, "otherPageMaxHeight": 450 } }"#,
        )
        .unwrap();
        let c = config.layout_constraint();
        assert_eq!(c.first_page_max_height, 500.0);
        assert_eq!(c.other_page_max_height, 450.0);
    }

    #[test]
    fn derived_constraint_uses_frame() {
        let config = PaginatorConfig::default();
        assert_eq!(
            config.layout_constraint(),
            LayoutConstraint::from_frame(&config.frame)
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "policy": {{ "minItemsAfterBreak": 2 }}, "branding": {{ "email": "a@b.c" }} }}"#).unwrap();
        let config = PaginatorConfig::load(file.path()).unwrap();
        assert_eq!(config.policy.min_items_after_break, 2);
        assert_eq!(config.policy.min_items_before_break, 1);
        assert_eq!(config.branding.email, "a@b.c");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = PaginatorConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PaginatorError::Io { .. }));
    }

    #[test]
    fn showcase_image_pattern() {
        let showcase = ShowcaseConfig::default();
        assert_eq!(showcase.slide_numbers.len(), 12);
        assert_eq!(showcase.image_for(5), "/assets/slides/5.png");
    }
}
