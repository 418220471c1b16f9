//! Proposal documents as delivered by the persistence layer.
//!
//! Field names follow the wire format (snake_case), with aliases for the
//! older camelCase fields that some stored proposals still carry.

use serde::{Deserialize, Serialize};

/// The kind of a content page. Only `Process` changes rendering: process
/// pages are shown as one unpaginated frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPageType {
    #[default]
    Text,
    Requirements,
    Timeline,
    Investment,
    Fees,
    Notes,
    Agreement,
    Process,
    Custom,
}

/// One editable content page of a proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPage {
    pub id: String,
    #[serde(rename = "type", default)]
    pub page_type: ContentPageType,
    pub title: String,
    /// Rich HTML content.
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_true", alias = "isVisible")]
    pub is_visible: bool,
    #[serde(default)]
    pub order: i64,
}

impl ContentPage {
    /// Process pages render their content as a single frame.
    pub fn is_process(&self) -> bool {
        self.page_type == ContentPageType::Process
            || self.title.to_lowercase().contains("process")
    }
}

/// A fixed full-page showcase slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticSlide {
    pub slide_number: u32,
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i64,
}

/// Legacy nested cover block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCover {
    #[serde(default)]
    pub prepared_for: String,
    #[serde(default)]
    pub prepared_by: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub sub_heading: Option<String>,
    #[serde(default)]
    pub date: String,
}

/// A complete proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: String,

    #[serde(default)]
    pub prepared_for: String,
    #[serde(default)]
    pub prepared_by: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub date: String,

    /// Language of the cover labels. `"ar"` renders the cover right-to-left.
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<LegacyCover>,

    #[serde(default, alias = "includeShowcase")]
    pub include_showcase: bool,

    #[serde(default)]
    pub static_slides: Vec<StaticSlide>,

    #[serde(default)]
    pub pages: Vec<ContentPage>,
}

fn default_true() -> bool {
    true
}

/// Pick the first non-blank value.
fn first_filled<'a>(candidates: &[&'a str], fallback: &'a str) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(fallback)
}

impl Proposal {
    pub fn is_arabic(&self) -> bool {
        self.language.as_deref() == Some("ar")
    }

    pub fn prepared_for(&self) -> &str {
        let legacy = self.cover.as_ref().map(|c| c.prepared_for.as_str()).unwrap_or("");
        first_filled(&[self.prepared_for.as_str(), legacy], "Client Name")
    }

    pub fn prepared_by(&self) -> &str {
        let legacy = self.cover.as_ref().map(|c| c.prepared_by.as_str()).unwrap_or("");
        first_filled(&[self.prepared_by.as_str(), legacy], "")
    }

    pub fn project_type(&self) -> &str {
        let legacy = self.cover.as_ref().map(|c| c.project_type.as_str()).unwrap_or("");
        first_filled(&[self.project_type.as_str(), legacy], "Development")
    }

    pub fn date(&self) -> &str {
        let legacy = self.cover.as_ref().map(|c| c.date.as_str()).unwrap_or("");
        first_filled(&[self.date.as_str(), legacy], "")
    }

    /// Line under the cover title, from the legacy cover block.
    pub fn sub_heading(&self) -> Option<&str> {
        self.cover
            .as_ref()
            .and_then(|c| c.sub_heading.as_deref())
            .filter(|s| !s.trim().is_empty())
    }

    /// Visible content pages in display order.
    pub fn visible_pages(&self) -> Vec<&ContentPage> {
        let mut pages: Vec<&ContentPage> = self.pages.iter().filter(|p| p.is_visible).collect();
        pages.sort_by_key(|p| p.order);
        pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_fields() {
        let json = r#"{
            "id": "p1",
            "includeShowcase": true,
            "cover": { "preparedFor": "Acme", "projectType": "Web", "subHeading": "Phase two", "date": "2026-01-01" },
            "pages": [
                { "id": "a", "type": "text", "title": "Intro", "content": "<p>x</p>", "isVisible": false, "order": 1 },
                { "id": "b", "type": "process", "title": "How", "content": "", "order": 0 }
            ]
        }"#;
        let p: Proposal = serde_json::from_str(json).unwrap();
        assert!(p.include_showcase);
        assert_eq!(p.prepared_for(), "Acme");
        assert_eq!(p.project_type(), "Web");
        assert_eq!(p.sub_heading(), Some("Phase two"));
        assert!(!p.pages[0].is_visible);
        assert!(p.pages[1].is_visible);
        assert_eq!(p.pages[1].page_type, ContentPageType::Process);
    }

    #[test]
    fn visible_pages_sorted_by_order() {
        let page = |id: &str, order: i64, visible: bool| ContentPage {
            id: id.to_string(),
            page_type: ContentPageType::Text,
            title: id.to_string(),
            content: String::new(),
            is_visible: visible,
            order,
        };
        let p = Proposal {
            id: "x".into(),
            prepared_for: String::new(),
            prepared_by: String::new(),
            project_type: String::new(),
            date: String::new(),
            language: None,
            cover: None,
            include_showcase: false,
            static_slides: vec![],
            pages: vec![page("c", 3, true), page("a", 1, true), page("b", 2, false)],
        };
        let ids: Vec<&str> = p.visible_pages().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(p.prepared_for(), "Client Name");
    }

    #[test]
    fn process_detection_by_title() {
        let page = ContentPage {
            id: "1".into(),
            page_type: ContentPageType::Custom,
            title: "Our Process".into(),
            content: String::new(),
            is_visible: true,
            order: 0,
        };
        assert!(page.is_process());
    }
}
