//! Domain models for the import pipeline.
//!
//! - [`Row`] - One input record from the CSV
//! - [`PostStatus`] - WordPress post status derived from a free-text label
//! - [`TaxonomyKind`] - Category or tag
//! - [`PostRecord`] - Payload submitted to the posts endpoint

use serde::{Deserialize, Serialize};

/// Remote id of a taxonomy term.
pub type TermId = u64;

/// Remote id of a media asset.
pub type MediaId = u64;

/// Remote id of a post.
pub type PostId = u64;

// =============================================================================
// Post Status
// =============================================================================

/// Status of a WordPress post.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
    Pending,
    Private,
    Future,
}

/// Fixed mapping from upper-cased status labels to post statuses.
pub const STATUS_TABLE: [(&str, PostStatus); 5] = [
    ("PUBLISHED", PostStatus::Publish),
    ("DRAFT", PostStatus::Draft),
    ("PENDING", PostStatus::Pending),
    ("PRIVATE", PostStatus::Private),
    ("FUTURE", PostStatus::Future),
];

impl PostStatus {
    /// Map a status label through [`STATUS_TABLE`], case-insensitively.
    ///
    /// Absent or unrecognized labels become [`PostStatus::Draft`].
    pub fn from_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return PostStatus::Draft;
        };
        let key = label.trim().to_uppercase();
        STATUS_TABLE
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, status)| *status)
            .unwrap_or(PostStatus::Draft)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Pending => "pending",
            PostStatus::Private => "private",
            PostStatus::Future => "future",
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Taxonomy Kind
// =============================================================================

/// The two taxonomies a row's tag names are resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    /// REST route of this taxonomy.
    pub fn route(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "categories",
            TaxonomyKind::Tag => "tags",
        }
    }

    /// Singular name for messages.
    pub fn label(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
        }
    }
}

impl std::fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Row
// =============================================================================

/// One record of the input table.
///
/// Every cell is optional. Blank cells are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Row {
    /// 1-based position among the data rows.
    pub number: usize,
    pub title: Option<String>,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
    pub status: Option<String>,
    pub tags: Option<String>,
    pub publish_date: Option<String>,
    pub seo_title: Option<String>,
    pub language: Option<String>,
    pub archived: Option<String>,
    pub featured_image: Option<String>,
}

impl Row {
    pub fn new(number: usize) -> Self {
        Self { number, ..Default::default() }
    }

    /// Title for progress messages; absent titles still get a line.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }

    /// Post status derived from the status label.
    pub fn post_status(&self) -> PostStatus {
        PostStatus::from_label(self.status.as_deref())
    }

    /// Tag names from the comma-separated tag cell, trimmed, empties dropped.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `true` only when the archived cell reads `true` in any case.
    pub fn is_archived(&self) -> bool {
        self.archived
            .as_deref()
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }
}

// =============================================================================
// Post Record
// =============================================================================

/// Custom fields sent under `meta`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub archived: bool,
}

/// Payload for `POST {base}/posts`.
///
/// `categories` and `tags` always carry the same id list: every tag name on
/// the row is resolved in both taxonomies and merged.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostRecord {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub status: PostStatus,
    pub author: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub categories: Vec<TermId>,
    pub tags: Vec<TermId>,
    pub meta: PostMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_media: Option<MediaId>,
}

impl PostRecord {
    /// Assemble the payload for a row.
    pub fn assemble(
        row: &Row,
        author: u64,
        term_ids: Vec<TermId>,
        featured_media: Option<MediaId>,
    ) -> Self {
        Self {
            title: row.title.clone().unwrap_or_default(),
            content: row.body.clone().unwrap_or_default(),
            excerpt: row.excerpt.clone().unwrap_or_default(),
            slug: row.slug.clone(),
            status: row.post_status(),
            author,
            date: row.publish_date.clone(),
            categories: term_ids.clone(),
            tags: term_ids,
            meta: PostMeta {
                seo_title: row.seo_title.clone(),
                language: row.language.clone(),
                archived: row.is_archived(),
            },
            featured_media,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_table() {
        assert_eq!(PostStatus::from_label(Some("PUBLISHED")), PostStatus::Publish);
        assert_eq!(PostStatus::from_label(Some("Published")), PostStatus::Publish);
        assert_eq!(PostStatus::from_label(Some("draft")), PostStatus::Draft);
        assert_eq!(PostStatus::from_label(Some("Pending")), PostStatus::Pending);
        assert_eq!(PostStatus::from_label(Some("private")), PostStatus::Private);
        assert_eq!(PostStatus::from_label(Some("FUTURE")), PostStatus::Future);
    }

    #[test]
    fn test_unknown_status_is_draft() {
        assert_eq!(PostStatus::from_label(Some("Publish")), PostStatus::Draft);
        assert_eq!(PostStatus::from_label(Some("archived")), PostStatus::Draft);
        assert_eq!(PostStatus::from_label(Some("")), PostStatus::Draft);
        assert_eq!(PostStatus::from_label(None), PostStatus::Draft);
    }

    #[test]
    fn test_status_label_whitespace() {
        assert_eq!(PostStatus::from_label(Some("  published ")), PostStatus::Publish);
    }

    #[test]
    fn test_tag_names_split_and_trim() {
        let row = Row { tags: Some(" Go,Rust , ,systems,".into()), ..Row::new(1) };
        assert_eq!(row.tag_names(), vec!["Go", "Rust", "systems"]);

        assert!(Row::new(2).tag_names().is_empty());
    }

    #[test]
    fn test_archived_flag() {
        let mut row = Row::new(1);
        assert!(!row.is_archived());
        row.archived = Some("TRUE".into());
        assert!(row.is_archived());
        row.archived = Some("false".into());
        assert!(!row.is_archived());
        row.archived = Some("yes".into());
        assert!(!row.is_archived());
    }

    #[test]
    fn test_assemble_shares_term_ids() {
        let row = Row {
            title: Some("Hello World".into()),
            body: Some("<p>Hi</p>".into()),
            status: Some("Published".into()),
            ..Row::new(1)
        };

        let post = PostRecord::assemble(&row, 2, vec![1, 2, 3], Some(9));
        assert_eq!(post.categories, post.tags);
        assert_eq!(post.tags, vec![1, 2, 3]);
        assert_eq!(post.status, PostStatus::Publish);
        assert_eq!(post.author, 2);
        assert_eq!(post.featured_media, Some(9));
    }

    #[test]
    fn test_payload_omits_absent_fields() {
        let row = Row {
            title: Some("Hello".into()),
            language: Some("en".into()),
            archived: Some("True".into()),
            ..Row::new(1)
        };

        let value = serde_json::to_value(PostRecord::assemble(&row, 1, vec![], None)).unwrap();
        assert_eq!(value["excerpt"], "");
        assert_eq!(value["status"], "draft");
        assert_eq!(value["meta"], json!({ "language": "en", "archived": true }));
        assert!(value.get("featured_media").is_none());
        assert!(value.get("slug").is_none());
        assert!(value.get("date").is_none());
    }
}
