//! Post submissions and the rules that turn them into valid posts.

use serde::{Deserialize, Serialize};

use super::post::{Category, DEFAULT_READ_TIME, NewPost};
use crate::error::{FieldViolation, ValidationError};

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_EXCERPT_CHARS: usize = 500;
pub const MAX_AUTHOR_CHARS: usize = 100;
pub const MAX_TAG_CHARS: usize = 50;

/// Required prefix of a non-empty external link.
pub const EXTERNAL_LINK_PREFIX: &str = "https://github.com/";

/// Tags as submitted: either a list or one comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl TagsInput {
    /// Trim every tag and drop the empty ones, keeping order.
    pub fn normalize(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagsInput::List(tags) => tags,
            TagsInput::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        };

        raw.into_iter()
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

impl From<&str> for TagsInput {
    fn from(csv: &str) -> Self {
        TagsInput::Csv(csv.to_string())
    }
}

impl From<Vec<String>> for TagsInput {
    fn from(tags: Vec<String>) -> Self {
        TagsInput::List(tags)
    }
}

/// Post fields as they arrive from a form or request body.
///
/// Every field is optional so the same type serves creates (where
/// [`PostDraft::validate`] reports what is missing) and partial updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, alias = "githubLink", skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl PostDraft {
    /// Fields set in `patch` replace the ones in `self`.
    pub fn overlay(self, patch: PostDraft) -> PostDraft {
        PostDraft {
            title: patch.title.or(self.title),
            excerpt: patch.excerpt.or(self.excerpt),
            content: patch.content.or(self.content),
            author: patch.author.or(self.author),
            category: patch.category.or(self.category),
            tags: patch.tags.or(self.tags),
            image: patch.image.or(self.image),
            external_link: patch.external_link.or(self.external_link),
            read_time: patch.read_time.or(self.read_time),
            featured: patch.featured.or(self.featured),
        }
    }

    /// Check every constraint and produce the storable fields.
    ///
    /// All violations are collected; the error lists each of them.
    pub fn validate(self) -> Result<NewPost, ValidationError> {
        let mut violations = Vec::new();

        let title = required_text(
            &mut violations,
            "title",
            self.title,
            "Please provide a title for this blog post",
            Some((MAX_TITLE_CHARS, "Title cannot be more than 200 characters")),
        );
        let excerpt = required_text(
            &mut violations,
            "excerpt",
            self.excerpt,
            "Please provide an excerpt for this blog post",
            Some((MAX_EXCERPT_CHARS, "Excerpt cannot be more than 500 characters")),
        );
        let content = required_text(
            &mut violations,
            "content",
            self.content,
            "Please provide content for this blog post",
            None,
        );
        let author = required_text(
            &mut violations,
            "author",
            self.author,
            "Please provide an author name",
            Some((MAX_AUTHOR_CHARS, "Author name cannot be more than 100 characters")),
        );
        let category = parse_category(&mut violations, self.category);

        let tags = self.tags.map(TagsInput::normalize).unwrap_or_default();
        for tag in &tags {
            if tag.chars().count() > MAX_TAG_CHARS {
                violations.push(FieldViolation::new(
                    "tags",
                    format!("Tag `{}` cannot be more than 50 characters", tag),
                ));
            }
        }

        let external_link = non_blank(self.external_link);
        if let Some(link) = &external_link {
            if !link.starts_with(EXTERNAL_LINK_PREFIX) {
                violations.push(FieldViolation::new(
                    "externalLink",
                    "External link must be a valid GitHub URL (https://github.com/...)",
                ));
            }
        }

        match (title, excerpt, content, author, category) {
            (Some(title), Some(excerpt), Some(content), Some(author), Some(category))
                if violations.is_empty() =>
            {
                Ok(NewPost {
                    title,
                    excerpt,
                    content,
                    author,
                    category,
                    tags,
                    image: non_blank(self.image),
                    external_link,
                    read_time: non_blank(self.read_time)
                        .unwrap_or_else(|| DEFAULT_READ_TIME.to_string()),
                    featured: self.featured.unwrap_or(false),
                })
            }
            _ => Err(ValidationError::new(violations)),
        }
    }
}

fn required_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<String>,
    missing: &str,
    max: Option<(usize, &str)>,
) -> Option<String> {
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        violations.push(FieldViolation::new(field, missing));
        return None;
    };

    if let Some((limit, too_long)) = max {
        if value.chars().count() > limit {
            violations.push(FieldViolation::new(field, too_long));
            return None;
        }
    }

    Some(value)
}

fn parse_category(
    violations: &mut Vec<FieldViolation>,
    value: Option<String>,
) -> Option<Category> {
    let Some(raw) = non_blank(value) else {
        violations.push(FieldViolation::new("category", "Please select a category"));
        return None;
    };

    match raw.parse::<Category>() {
        Ok(category) => Some(category),
        Err(_) => {
            let known: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
            violations.push(FieldViolation::new(
                "category",
                format!(
                    "`{}` is not a valid category (expected one of {})",
                    raw,
                    known.join(", ")
                ),
            ));
            None
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal() -> PostDraft {
        PostDraft {
            title: Some("A".to_string()),
            excerpt: Some("B".to_string()),
            content: Some("C".to_string()),
            author: Some("D".to_string()),
            category: Some("React".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_draft_gets_defaults() {
        let post = minimal().validate().unwrap();

        assert_eq!(post.category, Category::React);
        assert_eq!(post.tags, Vec::<String>::new());
        assert_eq!(post.read_time, DEFAULT_READ_TIME);
        assert_eq!(post.image, None);
        assert_eq!(post.external_link, None);
        assert!(!post.featured);
    }

    #[test]
    fn test_tags_are_normalized_from_csv_and_list() {
        assert_eq!(
            TagsInput::from(" react, ,next.js ,").normalize(),
            vec!["react".to_string(), "next.js".to_string()]
        );
        assert_eq!(
            TagsInput::from(vec!["  css ".to_string(), "".to_string()]).normalize(),
            vec!["css".to_string()]
        );
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let err = PostDraft::default().validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();

        assert_eq!(fields, vec!["title", "excerpt", "content", "author", "category"]);
    }

    #[test]
    fn test_unknown_category_is_named_in_error() {
        let err = PostDraft {
            category: Some("NotARealCategory".to_string()),
            ..minimal()
        }
        .validate()
        .unwrap_err();

        assert!(err.mentions("category"));
        assert!(err.to_string().contains("category"));
        assert!(err.to_string().contains("NotARealCategory"));
    }

    #[test]
    fn test_length_bounds() {
        let err = PostDraft {
            title: Some("t".repeat(MAX_TITLE_CHARS + 1)),
            author: Some("a".repeat(MAX_AUTHOR_CHARS + 1)),
            tags: Some(TagsInput::List(vec!["x".repeat(MAX_TAG_CHARS + 1)])),
            ..minimal()
        }
        .validate()
        .unwrap_err();

        assert!(err.mentions("title"));
        assert!(err.mentions("author"));
        assert!(err.mentions("tags"));
        assert!(!err.mentions("excerpt"));

        let at_limit = PostDraft {
            title: Some("t".repeat(MAX_TITLE_CHARS)),
            ..minimal()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_external_link_prefix() {
        let bad = PostDraft {
            external_link: Some("https://gitlab.com/rafi/blog".to_string()),
            ..minimal()
        };
        assert!(bad.validate().unwrap_err().mentions("externalLink"));

        let good = PostDraft {
            external_link: Some("https://github.com/rafi/blog".to_string()),
            ..minimal()
        };
        assert_eq!(
            good.validate().unwrap().external_link.as_deref(),
            Some("https://github.com/rafi/blog")
        );

        let blank = PostDraft {
            external_link: Some(String::new()),
            ..minimal()
        };
        assert_eq!(blank.validate().unwrap().external_link, None);
    }

    #[test]
    fn test_deserializes_form_body() {
        let draft: PostDraft = serde_json::from_str(
            r#"{"title":"A","excerpt":"B","content":"C","author":"D",
                "category":"CSS","tags":"grid, layout","githubLink":"","featured":true}"#,
        )
        .unwrap();

        assert_eq!(draft.tags, Some(TagsInput::Csv("grid, layout".to_string())));
        let post = draft.validate().unwrap();
        assert_eq!(post.tags, vec!["grid".to_string(), "layout".to_string()]);
        assert!(post.featured);
    }
}
