use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored blog entry. Field names follow the JSON documents served by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Base64 encoded image
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Display for Blog {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, created_at={}, created_by={}\ntitle={}\ndescription:\n{}",
               self.id,
               self.created_at,
               self.created_by.as_deref().unwrap_or("-"),
               self.title,
               self.description
        )
    }
}

/// Body of a create request. Every field is optional on the wire so that
/// missing fields can be reported as a validation error instead of a parse error.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NewBlog {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidBlog {
    pub title: String,
    pub image: String,
    pub description: String,
    pub created_by: Option<String>,
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl NewBlog {
    pub fn validate(self) -> Option<ValidBlog> {
        let title = required(self.title)?;
        let image = required(self.image)?;
        let description = required(self.description)?;
        Some(ValidBlog {
            title,
            image,
            description,
            created_by: required(self.created_by),
        })
    }
}

/// Partial field set applied with `$set` semantics: top-level keys replace
/// the stored values, everything else is kept.
pub type BlogPatch = Map<String, Value>;

pub const IMMUTABLE_FIELDS: [&str; 2] = ["_id", "created_at"];

#[cfg(test)]
mod tests {
    use super::*;

    fn new_blog(title: Option<&str>, image: Option<&str>, description: Option<&str>) -> NewBlog {
        NewBlog {
            title: title.map(|s| s.to_string()),
            image: image.map(|s| s.to_string()),
            description: description.map(|s| s.to_string()),
            created_by: None,
        }
    }

    #[test]
    fn test_validate() {
        let valid = new_blog(Some("title"), Some("aW1n"), Some("desc")).validate().unwrap();
        assert_eq!(valid.title, "title");
        assert_eq!(valid.image, "aW1n");
        assert_eq!(valid.description, "desc");
        assert!(valid.created_by.is_none());

        assert!(new_blog(None, Some("aW1n"), Some("desc")).validate().is_none());
        assert!(new_blog(Some("title"), None, Some("desc")).validate().is_none());
        assert!(new_blog(Some("title"), Some("aW1n"), None).validate().is_none());
        assert!(new_blog(Some(""), Some("aW1n"), Some("desc")).validate().is_none());
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{
            "_id": "cbca23f4-9cb9-11ea-a1df-83d8f0a5e3cb",
            "title": "How to write a Code Review",
            "description": "There is always those quite obvious things",
            "image": "aW1n",
            "created_by": "user-1",
            "created_at": "2020-05-22T10:54:25Z"
        }"#;
        let blog: Blog = serde_json::from_str(json).unwrap();
        assert_eq!(blog.id, "cbca23f4-9cb9-11ea-a1df-83d8f0a5e3cb");
        assert_eq!(blog.created_by.as_deref(), Some("user-1"));

        let value = serde_json::to_value(&blog).unwrap();
        assert_eq!(value["_id"], "cbca23f4-9cb9-11ea-a1df-83d8f0a5e3cb");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_missing_creator() {
        let json = r#"{"_id": "1", "title": "t", "description": "d", "image": "i", "created_at": "2020-05-22T10:54:25Z"}"#;
        let blog: Blog = serde_json::from_str(json).unwrap();
        assert!(blog.created_by.is_none());
        let value = serde_json::to_value(&blog).unwrap();
        assert!(value.get("created_by").is_none());
    }
}
