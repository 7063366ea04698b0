#![allow(dead_code)]

//! Route types shared by the integration tests.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use urlbind::{PathCaptures, PathParams, QueryParams, QueryString, QueryValue, Route};

/// `/example/{name}` with a presence flag.
#[derive(Debug, Clone, Default, PartialEq, Route)]
#[route(name = "example", pattern = "/example/{name}")]
pub struct Example {
    #[url_path]
    pub name: Option<String>,
    #[url_query(kind = "boolean")]
    pub happy: bool,
}

/// Required path id, optional page with a non-null default, renamed search
/// key.
#[derive(Debug, Clone, PartialEq, Route)]
#[route(name = "user", pattern = "/users/{id}")]
pub struct UserPage {
    #[url_path]
    pub id: Option<u32>,
    #[url_query]
    pub page: u32,
    #[url_query("q")]
    pub search: Option<String>,
}

impl Default for UserPage {
    fn default() -> Self {
        Self {
            id: None,
            page: 1,
            search: None,
        }
    }
}

/// Multi-valued query field.
#[derive(Debug, Clone, Default, PartialEq, Route)]
#[route(name = "tags", pattern = "/tags")]
pub struct Tagged {
    #[url_query("k")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub r#type: String,
    pub id: String,
}

/// Composite path field filling two placeholders at once.
pub mod target_path {
    use super::*;

    pub fn serialize(target: &Target) -> anyhow::Result<PathParams> {
        Ok(PathParams::from([
            ("type".to_string(), target.r#type.clone()),
            ("id".to_string(), target.id.clone()),
        ]))
    }

    pub fn deserialize(captures: &PathCaptures) -> anyhow::Result<Target> {
        let field = |key: &str| {
            captures
                .get(key)
                .cloned()
                .ok_or_else(|| anyhow!("missing path group '{key}'"))
        };
        Ok(Target {
            r#type: field("type")?,
            id: field("id")?,
        })
    }
}

/// Every value of a repeated query key, which plain fields do not read.
pub mod all_labels {
    use super::*;

    #[allow(clippy::ptr_arg)]
    pub fn serialize(labels: &Vec<String>) -> anyhow::Result<QueryParams> {
        Ok(QueryParams::from([(
            "label".to_string(),
            QueryValue::Multi(labels.clone()),
        )]))
    }

    pub fn deserialize(query: &QueryString) -> anyhow::Result<Vec<String>> {
        Ok(query
            .get_all("label")
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Route)]
#[route(name = "linked", pattern = "/link/{type}/{id}")]
pub struct Linked {
    #[url_path(with = "target_path")]
    pub target: Option<Target>,
    #[url_query(with = "all_labels")]
    pub labels: Vec<String>,
}

/// Boolean kind in both locations: a renamed presence flag in the query and a
/// path field that is never written into the path.
#[derive(Debug, Clone, Default, PartialEq, Route)]
#[route(name = "document", pattern = "/docs/{id}")]
pub struct Document {
    #[url_path]
    pub id: Option<u32>,
    #[url_path(kind = "boolean")]
    pub archived: bool,
    #[url_query(key = "preview", kind = "boolean")]
    pub show_preview: bool,
}
