//! `_links` reference blocks attached to REST resources.

use serde::{Deserialize, Serialize};

/// A single hyperlink.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    #[serde(default)]
    pub href: String,
}

/// The `_links` object; only the web link is consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Links {
    #[serde(default)]
    pub web: Option<Link>,
}

impl Links {
    pub fn web(href: impl Into<String>) -> Self {
        Self {
            web: Some(Link { href: href.into() }),
        }
    }

    /// The web link, if the resource carried one.
    pub fn web_href(&self) -> Option<&str> {
        self.web
            .as_ref()
            .map(|l| l.href.as_str())
            .filter(|h| !h.is_empty())
    }
}
