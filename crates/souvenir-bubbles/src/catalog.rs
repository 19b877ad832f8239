//! Catalog items and icon readiness

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use souvenir_core::{Result, SouvenirError};
use std::collections::{BTreeMap, HashMap};

/// Display data for one catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub icon: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Item key → item mapping from the catalog service.
///
/// Keys are kept sorted so a seeded RNG picks the same items across runs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: BTreeMap<String, CatalogItem>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog response body.
    ///
    /// Accepts either the bare key → item object or one wrapped in `"items"`.
    /// Entries that do not describe an item, or have an empty icon, are
    /// skipped; a body that is not a JSON object is an error.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        let root = match value {
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Object(items)) => items,
                Some(other) => {
                    map.insert("items".into(), other);
                    map
                }
                None => map,
            },
            other => {
                return Err(SouvenirError::CatalogParse(format!(
                    "expected an object, got {}",
                    json_kind(&other)
                )))
            }
        };

        let mut catalog = Self::new();
        for (key, entry) in root {
            match serde_json::from_value::<CatalogItem>(entry) {
                Ok(item) if !item.icon.trim().is_empty() => {
                    catalog.insert(key, item);
                }
                Ok(_) => debug!("catalog item '{key}' has no icon, skipped"),
                Err(e) => debug!("catalog item '{key}' is malformed, skipped: {e}"),
            }
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<String>, item: CatalogItem) {
        self.items.insert(key.into(), item);
    }

    pub fn get(&self, key: &str) -> Option<&CatalogItem> {
        self.items.get(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogItem)> {
        self.items.iter()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Host-side image loading
pub trait IconLoader {
    /// Start loading `url`; completion arrives as `PageEvent::IconLoaded { key, ok }`
    fn request_icon(&mut self, key: &str, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconStatus {
    Pending,
    Ready,
    /// Load failed; the key is excluded from spawning
    Failed,
}

#[derive(Debug, Clone)]
struct IconEntry {
    url: String,
    status: IconStatus,
}

/// Tracks which icons are decoded and usable
#[derive(Debug, Default)]
pub struct IconRegistry {
    icons: HashMap<String, IconEntry>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loader for `url` unless this key was already requested with it
    pub fn request(&mut self, key: &str, url: &str, loader: &mut dyn IconLoader) {
        if let Some(entry) = self.icons.get(key) {
            if entry.url == url {
                return;
            }
        }
        self.icons.insert(
            key.to_string(),
            IconEntry {
                url: url.to_string(),
                status: IconStatus::Pending,
            },
        );
        loader.request_icon(key, url);
    }

    /// Record a load result. Unknown keys are ignored.
    pub fn mark(&mut self, key: &str, ok: bool) {
        let Some(entry) = self.icons.get_mut(key) else {
            debug!("icon result for unrequested key '{key}' ignored");
            return;
        };
        if ok {
            entry.status = IconStatus::Ready;
        } else {
            entry.status = IconStatus::Failed;
            let err = SouvenirError::IconLoad {
                key: key.to_string(),
                reason: format!("could not load {}", entry.url),
            };
            warn!("{err}; key excluded from spawning");
        }
    }

    pub fn status(&self, key: &str) -> Option<IconStatus> {
        self.icons.get(key).map(|e| e.status)
    }

    pub fn is_ready(&self, key: &str) -> bool {
        self.status(key) == Some(IconStatus::Ready)
    }

    /// URL of a ready icon
    pub fn ready_url(&self, key: &str) -> Option<&str> {
        self.icons
            .get(key)
            .filter(|e| e.status == IconStatus::Ready)
            .map(|e| e.url.as_str())
    }

    pub fn ready_count(&self) -> usize {
        self.icons
            .values()
            .filter(|e| e.status == IconStatus::Ready)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Requests(Vec<(String, String)>);

    impl IconLoader for Requests {
        fn request_icon(&mut self, key: &str, url: &str) {
            self.0.push((key.into(), url.into()));
        }
    }

    #[test]
    fn parse_bare_map() {
        let body = r#"{
            "shell": {"icon": "/i/shell.png", "name": "Shell", "category": "beach"},
            "kite": {"icon": "/i/kite.png", "name": "Kite"}
        }"#;
        let catalog = Catalog::from_json(body).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("kite").unwrap().category, None);
        assert_eq!(catalog.get("shell").unwrap().category.as_deref(), Some("beach"));
    }

    #[test]
    fn parse_wrapped_map() {
        let body = r#"{"items": {"shell": {"icon": "/i/shell.png", "name": "Shell"}}}"#;
        let catalog = Catalog::from_json(body).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let body = r#"{
            "ok": {"icon": "/i/ok.png", "name": "Ok"},
            "no_icon": {"icon": "", "name": "Empty"},
            "wrong": 42
        }"#;
        let catalog = Catalog::from_json(body).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("ok").is_some());
    }

    #[test]
    fn non_object_body_is_error() {
        assert!(matches!(
            Catalog::from_json("[1, 2]"),
            Err(SouvenirError::CatalogParse(_))
        ));
        assert!(Catalog::from_json("not json").is_err());
    }

    #[test]
    fn icon_lifecycle() {
        let mut loader = Requests::default();
        let mut icons = IconRegistry::new();
        icons.request("shell", "/i/shell.png", &mut loader);
        icons.request("shell", "/i/shell.png", &mut loader);
        assert_eq!(loader.0.len(), 1);
        assert_eq!(icons.status("shell"), Some(IconStatus::Pending));
        assert!(icons.ready_url("shell").is_none());

        icons.mark("shell", true);
        assert_eq!(icons.ready_url("shell"), Some("/i/shell.png"));

        icons.request("kite", "/i/kite.png", &mut loader);
        icons.mark("kite", false);
        assert!(!icons.is_ready("kite"));
        assert_eq!(icons.ready_count(), 1);
    }
}
