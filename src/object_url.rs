//! Object URLs: transient `blob:` handles for in-memory image data

use crate::file::Blob;
use parking_lot::Mutex;
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

/// Registry mapping `blob:<origin>/<uuid>` URLs to blobs.
///
/// Entries live until revoked; releasing them is the caller's job.
pub struct ObjectUrlRegistry {
    origin: String,
    entries: Mutex<HashMap<Uuid, Blob>>,
}

impl ObjectUrlRegistry {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a blob and return its URL
    pub fn create_object_url(&self, blob: Blob) -> String {
        let mut entries = self.entries.lock();
        let id = loop {
            let id = Uuid::new_v4();
            if !entries.contains_key(&id) {
                break id;
            }
        };
        entries.insert(id, blob);
        format!("blob:{}/{}", self.origin, id)
    }

    /// Look up the blob behind a URL
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        let id = self.parse(url)?;
        self.entries.lock().get(&id).cloned()
    }

    /// Release a URL. Returns false if it was unknown or already revoked.
    pub fn revoke(&self, url: &str) -> bool {
        match self.parse(url) {
            Some(id) => self.entries.lock().remove(&id).is_some(),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn parse(&self, url: &str) -> Option<Uuid> {
        let parsed = Url::parse(url).ok()?;
        if parsed.scheme() != "blob" {
            return None;
        }
        let (origin, id) = parsed.path().rsplit_once('/')?;
        if origin != self.origin {
            return None;
        }
        Uuid::parse_str(id).ok()
    }
}

impl Default for ObjectUrlRegistry {
    fn default() -> Self {
        Self::new("pdf2img")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::PNG_MIME_TYPE;
    use pretty_assertions::assert_eq;

    fn blob(bytes: &[u8]) -> Blob {
        Blob::new(bytes.to_vec(), PNG_MIME_TYPE)
    }

    #[test]
    fn test_create_and_resolve() {
        let registry = ObjectUrlRegistry::default();
        assert!(registry.is_empty());

        let url = registry.create_object_url(blob(&[1, 2, 3]));
        assert!(url.starts_with("blob:pdf2img/"));
        assert_eq!(url.len(), "blob:pdf2img/".len() + 36);
        assert_eq!(registry.len(), 1);

        let resolved = registry.resolve(&url).unwrap();
        assert_eq!(resolved.data(), &[1, 2, 3]);
        assert_eq!(resolved.mime_type(), PNG_MIME_TYPE);
    }

    #[test]
    fn test_urls_are_unique() {
        let registry = ObjectUrlRegistry::default();
        let a = registry.create_object_url(blob(&[1]));
        let b = registry.create_object_url(blob(&[1]));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_revoke() {
        let registry = ObjectUrlRegistry::default();
        let url = registry.create_object_url(blob(&[1]));

        assert!(registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert!(!registry.revoke(&url));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_malformed_urls() {
        let registry = ObjectUrlRegistry::new("app");
        let url = registry.create_object_url(blob(&[1]));
        let id = url.rsplit('/').next().unwrap();

        assert!(registry.resolve("not a url").is_none());
        assert!(registry.resolve(&format!("https://app/{}", id)).is_none());
        assert!(registry.resolve(&format!("blob:other/{}", id)).is_none());
        assert!(registry.resolve("blob:app/not-a-uuid").is_none());
        assert!(!registry.revoke("blob:app"));
        assert_eq!(registry.len(), 1);
    }
}
