use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use actix_web::web::Bytes;
use log::debug;

/// Served when the assets directory has no file of the same name.
const BUILTIN: &[(&str, &[u8])] = &[
    ("crm.css", include_bytes!("../../default_pages/static/crm.css")),
    ("crm.js", include_bytes!("../../default_pages/static/crm.js")),
];

/// A static file ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub content_type: &'static str,
    pub body: Bytes,
}

/// Static files under `/static`. Each file is read once, then served from memory.
pub struct Assets {
    dir: Option<PathBuf>,
    cache: RwLock<HashMap<String, Arc<Asset>>>,
}

impl Assets {
    pub fn new(dir: impl Into<PathBuf>) -> Assets {
        Assets { dir: Some(dir.into()), cache: RwLock::new(HashMap::new()) }
    }

    /// Only the files compiled into the binary.
    pub fn builtin() -> Assets {
        Assets { dir: None, cache: RwLock::new(HashMap::new()) }
    }

    /// Looks up a file by its path below the assets directory.
    pub fn get(&self, path: &str) -> Option<Arc<Asset>> {
        if !is_safe(path) {
            return None;
        }

        if let Some(asset) = self.cache.read().unwrap_or_else(PoisonError::into_inner).get(path) { // read lock gets dropped after if statement
            return Some(Arc::clone(asset));
        }

        let body = self.read(path)?;
        let asset = Arc::new(Asset { content_type: get_content_type(path), body });

        self.cache.write().unwrap_or_else(PoisonError::into_inner).insert(path.to_string(), Arc::clone(&asset));

        Some(asset)
    }

    fn read(&self, path: &str) -> Option<Bytes> {
        if let Some(dir) = &self.dir {
            if let Ok(contents) = fs::read(dir.join(path)) {
                debug!("loaded asset {} from {}", path, dir.display());
                return Some(Bytes::from(contents));
            }
        }
        BUILTIN.iter()
            .find(|(name, _)| *name == path)
            .map(|(_, contents)| Bytes::from_static(*contents))
    }
}

/// Only plain relative paths that stay inside the assets directory.
fn is_safe(path: &str) -> bool {
    !path.is_empty()
        && !path.contains('\\')
        && Path::new(path).components().all(|component| matches!(component, Component::Normal(_)))
}

pub fn get_content_type(path: &str) -> &'static str {
    if path.ends_with(".ico") {
        return "image/x-icon";
    } else if path.ends_with(".js") {
        return "application/javascript";
    } else if path.ends_with(".svg") {
        return "image/svg+xml";
    } else if path.ends_with(".html") {
        return "text/html";
    } else if path.ends_with(".css") {
        return "text/css";
    } else if path.ends_with(".png") {
        return "image/png";
    } else if path.ends_with(".json") {
        return "application/json";
    }
    "text/plain"
}
