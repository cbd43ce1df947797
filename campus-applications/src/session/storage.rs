//! Session Storage - durable backends for cookies and local storage
//!
//! Two interchangeable flavours: in-memory maps for tests and throwaway
//! sessions, and JSON files under the data directory so that a later process
//! sees the same cookies and local storage, the way a browser reload does.

use super::types::Cookie;
use campus_core::{storage_error, CampusResult};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// File name of the cookie jar inside the data directory
pub const COOKIES_FILE: &str = "cookies.json";

/// File name of the local storage map inside the data directory
pub const LOCAL_STORAGE_FILE: &str = "local_storage.json";

/// Cookie storage keyed by cookie name
pub trait CookieJar: Send + Sync {
    /// Stored cookie, expired or not
    fn load(&self, name: &str) -> CampusResult<Option<Cookie>>;

    fn store(&self, cookie: Cookie) -> CampusResult<()>;

    fn remove(&self, name: &str) -> CampusResult<()>;

    /// Live cookie value; an expired cookie reads as absent
    fn get(&self, name: &str) -> CampusResult<Option<String>> {
        Ok(self
            .load(name)?
            .filter(|cookie| !cookie.is_expired_at(Utc::now()))
            .map(|cookie| cookie.value))
    }
}

/// String key/value storage that outlives the process
pub trait LocalStore: Send + Sync {
    fn get_item(&self, key: &str) -> CampusResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> CampusResult<()>;

    fn remove_item(&self, key: &str) -> CampusResult<()>;
}

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> CampusResult<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| storage_error!(format!("{} lock poisoned", what), "session_storage"))
}

#[derive(Debug, Default)]
pub struct MemoryCookieJar {
    cookies: Mutex<BTreeMap<String, Cookie>>,
}

impl CookieJar for MemoryCookieJar {
    fn load(&self, name: &str) -> CampusResult<Option<Cookie>> {
        Ok(lock(&self.cookies, "cookie jar")?.get(name).cloned())
    }

    fn store(&self, cookie: Cookie) -> CampusResult<()> {
        lock(&self.cookies, "cookie jar")?.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    fn remove(&self, name: &str) -> CampusResult<()> {
        lock(&self.cookies, "cookie jar")?.remove(name);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> CampusResult<Option<String>> {
        Ok(lock(&self.items, "local storage")?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CampusResult<()> {
        lock(&self.items, "local storage")?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CampusResult<()> {
        lock(&self.items, "local storage")?.remove(key);
        Ok(())
    }
}

/// A JSON object persisted to one file, rewritten on every change
#[derive(Debug)]
struct JsonMapFile {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonMapFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            guard: Mutex::new(()),
        }
    }

    fn read<V: DeserializeOwned>(&self) -> CampusResult<BTreeMap<String, V>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            storage_error!(
                format!("Failed to read {}: {}", self.path.display(), e),
                "session_storage",
                e
            )
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            storage_error!(
                format!("Corrupt storage file {}: {}", self.path.display(), e),
                "session_storage",
                e
            )
        })
    }

    fn write<V: Serialize>(&self, map: &BTreeMap<String, V>) -> CampusResult<()> {
        let json_data = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json_data).map_err(|e| {
            storage_error!(
                format!("Failed to write {}: {}", self.path.display(), e),
                "session_storage",
                e
            )
        })?;
        debug!("Saved {}", self.path.display());
        Ok(())
    }

    /// Read-modify-write under the file's lock
    fn update<V, F>(&self, change: F) -> CampusResult<()>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce(&mut BTreeMap<String, V>),
    {
        let _guard = lock(&self.guard, "storage file")?;
        let mut map = self.read()?;
        change(&mut map);
        self.write(&map)
    }
}

/// Cookie jar persisted as `cookies.json`
#[derive(Debug)]
pub struct FileCookieJar {
    file: JsonMapFile,
}

impl FileCookieJar {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            file: JsonMapFile::new(dir.as_ref().join(COOKIES_FILE)),
        }
    }
}

impl CookieJar for FileCookieJar {
    fn load(&self, name: &str) -> CampusResult<Option<Cookie>> {
        let mut cookies = self.file.read::<Cookie>()?;
        Ok(cookies.remove(name))
    }

    fn store(&self, cookie: Cookie) -> CampusResult<()> {
        self.file.update(|cookies: &mut BTreeMap<String, Cookie>| {
            cookies.insert(cookie.name.clone(), cookie);
        })
    }

    fn remove(&self, name: &str) -> CampusResult<()> {
        self.file.update(|cookies: &mut BTreeMap<String, Cookie>| {
            cookies.remove(name);
        })
    }
}

/// Local storage persisted as `local_storage.json`
#[derive(Debug)]
pub struct FileLocalStore {
    file: JsonMapFile,
}

impl FileLocalStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            file: JsonMapFile::new(dir.as_ref().join(LOCAL_STORAGE_FILE)),
        }
    }
}

impl LocalStore for FileLocalStore {
    fn get_item(&self, key: &str) -> CampusResult<Option<String>> {
        let mut items = self.file.read::<String>()?;
        Ok(items.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> CampusResult<()> {
        self.file.update(|items: &mut BTreeMap<String, String>| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> CampusResult<()> {
        self.file.update(|items: &mut BTreeMap<String, String>| {
            items.remove(key);
        })
    }
}

/// The pair of backends a session persists into
#[derive(Clone)]
pub struct StorageBackends {
    pub cookies: Arc<dyn CookieJar>,
    pub local: Arc<dyn LocalStore>,
}

impl StorageBackends {
    pub fn in_memory() -> Self {
        Self {
            cookies: Arc::new(MemoryCookieJar::default()),
            local: Arc::new(MemoryLocalStore::default()),
        }
    }

    /// JSON-file backends under `dir`, created if missing
    pub fn file_backed<P: AsRef<Path>>(dir: P) -> CampusResult<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            storage_error!(
                format!("Failed to create data directory {}: {}", dir.display(), e),
                "session_storage",
                e
            )
        })?;

        info!("Session storage initialized at: {}", dir.display());

        Ok(Self {
            cookies: Arc::new(FileCookieJar::new(dir)),
            local: Arc::new(FileLocalStore::new(dir)),
        })
    }
}
