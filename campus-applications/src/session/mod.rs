//! Session Management Module
//!
//! Who is logged in, with which role-scoped credential, persisted the way a
//! browser keeps cookies and local storage.

pub mod storage;
pub mod store;
pub mod types;

pub use storage::{
    CookieJar, FileCookieJar, FileLocalStore, LocalStore, MemoryCookieJar, MemoryLocalStore,
    StorageBackends,
};
pub use store::SessionStore;
pub use types::*;
