//! LocalStorage-backed token persistence.

use aigrowth_shared::TokenStorage;

/// Browser LocalStorage. Every operation degrades to "absent" / `false` when
/// storage is unavailable (private mode, disabled cookies).
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTokenStorage;

impl BrowserTokenStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
