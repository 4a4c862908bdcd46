//! Opaque key-value store for persisted blobs.
//!
//! Native builds keep one file per key in a `data/` directory next to the
//! executable (temp-file + rename so a crashed write never corrupts the
//! previous value). Browser builds use `window.localStorage`. Values are
//! opaque strings; the callers serialize JSON into them.

#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

// ─── Native backend ──────────────────────────────────────────────────────────

#[cfg(not(target_arch = "wasm32"))]
fn data_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("data")
}

#[cfg(not(target_arch = "wasm32"))]
fn key_path(key: &str) -> PathBuf {
    data_directory().join(format!("{}.json", key))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn get(key: &str) -> Option<String> {
    fs::read_to_string(key_path(key)).ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set(key: &str, value: &str) -> Result<(), String> {
    let dir = data_directory();
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("could not create {}: {}", dir.display(), e))?;
    }
    let path = key_path(key);
    // Write to a temp file first, then rename for atomicity.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, value)
        .map_err(|e| format!("write failed for {}: {}", tmp_path.display(), e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("rename failed: {}", e))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(key: &str) -> Result<(), String> {
    let path = key_path(key);
    if !path.exists() {
        return Ok(());
    }
    fs::remove_file(&path).map_err(|e| format!("remove failed for {}: {}", path.display(), e))
}

// ─── Browser backend ─────────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(target_arch = "wasm32")]
pub fn get(key: &str) -> Option<String> {
    local_storage().and_then(|s| s.get_item(key).ok().flatten())
}

#[cfg(target_arch = "wasm32")]
pub fn set(key: &str, value: &str) -> Result<(), String> {
    let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
    storage
        .set_item(key, value)
        .map_err(|_| format!("localStorage rejected key {}", key))
}

#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) -> Result<(), String> {
    let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_string())?;
    storage
        .remove_item(key)
        .map_err(|_| format!("localStorage could not remove key {}", key))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
