// Path helper utilities shared across storage operations
use std::path::Path;

/// Extract a normalized basename from a remote or local path.
pub fn basename(path: &str) -> String {
    Path::new(path.trim_start_matches('/'))
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.trim_matches('/').to_string())
}

/// Join a namespace root and an application id into an OpenDAL root ending in '/'.
pub fn namespace_root(base: &str, app_id: u32) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("/{app_id}/")
    } else {
        format!("{base}/{app_id}/")
    }
}
