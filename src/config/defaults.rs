//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn title() -> String {
        "Isobit".into()
    }

    pub fn base_url() -> String {
        "".into()
    }

    pub fn scripts_url() -> String {
        "/_scripts".into()
    }

    pub fn styles_url() -> String {
        "/_styles".into()
    }

    pub fn assets_url() -> String {
        "/_assets".into()
    }
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "site".into()
    }

    pub fn output() -> PathBuf {
        "www".into()
    }

    pub fn templates() -> Vec<PathBuf> {
        vec!["includes".into(), "layouts".into()]
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn scripts() -> PathBuf {
        "scripts".into()
    }

    pub fn styles() -> PathBuf {
        "styles".into()
    }
}
