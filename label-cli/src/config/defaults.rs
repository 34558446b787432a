//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("LABEL_RASTERIZER", "gs", "Rasterizer program reading PDF on stdin"),
    ("LABEL_DPI", "216", "Rasterization resolution in dots per inch"),
    (
        "LABEL_RASTERIZER_TIMEOUT_SECS",
        "30",
        "Seconds before a rasterizer run is killed",
    ),
    (
        "LABEL_PROCESSING",
        "full",
        "Post-processing mode: full or passthrough",
    ),
    (
        "LABEL_THRESHOLD",
        "true",
        "Binarize label pixels to pure black/white",
    ),
    ("LABEL_LOG", "info", "Log filter used when RUST_LOG is unset"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}
