use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateCatalogConfig {
    /// Path to the YAML predicate catalog. Relative paths resolve against
    /// the working directory at startup.
    #[serde(default = "d_catalog_path")]
    pub path: PathBuf,
    /// Reject triples whose predicate is not found in the catalog rather
    /// than falling back to an `UNKNOWN` bridge category.
    #[serde(default = "d_strict")]
    pub strict: bool,
}

impl Default for PredicateCatalogConfig {
    fn default() -> Self {
        Self {
            path: d_catalog_path(),
            strict: d_strict(),
        }
    }
}

fn d_catalog_path() -> PathBuf {
    PathBuf::from("./catalog/predicates.yaml")
}
fn d_strict() -> bool {
    false
}
