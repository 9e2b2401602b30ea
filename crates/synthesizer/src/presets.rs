use std::collections::HashMap;

use sa_domain::error::{Error, Result};
use serde::Deserialize;

/// Persona and tone/length/emoji/detail directives for one style mode.
/// Grounded on the same YAML-embedded declarative catalog idiom as
/// `sa_catalog::PredicateCatalog`.
#[derive(Debug, Clone, Deserialize)]
pub struct StylePreset {
    pub name: String,
    pub persona: String,
    pub tone: String,
    pub length: String,
    pub emoji: bool,
    pub detail: String,
}

const DEFAULT_PRESETS_YAML: &str = include_str!("presets.yaml");

pub struct StyleCatalog {
    presets: HashMap<String, StylePreset>,
}

impl StyleCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: Vec<StylePreset> = serde_yaml::from_str(yaml)
            .map_err(|e| Error::Config(format!("invalid style preset catalog: {e}")))?;
        let presets = raw.into_iter().map(|p| (p.name.clone(), p)).collect();
        Ok(Self { presets })
    }

    pub fn default_catalog() -> Self {
        Self::from_yaml(DEFAULT_PRESETS_YAML).expect("bundled presets.yaml must parse")
    }

    /// Look up a style mode, falling back to `"default"` for an unknown or
    /// unset mode rather than failing the synthesis pass.
    pub fn resolve(&self, style_mode: &str) -> &StylePreset {
        self.presets
            .get(style_mode)
            .or_else(|| self.presets.get("default"))
            .expect("bundled catalog always carries a 'default' preset")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses_and_has_default() {
        let cat = StyleCatalog::default_catalog();
        assert_eq!(cat.resolve("default").name, "default");
    }

    #[test]
    fn resolves_known_preset() {
        let cat = StyleCatalog::default_catalog();
        assert_eq!(cat.resolve("playful").name, "playful");
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        let cat = StyleCatalog::default_catalog();
        assert_eq!(cat.resolve("nonexistent").name, "default");
    }
}
