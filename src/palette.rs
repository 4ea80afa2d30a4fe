use serde::{Deserialize, Serialize};

use crate::color::Rgb;

const BUILTIN_PALETTES: &[(&str, &str)] = &[
    ("blueprint", include_str!("../palettes/blueprint.toml")),
    ("classic", include_str!("../palettes/classic.toml")),
    ("inverse", include_str!("../palettes/inverse.toml")),
];

/// Ink and paper colors for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "default_ink")]
    pub ink: Rgb,
    #[serde(default = "default_paper")]
    pub paper: Rgb,
}

fn default_ink() -> Rgb {
    Rgb::BLACK
}

fn default_paper() -> Rgb {
    Rgb::WHITE
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            ink: default_ink(),
            paper: default_paper(),
        }
    }
}

impl Palette {
    pub fn from_builtin(name: &str) -> Result<Self, String> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_PALETTES
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                format!(
                    "Unknown built-in palette '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                )
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_PALETTES.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse palette TOML: {}", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| format!("Failed to parse palette YAML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_ignores_case_and_whitespace() {
        let lower = Palette::from_builtin("inverse").expect("lower case");
        let mixed = Palette::from_builtin(" Inverse ").expect("mixed case");
        assert_eq!(lower, mixed);
        assert_eq!(lower.ink, Rgb::WHITE);
        assert_eq!(lower.paper, Rgb::BLACK);
    }

    #[test]
    fn every_builtin_parses() {
        for name in Palette::list_builtins() {
            Palette::from_builtin(name).unwrap_or_else(|e| panic!("{name}: {e}"));
        }
        assert_eq!(Palette::from_builtin("classic"), Ok(Palette::default()));
    }

    #[test]
    fn unknown_builtin_lists_available_names() {
        let err = Palette::from_builtin("neon").expect_err("unknown palette");
        assert!(err.contains("blueprint, classic, inverse"));
    }

    #[test]
    fn missing_fields_fall_back_to_black_on_white() {
        let palette = Palette::from_yaml("ink: '#112233'\n").expect("yaml palette");
        assert_eq!(palette.ink, Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(palette.paper, Rgb::WHITE);

        assert!(Palette::from_toml("ink = \"blue\"").is_err());
    }
}
