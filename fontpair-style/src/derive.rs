//! Selection + catalog to font-face rules and style variables.
//!
//! Derivation is pure: the same selection and catalog always produce the
//! same rules in the same order. Roles whose font id does not resolve in
//! the catalog (unset, or catalog not loaded yet) contribute nothing.

use fontpair_catalog::{Catalog, FontDescriptor};
use fontpair_selection::{Role, SelectionState};

/// Font files are served from here unless configured otherwise.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.jsdelivr.net/fontsource/fonts";

/// Style variables for one resolved role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleVariables {
    pub role: Role,
    pub family: String,
    pub weight: u16,
    pub size: u16,
}

impl RoleVariables {
    /// `--font-{role}`
    pub fn family_name(&self) -> String {
        format!("--font-{}", self.role)
    }

    /// Fallback stack is always `sans-serif`, whatever the font category.
    pub fn family_value(&self) -> String {
        format!("'{}', sans-serif", self.family)
    }

    /// The three `(name, value)` pairs for this role.
    pub fn assignments(&self) -> [(String, String); 3] {
        [
            (self.family_name(), self.family_value()),
            (format!("--font-{}-weight", self.role), self.weight.to_string()),
            (format!("--font-{}-size", self.role), format!("{}px", self.size)),
        ]
    }
}

/// Everything needed to render the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedStyle {
    /// One `@font-face` rule per emitted face, deduplicated by font id
    pub font_faces: Vec<String>,
    /// Resolved roles in display, heading, body order
    pub variables: Vec<RoleVariables>,
}

impl DerivedStyle {
    /// All rules as one stylesheet fragment.
    pub fn css(&self) -> String {
        self.font_faces.join("\n")
    }

    /// Flattened variable assignments in role order.
    pub fn assignments(&self) -> Vec<(String, String)> {
        self.variables
            .iter()
            .flat_map(|v| v.assignments())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.font_faces.is_empty() && self.variables.is_empty()
    }
}

/// Derive against the default CDN.
pub fn derive(selection: &SelectionState, catalog: &Catalog) -> DerivedStyle {
    derive_with_cdn(selection, catalog, DEFAULT_CDN_BASE)
}

pub fn derive_with_cdn(selection: &SelectionState, catalog: &Catalog, cdn_base: &str) -> DerivedStyle {
    let cdn_base = cdn_base.trim_end_matches('/');
    let mut emitted: Vec<&str> = Vec::with_capacity(3);
    let mut style = DerivedStyle::default();

    for (role, settings) in selection.roles() {
        let Some(font) = catalog.get(&settings.font_id) else {
            if !settings.is_unset() {
                log::trace!("{} font '{}' not in catalog, skipping", role, settings.font_id);
            }
            continue;
        };

        if !emitted.contains(&font.id.as_str()) {
            emitted.push(font.id.as_str());
            style.font_faces.extend(font_face_rules(font, cdn_base));
        }

        style.variables.push(RoleVariables {
            role,
            family: font.family.clone(),
            weight: settings.weight,
            size: settings.size,
        });
    }

    style
}

/// Rules for one font: per (subset, style) for variable fonts, per
/// (subset, weight, style) for static ones, in publication order.
pub fn font_face_rules(font: &FontDescriptor, cdn_base: &str) -> Vec<String> {
    let mut rules = Vec::new();
    for subset in &font.subsets {
        if font.variable {
            for style in &font.styles {
                let url = format!("{cdn_base}/{}:vf@latest/{subset}-wght-{style}.woff2", font.id);
                rules.push(font_face(&font.family, style, "100 900", &url, "woff2-variations"));
            }
        } else {
            for weight in &font.weights {
                for style in &font.styles {
                    let url = format!("{cdn_base}/{}@latest/{subset}-{weight}-{style}.woff2", font.id);
                    rules.push(font_face(&font.family, style, &weight.to_string(), &url, "woff2"));
                }
            }
        }
    }
    rules
}

fn font_face(family: &str, style: &str, weight: &str, url: &str, format: &str) -> String {
    format!(
        "@font-face {{\n  font-family: '{family}';\n  font-style: {style};\n  font-weight: {weight};\n  font-display: swap;\n  src: url('{url}') format('{format}');\n}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontpair_selection::{RoleSettings, builtin_presets};

    fn catalog() -> Catalog {
        Catalog::new(vec![
            FontDescriptor::new("sora", "Sora")
                .with_weights(&[100, 200, 300, 400, 500, 600, 700, 800])
                .with_subsets(&["latin", "latin-ext"])
                .variable(),
            FontDescriptor::new("geist", "Geist")
                .with_weights(&[400, 600])
                .with_styles(&["normal", "italic"]),
            FontDescriptor::new("lora", "Lora").with_category("serif"),
        ])
    }

    fn sora_geist() -> SelectionState {
        builtin_presets()[1].clone()
    }

    #[test]
    fn test_variable_font_rules() {
        let catalog = catalog();
        let rules = font_face_rules(catalog.get("sora").unwrap(), DEFAULT_CDN_BASE);
        assert_eq!(rules.len(), 2, "one rule per subset x style");
        assert!(rules[0].contains("font-weight: 100 900;"));
        assert!(rules[0].contains(
            "src: url('https://cdn.jsdelivr.net/fontsource/fonts/sora:vf@latest/latin-wght-normal.woff2') format('woff2-variations');"
        ));
        assert!(rules[1].contains("latin-ext-wght-normal.woff2"));
    }

    #[test]
    fn test_static_font_rules() {
        let catalog = catalog();
        let rules = font_face_rules(catalog.get("geist").unwrap(), DEFAULT_CDN_BASE);
        assert_eq!(rules.len(), 4, "one rule per subset x weight x style");
        assert_eq!(
            rules[1],
            "@font-face {\n  font-family: 'Geist';\n  font-style: italic;\n  font-weight: 400;\n  font-display: swap;\n  src: url('https://cdn.jsdelivr.net/fontsource/fonts/geist@latest/latin-400-italic.woff2') format('woff2');\n}"
        );
        assert!(rules[2].contains("latin-600-normal.woff2"));
    }

    #[test]
    fn test_shared_font_emitted_once() {
        let style = derive(&sora_geist(), &catalog());
        // sora: 2 rules, geist (heading and body): 4 rules, not 8
        assert_eq!(style.font_faces.len(), 6);
        assert_eq!(style.variables.len(), 3);
    }

    #[test]
    fn test_variables_for_preset() {
        let style = derive(&sora_geist(), &catalog());
        let assignments = style.assignments();
        assert_eq!(
            &assignments[..3],
            &[
                ("--font-display".to_string(), "'Sora', sans-serif".to_string()),
                ("--font-display-weight".to_string(), "700".to_string()),
                ("--font-display-size".to_string(), "48px".to_string()),
            ]
        );
        assert_eq!(assignments[3].1, "'Geist', sans-serif");
        assert_eq!(assignments[8], ("--font-body-size".to_string(), "16px".to_string()));
    }

    #[test]
    fn test_fallback_ignores_category() {
        let selection = SelectionState::new(
            RoleSettings::new("lora", 700, 48),
            RoleSettings::new("", 600, 24),
            RoleSettings::new("", 400, 16),
        );
        let style = derive(&selection, &catalog());
        assert_eq!(style.variables[0].family_value(), "'Lora', sans-serif");
    }

    #[test]
    fn test_empty_catalog_derives_nothing() {
        let style = derive(&SelectionState::default(), &Catalog::default());
        assert!(style.font_faces.is_empty());
        assert!(style.variables.is_empty());
        assert!(style.is_empty());
        assert_eq!(style.css(), "");
    }

    #[test]
    fn test_unresolved_role_skipped() {
        let selection = sora_geist()
            .update(Role::Heading, fontpair_selection::FieldUpdate::FontId("missing".into()))
            .unwrap();
        let style = derive(&selection, &catalog());
        let roles: Vec<Role> = style.variables.iter().map(|v| v.role).collect();
        assert_eq!(roles, vec![Role::Display, Role::Body]);
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let catalog = catalog();
        assert_eq!(derive(&sora_geist(), &catalog), derive(&sora_geist(), &catalog));
    }

    #[test]
    fn test_custom_cdn_base() {
        let style = derive_with_cdn(&sora_geist(), &catalog(), "https://fonts.example.com/");
        assert!(style.font_faces[0].contains("url('https://fonts.example.com/sora:vf@latest/"));
    }
}
