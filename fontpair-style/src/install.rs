//! Copyable install snippets for the current selection.
//!
//! Covers the npm route (`npm install`, `import`, usage CSS) and the CDN
//! route (self-contained `@font-face` blocks for the latin subset).

use crate::derive::DEFAULT_CDN_BASE;
use fontpair_catalog::{Catalog, FontDescriptor};
use fontpair_selection::SelectionState;

const STATIC_SCOPE: &str = "@fontsource";
const VARIABLE_SCOPE: &str = "@fontsource-variable";

/// Human label for a numeric weight, e.g. `700` -> `Bold`.
pub fn weight_name(weight: u16) -> Option<&'static str> {
    let name = match weight {
        100 => "Thin",
        200 => "Extra Light",
        300 => "Light",
        400 => "Regular",
        500 => "Medium",
        600 => "Semi Bold",
        700 => "Bold",
        800 => "Extra Bold",
        900 => "Black",
        _ => return None,
    };
    Some(name)
}

/// npm package scope for a font; ids the catalog doesn't know get the
/// static scope.
fn package_scope(font: Option<&FontDescriptor>) -> &'static str {
    match font {
        Some(f) if f.variable => VARIABLE_SCOPE,
        _ => STATIC_SCOPE,
    }
}

fn css_family(font: &FontDescriptor) -> String {
    if font.variable {
        format!("{} Variable", font.family)
    } else {
        font.family.clone()
    }
}

/// Snippet generator bound to one selection and catalog.
pub struct InstallSnippets<'a> {
    selection: &'a SelectionState,
    catalog: &'a Catalog,
    cdn_base: &'a str,
}

impl<'a> InstallSnippets<'a> {
    pub fn new(selection: &'a SelectionState, catalog: &'a Catalog) -> Self {
        Self {
            selection,
            catalog,
            cdn_base: DEFAULT_CDN_BASE,
        }
    }

    pub fn with_cdn_base(mut self, cdn_base: &'a str) -> Self {
        self.cdn_base = cdn_base.trim_end_matches('/');
        self
    }

    fn fonts(&self) -> impl Iterator<Item = (&'a str, Option<&'a FontDescriptor>)> + '_ {
        let catalog = self.catalog;
        self.selection
            .font_ids()
            .into_iter()
            .map(move |id| (id, catalog.get(id)))
    }

    /// One `npm install` line per unique font id.
    pub fn npm_install_lines(&self) -> String {
        self.fonts()
            .map(|(id, font)| format!("npm install {}/{}", package_scope(font), id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One `import` line per unique font id.
    pub fn import_lines(&self) -> String {
        self.fonts()
            .map(|(id, font)| format!("import \"{}/{}\"", package_scope(font), id))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A `font-family` rule per role whose font resolves. Display and
    /// heading use class selectors, body targets the element.
    pub fn usage_css(&self) -> String {
        self.selection
            .roles()
            .into_iter()
            .filter_map(|(role, settings)| {
                let font = self.catalog.get(&settings.font_id)?;
                let category = if font.category.is_empty() {
                    "sans-serif"
                } else {
                    font.category.as_str()
                };
                let selector = match role {
                    fontpair_selection::Role::Body => role.to_string(),
                    _ => format!(".{role}"),
                };
                Some(format!(
                    "{selector} {{\n  font-family: '{}', {category};\n}}",
                    css_family(font)
                ))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Self-hosting-free `@font-face` blocks for every resolved font.
    pub fn cdn_css(&self) -> String {
        self.fonts()
            .filter_map(|(_, font)| font)
            .map(|font| self.cdn_blocks(font).join("\n\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn cdn_blocks(&self, font: &FontDescriptor) -> Vec<String> {
        let base_id = if font.variable {
            format!("{}:vf", font.id)
        } else {
            font.id.clone()
        };
        let family = css_family(font);

        let mut styles = vec!["normal"];
        if font.has_style("italic") {
            styles.push("italic");
        }

        let mut blocks = Vec::new();
        for style in styles {
            if font.variable {
                blocks.push(self.cdn_block(&family, style, "100 900", &base_id, "wght", "woff2-variations"));
            } else {
                for weight in &font.weights {
                    let weight = weight.to_string();
                    blocks.push(self.cdn_block(&family, style, &weight, &base_id, &weight, "woff2"));
                }
            }
        }
        blocks
    }

    fn cdn_block(
        &self,
        family: &str,
        style: &str,
        weight: &str,
        base_id: &str,
        file_weight: &str,
        format: &str,
    ) -> String {
        format!(
            "@font-face {{\n  font-family: '{family}';\n  font-style: {style};\n  font-display: swap;\n  font-weight: {weight};\n  src: url({}/{base_id}@latest/latin-{file_weight}-{style}.woff2) format('{format}');\n}}",
            self.cdn_base
        )
    }
}
