//! Applying derived styles to a document.
//!
//! [`StyleSurface`] is the seam to whatever hosts the rendered page. The
//! [`StyleInjector`] owns one marked rule block on that surface: every
//! apply replaces it (removal first, then insertion) and teardown removes
//! it. Variables it sets are left in place on teardown.

use crate::derive::DerivedStyle;
use fontpair_config::StyleConfig;
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::sync::Arc;

/// A document that can host style blocks and root-level properties.
pub trait StyleSurface {
    /// Remove every block tagged with `marker`. Returns how many were removed.
    fn remove_blocks(&mut self, marker: &str) -> usize;

    /// Append a block tagged with `marker`.
    fn insert_block(&mut self, marker: &str, css: &str);

    /// Set a property on the document-wide style scope, replacing any
    /// previous value.
    fn set_property(&mut self, name: &str, value: &str);

    /// Number of blocks tagged with `marker`.
    fn block_count(&self, marker: &str) -> usize;

    /// Swap all blocks tagged with `marker` for a single new one.
    fn replace_block(&mut self, marker: &str, css: &str) {
        self.remove_blocks(marker);
        self.insert_block(marker, css);
    }
}

/// One stylesheet block in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleBlock {
    /// `None` for blocks the injector does not own
    pub marker: Option<String>,
    pub css: String,
}

/// In-memory document: head blocks plus `:root` properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<StyleBlock>,
    properties: Vec<(String, String)>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block that belongs to some other part of the page.
    pub fn add_block(&mut self, css: impl Into<String>) {
        self.blocks.push(StyleBlock {
            marker: None,
            css: css.into(),
        });
    }

    pub fn blocks(&self) -> &[StyleBlock] {
        &self.blocks
    }

    /// Blocks tagged with `marker`, in document order.
    pub fn marked_blocks<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a StyleBlock> {
        self.blocks
            .iter()
            .filter(move |b| b.marker.as_deref() == Some(marker))
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Serialize the document as one stylesheet: every block in order,
    /// followed by a `:root` rule carrying the properties.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&block.css);
            out.push_str("\n\n");
        }
        if !self.properties.is_empty() {
            out.push_str(":root {\n");
            for (name, value) in &self.properties {
                let _ = writeln!(out, "  {name}: {value};");
            }
            out.push_str("}\n");
        }
        out
    }
}

impl StyleSurface for Document {
    fn remove_blocks(&mut self, marker: &str) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.marker.as_deref() != Some(marker));
        before - self.blocks.len()
    }

    fn insert_block(&mut self, marker: &str, css: &str) {
        self.blocks.push(StyleBlock {
            marker: Some(marker.to_string()),
            css: css.to_string(),
        });
    }

    fn set_property(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    fn block_count(&self, marker: &str) -> usize {
        self.marked_blocks(marker).count()
    }
}

/// A document shared between the injector and whoever renders it.
pub type SharedDocument = Arc<Mutex<Document>>;

impl StyleSurface for SharedDocument {
    fn remove_blocks(&mut self, marker: &str) -> usize {
        self.lock().remove_blocks(marker)
    }

    fn insert_block(&mut self, marker: &str, css: &str) {
        self.lock().insert_block(marker, css)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.lock().set_property(name, value)
    }

    fn block_count(&self, marker: &str) -> usize {
        self.lock().block_count(marker)
    }

    // Hold the lock across removal and insertion so readers never observe
    // the gap between them.
    fn replace_block(&mut self, marker: &str, css: &str) {
        let mut doc = self.lock();
        doc.remove_blocks(marker);
        doc.insert_block(marker, css);
    }
}

/// Keeps exactly one marked block of font-face rules on a surface.
///
/// The block is removed on [`teardown`](StyleInjector::teardown) and when
/// the injector is dropped.
pub struct StyleInjector<S: StyleSurface> {
    surface: S,
    marker: String,
    mounted: bool,
}

impl<S: StyleSurface> StyleInjector<S> {
    pub fn new(surface: S, marker: impl Into<String>) -> Self {
        Self {
            surface,
            marker: marker.into(),
            mounted: false,
        }
    }

    pub fn from_config(surface: S, config: &StyleConfig) -> Self {
        Self::new(surface, config.marker.clone())
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Replace the marked block with `style`'s rules and set its variables.
    /// Unmarked blocks and unrelated properties are left alone.
    pub fn apply(&mut self, style: &DerivedStyle) {
        self.surface.replace_block(&self.marker, &style.css());
        for (name, value) in style.assignments() {
            self.surface.set_property(&name, &value);
        }
        self.mounted = true;
        log::debug!(
            "Applied {} font-face rules and {} roles",
            style.font_faces.len(),
            style.variables.len()
        );
    }

    /// Remove the marked block. Safe to call more than once.
    pub fn teardown(&mut self) {
        let removed = self.surface.remove_blocks(&self.marker);
        if removed > 0 {
            log::debug!("Removed {} style block(s) marked '{}'", removed, self.marker);
        }
        self.mounted = false;
    }
}

impl<S: StyleSurface> Drop for StyleInjector<S> {
    fn drop(&mut self) {
        if self.mounted {
            self.teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::{DEFAULT_CDN_BASE, derive_with_cdn};
    use fontpair_catalog::{Catalog, FontDescriptor};
    use fontpair_selection::builtin_presets;

    const MARKER: &str = "data-fontsource";

    fn derived(preset: usize) -> DerivedStyle {
        let catalog = Catalog::new(vec![
            FontDescriptor::new("bitter", "Bitter").with_weights(&[400, 700]),
            FontDescriptor::new("inter", "Inter").variable(),
            FontDescriptor::new("sora", "Sora").variable(),
            FontDescriptor::new("geist", "Geist").with_weights(&[400, 600]),
        ]);
        derive_with_cdn(&builtin_presets()[preset], &catalog, DEFAULT_CDN_BASE)
    }

    #[test]
    fn test_apply_leaves_exactly_one_block() {
        let mut injector = StyleInjector::new(Document::new(), MARKER);
        injector.apply(&derived(0));
        injector.apply(&derived(1));
        injector.apply(&derived(1));

        assert_eq!(injector.surface().block_count(MARKER), 1);
        let css = &injector.surface().marked_blocks(MARKER).next().unwrap().css;
        assert!(css.contains("'Sora'"));
        assert!(!css.contains("'Bitter'"));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut injector = StyleInjector::new(Document::new(), MARKER);
        injector.apply(&derived(1));
        let once = injector.surface().clone();
        injector.apply(&derived(1));
        assert_eq!(injector.surface(), &once);
    }

    #[test]
    fn test_unrelated_styling_untouched() {
        let mut doc = Document::new();
        doc.add_block("body { margin: 0; }");
        doc.set_property("--accent", "tomato");

        let mut injector = StyleInjector::new(doc, MARKER);
        injector.apply(&derived(0));
        injector.teardown();

        let doc = injector.surface();
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.blocks()[0].css, "body { margin: 0; }");
        assert_eq!(doc.property("--accent"), Some("tomato"));
    }

    #[test]
    fn test_variables_set_on_root() {
        let mut injector = StyleInjector::new(Document::new(), MARKER);
        injector.apply(&derived(1));
        let doc = injector.surface();
        assert_eq!(doc.property("--font-display"), Some("'Sora', sans-serif"));
        assert_eq!(doc.property("--font-display-weight"), Some("700"));
        assert_eq!(doc.property("--font-display-size"), Some("48px"));
        assert_eq!(doc.property("--font-heading"), Some("'Geist', sans-serif"));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let mut injector = StyleInjector::new(Document::new(), MARKER);
        injector.apply(&derived(0));
        injector.teardown();
        injector.teardown();
        assert_eq!(injector.surface().block_count(MARKER), 0);
        assert!(!injector.is_mounted());
    }

    #[test]
    fn test_drop_tears_down_shared_document() {
        let doc: SharedDocument = Arc::new(Mutex::new(Document::new()));
        {
            let mut injector = StyleInjector::new(Arc::clone(&doc), MARKER);
            injector.apply(&derived(0));
            assert_eq!(doc.lock().block_count(MARKER), 1);
        }
        assert_eq!(doc.lock().block_count(MARKER), 0);
        // Variables outlive the block
        assert!(doc.lock().property("--font-display").is_some());
    }

    #[test]
    fn test_render_emits_blocks_then_root() {
        let mut doc = Document::new();
        doc.insert_block(MARKER, "@font-face {}");
        doc.set_property("--font-body-size", "16px");
        doc.set_property("--font-body-size", "18px");
        assert_eq!(doc.render(), "@font-face {}\n\n:root {\n  --font-body-size: 18px;\n}\n");
    }
}
