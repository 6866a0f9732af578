//! Selection state and its single update operation.
//!
//! Weight resolution on font change snaps to the closest weight the new
//! font publishes (ties go to the lighter weight); variable fonts clamp
//! into their weight axis instead.

use crate::error::SelectionError;
use crate::role::Role;
use fontpair_catalog::{Catalog, FontDescriptor};
use serde::{Deserialize, Serialize};

/// Lowest and highest weights accepted in a selection.
const MIN_WEIGHT: u16 = 1;
const MAX_WEIGHT: u16 = 1000;

/// Font, weight and size for one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSettings {
    /// Catalog id, or empty when the role is unset
    pub font_id: String,
    pub weight: u16,
    /// Pixels
    pub size: u16,
}

impl RoleSettings {
    pub fn new(font_id: impl Into<String>, weight: u16, size: u16) -> Self {
        Self {
            font_id: font_id.into(),
            weight,
            size,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.font_id.is_empty()
    }

    /// Check the weight and size bounds. Settings read back from a record
    /// bypass [`SelectionState::update`], so they are checked here.
    pub fn validate(&self) -> Result<(), SelectionError> {
        check_weight(self.weight)?;
        check_size(self.size)
    }
}

fn check_weight(weight: u16) -> Result<u16, SelectionError> {
    if (MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
        Ok(weight)
    } else {
        Err(SelectionError::InvalidWeight(weight))
    }
}

fn check_size(size: u16) -> Result<(), SelectionError> {
    if size == 0 {
        return Err(SelectionError::InvalidSize(size));
    }
    Ok(())
}

/// Replacement for exactly one field of one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FontId(String),
    Weight(u16),
    Size(u16),
}

impl FieldUpdate {
    /// Build an update from a field name and a textual value, as the UI
    /// shell hands them over. Field names accept `fontId`/`font_id`.
    pub fn parse(field: &str, value: &str) -> Result<Self, SelectionError> {
        let invalid = || SelectionError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        };
        match field.trim() {
            "fontId" | "font_id" | "font" => Ok(FieldUpdate::FontId(value.trim().to_string())),
            "weight" => value
                .trim()
                .parse()
                .map(FieldUpdate::Weight)
                .map_err(|_| invalid()),
            "size" => value
                .trim()
                .trim_end_matches("px")
                .parse()
                .map(FieldUpdate::Size)
                .map_err(|_| invalid()),
            other => Err(SelectionError::UnknownField(other.to_string())),
        }
    }
}

/// Weight to use after switching to `font`, given the previous weight.
///
/// Static fonts snap to the closest published weight by absolute distance,
/// ties broken toward the lower value. Variable fonts clamp into
/// `[min, max]` of their published weights. A font without weights keeps
/// the previous value.
pub fn resolve_weight(font: &FontDescriptor, weight: u16) -> u16 {
    if font.variable {
        return match font.weight_range() {
            Some((min, max)) => weight.clamp(min, max),
            None => weight,
        };
    }
    font.weights
        .iter()
        .copied()
        .min_by_key(|&w| (w.abs_diff(weight), w))
        .unwrap_or(weight)
}

/// The three role settings that make up the current design.
///
/// Compared structurally everywhere: favorites, preset matching and
/// derivation all treat two equal states as the same design.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionState {
    pub display: RoleSettings,
    pub heading: RoleSettings,
    pub body: RoleSettings,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            display: RoleSettings::new("bitter", 700, 48),
            heading: RoleSettings::new("inter", 600, 24),
            body: RoleSettings::new("inter", 400, 16),
        }
    }
}

impl SelectionState {
    pub fn new(display: RoleSettings, heading: RoleSettings, body: RoleSettings) -> Self {
        Self {
            display,
            heading,
            body,
        }
    }

    pub fn role(&self, role: Role) -> &RoleSettings {
        match role {
            Role::Display => &self.display,
            Role::Heading => &self.heading,
            Role::Body => &self.body,
        }
    }

    fn role_mut(&mut self, role: Role) -> &mut RoleSettings {
        match role {
            Role::Display => &mut self.display,
            Role::Heading => &mut self.heading,
            Role::Body => &mut self.body,
        }
    }

    /// Roles paired with their settings, in presentation order.
    pub fn roles(&self) -> [(Role, &RoleSettings); 3] {
        [
            (Role::Display, &self.display),
            (Role::Heading, &self.heading),
            (Role::Body, &self.body),
        ]
    }

    /// Check every role's bounds.
    pub fn validate(&self) -> Result<(), SelectionError> {
        self.roles()
            .into_iter()
            .try_for_each(|(_, settings)| settings.validate())
    }

    /// Return a new state with one field of one role replaced.
    ///
    /// No other field changes; in particular changing `FontId` does not
    /// touch the weight. Use [`SelectionState::select_font`] for a font
    /// change that also resolves the weight.
    pub fn update(&self, role: Role, update: FieldUpdate) -> Result<Self, SelectionError> {
        let mut next = self.clone();
        let settings = next.role_mut(role);
        match update {
            FieldUpdate::FontId(font_id) => settings.font_id = font_id,
            FieldUpdate::Weight(weight) => settings.weight = check_weight(weight)?,
            FieldUpdate::Size(size) => {
                check_size(size)?;
                settings.size = size;
            }
        }
        Ok(next)
    }

    /// Font picker semantics: choose `font_id` for `role` and snap the weight
    /// to what the font offers. Picking the font that is already selected
    /// clears the role instead.
    ///
    /// If the font is not in the catalog (e.g. still loading) the weight is
    /// left as is.
    pub fn select_font(&self, role: Role, font_id: &str, catalog: &Catalog) -> Self {
        if self.role(role).font_id == font_id {
            let mut next = self.clone();
            next.role_mut(role).font_id.clear();
            return next;
        }
        self.with_font(role, font_id, catalog)
    }

    /// Set `role`'s font and snap its weight, without the picker's
    /// clear-on-reselect behavior.
    pub fn with_font(&self, role: Role, font_id: &str, catalog: &Catalog) -> Self {
        let mut next = self.clone();
        let settings = next.role_mut(role);

        settings.font_id = font_id.to_string();
        if let Some(font) = catalog.get(font_id) {
            let resolved = resolve_weight(font, settings.weight);
            if resolved != settings.weight {
                log::debug!(
                    "Snapped {} weight {} -> {} for '{}'",
                    role,
                    settings.weight,
                    resolved,
                    font_id
                );
            }
            settings.weight = resolved;
        }
        next
    }

    /// Unique non-empty font ids in role order.
    pub fn font_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(3);
        for (_, settings) in self.roles() {
            if !settings.is_unset() && !ids.contains(&settings.font_id.as_str()) {
                ids.push(settings.font_id.as_str());
            }
        }
        ids
    }
}
