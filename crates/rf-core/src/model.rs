//! Breakpoint and responsive-override data model.
//!
//! Every canvas element carries a base appearance plus an optional
//! `ResponsiveStyles` map of per-breakpoint override patches. Overrides are
//! sparse: a key that is absent inherits from the base layer, which is what
//! the element looks like at the default breakpoint. The registry itself
//! (ordering, active breakpoint, persistence) lives in `rf-session`; this
//! module owns only the shapes.

use crate::id::BreakpointId;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

// ─── Breakpoints ─────────────────────────────────────────────────────────

/// UI grouping tag for a breakpoint (which icon it gets in the toolbar).
/// No behavioral effect; matching is driven by the width bounds alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

/// A named viewport class with target editing dimensions and an optional
/// inclusive width range saying which real viewport widths it governs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub id: BreakpointId,

    /// Display name ("Desktop", "Wide tablet", ...).
    pub name: String,

    /// Editing viewport width used while this breakpoint is active.
    pub width: f32,
    /// Editing viewport height used while this breakpoint is active.
    pub height: f32,

    pub device: DeviceClass,

    /// Inclusive lower bound on governed viewport widths.
    pub min_width: Option<f32>,
    /// Inclusive upper bound on governed viewport widths.
    pub max_width: Option<f32>,

    /// The base layer. Exactly one breakpoint per registry carries this
    /// flag, and that breakpoint cannot be deleted.
    pub is_default: bool,
}

impl Breakpoint {
    /// The `min_width` used for specificity ordering; an absent bound
    /// sorts as zero (least specific).
    pub fn effective_min_width(&self) -> f32 {
        self.min_width.unwrap_or(0.0)
    }
}

/// The one breakpoint marked default, or the first breakpoint when no flag
/// survived (corrupted or hand-edited records). `None` only for an empty
/// slice.
pub fn default_breakpoint(breakpoints: &[Breakpoint]) -> Option<&Breakpoint> {
    breakpoints
        .iter()
        .find(|bp| bp.is_default)
        .or_else(|| breakpoints.first())
}

// ─── Style values ────────────────────────────────────────────────────────

/// A free-form style value. Styles are open key/value maps rather than a
/// closed property set: the editor stores whatever paint attributes the
/// host panels produce, keyed camelCase (`fontSize`, `backgroundColor`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<&str> for StyleValue {
    fn from(s: &str) -> Self {
        StyleValue::Text(s.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(s: String) -> Self {
        StyleValue::Text(s)
    }
}

/// An element's paint styles (base layer or override patch).
pub type StyleMap = HashMap<String, StyleValue>;

/// Shallow-merge `patch` into `dst`, patch values winning key-by-key.
/// Keys absent from `patch` are left alone.
pub fn merge_styles(dst: &mut StyleMap, patch: &StyleMap) {
    for (key, value) in patch {
        dst.insert(key.clone(), value.clone());
    }
}

// ─── Geometry overrides ──────────────────────────────────────────────────

/// An element position override (canvas coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One axis of a size override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// Fixed pixel size.
    Px(f32),
    /// Size to content.
    Auto,
    /// Stretch to the parent.
    Fill,
}

// Serialized as a bare number or the literal "auto"/"fill", the shape the
// host editor stores.
impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Px(v) => serializer.serialize_f32(*v),
            Dimension::Auto => serializer.serialize_str("auto"),
            Dimension::Fill => serializer.serialize_str("fill"),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DimensionVisitor;

        impl Visitor<'_> for DimensionVisitor {
            type Value = Dimension;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, \"auto\", or \"fill\"")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v as f32))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v as f32))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Dimension, E> {
                Ok(Dimension::Px(v as f32))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Dimension, E> {
                match v {
                    "auto" => Ok(Dimension::Auto),
                    "fill" => Ok(Dimension::Fill),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(DimensionVisitor)
    }
}

/// An element size override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

// ─── Per-breakpoint overrides ────────────────────────────────────────────

/// A sparse patch applied on top of an element's base appearance while one
/// breakpoint governs the viewport.
///
/// `position`, `size`, and `visible` affect layout and are applied by the
/// caller's layout machinery; `styles` holds the paint keys merged by the
/// resolver. An absent key or `None` field always means "inherit from the
/// base", never "reset".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakpointOverride {
    pub styles: StyleMap,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub visible: Option<bool>,
}

impl BreakpointOverride {
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
            && self.position.is_none()
            && self.size.is_none()
            && self.visible.is_none()
    }
}

/// Per-element map from breakpoint id to override patch.
///
/// Created empty when an element is created, destroyed with it. The default
/// breakpoint never gets an entry: its appearance IS the element's base
/// style, and the editing UI only routes edits here while a non-default
/// breakpoint is active. Records that become empty are dropped, so the map
/// stays a sparse set of real deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    overrides: HashMap<BreakpointId, BreakpointOverride>,
}

impl ResponsiveStyles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// The override patch for `breakpoint`, if the element carries one.
    pub fn override_for(&self, breakpoint: BreakpointId) -> Option<&BreakpointOverride> {
        self.overrides.get(&breakpoint)
    }

    pub fn has_override(&self, breakpoint: BreakpointId) -> bool {
        self.overrides.contains_key(&breakpoint)
    }

    /// Breakpoints this element overrides (for UI badges). Unordered.
    pub fn breakpoint_ids(&self) -> impl Iterator<Item = BreakpointId> + '_ {
        self.overrides.keys().copied()
    }

    fn entry(&mut self, breakpoint: BreakpointId) -> &mut BreakpointOverride {
        self.overrides.entry(breakpoint).or_default()
    }

    /// Drop the record for `breakpoint` if it no longer carries anything.
    fn prune(&mut self, breakpoint: BreakpointId) {
        if self
            .overrides
            .get(&breakpoint)
            .is_some_and(|patch| patch.is_empty())
        {
            self.overrides.remove(&breakpoint);
        }
    }

    pub fn set_style_property(
        &mut self,
        breakpoint: BreakpointId,
        key: impl Into<String>,
        value: impl Into<StyleValue>,
    ) {
        self.entry(breakpoint).styles.insert(key.into(), value.into());
    }

    /// Remove one style key from the patch. Returns true if the key was
    /// present. A record left empty is dropped.
    pub fn clear_style_property(&mut self, breakpoint: BreakpointId, key: &str) -> bool {
        let removed = match self.overrides.get_mut(&breakpoint) {
            Some(patch) => patch.styles.remove(key).is_some(),
            None => false,
        };
        self.prune(breakpoint);
        removed
    }

    pub fn set_position(&mut self, breakpoint: BreakpointId, position: Position) {
        self.entry(breakpoint).position = Some(position);
    }

    pub fn set_size(&mut self, breakpoint: BreakpointId, size: Size) {
        self.entry(breakpoint).size = Some(size);
    }

    pub fn set_visible(&mut self, breakpoint: BreakpointId, visible: bool) {
        self.entry(breakpoint).visible = Some(visible);
    }

    pub fn clear_position(&mut self, breakpoint: BreakpointId) -> bool {
        let cleared = match self.overrides.get_mut(&breakpoint) {
            Some(patch) => patch.position.take().is_some(),
            None => false,
        };
        self.prune(breakpoint);
        cleared
    }

    pub fn clear_size(&mut self, breakpoint: BreakpointId) -> bool {
        let cleared = match self.overrides.get_mut(&breakpoint) {
            Some(patch) => patch.size.take().is_some(),
            None => false,
        };
        self.prune(breakpoint);
        cleared
    }

    pub fn clear_visible(&mut self, breakpoint: BreakpointId) -> bool {
        let cleared = match self.overrides.get_mut(&breakpoint) {
            Some(patch) => patch.visible.take().is_some(),
            None => false,
        };
        self.prune(breakpoint);
        cleared
    }

    /// Remove the whole patch for `breakpoint`. Returns true if one existed.
    pub fn remove_override(&mut self, breakpoint: BreakpointId) -> bool {
        self.overrides.remove(&breakpoint).is_some()
    }

    /// Keep only overrides whose breakpoint still exists in the registry.
    /// The element store calls this after a breakpoint is deleted.
    pub fn retain_breakpoints(&mut self, ids: &[BreakpointId]) {
        self.overrides.retain(|id, _| ids.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bp(name: &str) -> BreakpointId {
        BreakpointId::intern(name)
    }

    #[test]
    fn merge_styles_patch_wins_key_by_key() {
        let mut base: StyleMap = HashMap::from([
            ("color".to_string(), StyleValue::from("#111111")),
            ("fontSize".to_string(), StyleValue::from(14.0)),
        ]);
        let patch: StyleMap = HashMap::from([
            ("fontSize".to_string(), StyleValue::from(24.0)),
            ("fontWeight".to_string(), StyleValue::from(700.0)),
        ]);

        merge_styles(&mut base, &patch);

        assert_eq!(base["color"], StyleValue::from("#111111"));
        assert_eq!(base["fontSize"], StyleValue::from(24.0));
        assert_eq!(base["fontWeight"], StyleValue::from(700.0));
    }

    #[test]
    fn dimension_serde_shapes() {
        let json = serde_json::to_string(&Size {
            width: Dimension::Px(240.0),
            height: Dimension::Auto,
        })
        .unwrap();
        assert_eq!(json, r#"{"width":240.0,"height":"auto"}"#);

        let size: Size = serde_json::from_str(r#"{"width":"fill","height":56}"#).unwrap();
        assert_eq!(size.width, Dimension::Fill);
        assert_eq!(size.height, Dimension::Px(56.0));
    }

    #[test]
    fn dimension_rejects_unknown_keyword() {
        let result: Result<Dimension, _> = serde_json::from_str(r#""stretch""#);
        assert!(result.is_err());
    }

    #[test]
    fn style_value_serde_is_bare_scalar() {
        assert_eq!(
            serde_json::to_string(&StyleValue::from(12.0)).unwrap(),
            "12.0"
        );
        assert_eq!(
            serde_json::to_string(&StyleValue::from("#FF00AA")).unwrap(),
            "\"#FF00AA\""
        );
        let v: StyleValue = serde_json::from_str("3.5").unwrap();
        assert_eq!(v, StyleValue::Number(3.5));
    }

    #[test]
    fn clearing_last_key_drops_the_record() {
        let tablet = bp("tablet-prune");
        let mut rs = ResponsiveStyles::new();
        rs.set_style_property(tablet, "opacity", 0.5);
        assert!(rs.has_override(tablet));

        assert!(rs.clear_style_property(tablet, "opacity"));
        assert!(!rs.has_override(tablet), "empty record should be pruned");
        assert!(rs.is_empty());
    }

    #[test]
    fn clearing_missing_key_reports_false() {
        let tablet = bp("tablet-miss");
        let mut rs = ResponsiveStyles::new();
        rs.set_visible(tablet, false);

        assert!(!rs.clear_style_property(tablet, "opacity"));
        // Record still holds the visibility override
        assert!(rs.has_override(tablet));
    }

    #[test]
    fn retain_breakpoints_prunes_deleted() {
        let tablet = bp("tablet-retain");
        let mobile = bp("mobile-retain");
        let mut rs = ResponsiveStyles::new();
        rs.set_style_property(tablet, "color", "#FFF");
        rs.set_position(mobile, Position { x: 4.0, y: 8.0 });

        rs.retain_breakpoints(&[tablet]);

        assert!(rs.has_override(tablet));
        assert!(!rs.has_override(mobile));
    }

    #[test]
    fn default_breakpoint_falls_back_to_first() {
        let none_marked = vec![
            Breakpoint {
                id: bp("a"),
                name: "A".into(),
                width: 800.0,
                height: 600.0,
                device: DeviceClass::Desktop,
                min_width: None,
                max_width: None,
                is_default: false,
            },
            Breakpoint {
                id: bp("b"),
                name: "B".into(),
                width: 400.0,
                height: 600.0,
                device: DeviceClass::Mobile,
                min_width: None,
                max_width: Some(767.0),
                is_default: false,
            },
        ];
        assert_eq!(default_breakpoint(&none_marked).unwrap().id, bp("a"));
        assert!(default_breakpoint(&[]).is_none());
    }
}
