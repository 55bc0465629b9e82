//! The responsive editing session: breakpoint registry + view state.
//!
//! One constructor-injected state object owns the ordered registry, the
//! active breakpoint, and the preview/multi-view flags. Every mutation is
//! echoed to the injected `SettingsStore` synchronously as part of the
//! call; there is no separate save step. All operations run on the UI
//! thread and complete within the calling turn.
//!
//! Invariants held here:
//! - the registry is never empty;
//! - exactly one breakpoint carries `is_default`, and it cannot be
//!   deleted (its styles are every element's base layer);
//! - deleting or dropping the active breakpoint resets `active` to the
//!   default's id.

use crate::store::SettingsStore;
use rf_core::id::BreakpointId;
use rf_core::model::{self, Breakpoint, DeviceClass};
use rf_core::resolve::find_matching_breakpoint;
use serde::{Deserialize, Serialize};

/// Fixed storage key for the serialized session record.
pub const STORAGE_KEY: &str = "reflow.responsive.v1";

/// The three seed breakpoints: desktop (default, catch-all), tablet,
/// mobile. New workspaces start here, and `reset_to_defaults` returns here.
pub fn seed_breakpoints() -> Vec<Breakpoint> {
    vec![
        Breakpoint {
            id: BreakpointId::intern("desktop"),
            name: "Desktop".to_string(),
            width: 1440.0,
            height: 1024.0,
            device: DeviceClass::Desktop,
            min_width: None,
            max_width: None,
            is_default: true,
        },
        Breakpoint {
            id: BreakpointId::intern("tablet"),
            name: "Tablet".to_string(),
            width: 768.0,
            height: 1024.0,
            device: DeviceClass::Tablet,
            min_width: Some(768.0),
            max_width: Some(1023.0),
            is_default: false,
        },
        Breakpoint {
            id: BreakpointId::intern("mobile"),
            name: "Mobile".to_string(),
            width: 375.0,
            height: 812.0,
            device: DeviceClass::Mobile,
            min_width: None,
            max_width: Some(767.0),
            is_default: false,
        },
    ]
}

/// A breakpoint to add: everything but the id, which the registry mints.
/// Width/height are taken as given; callers own sanity of the values.
#[derive(Debug, Clone)]
pub struct BreakpointSpec {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub device: DeviceClass,
    pub min_width: Option<f32>,
    pub max_width: Option<f32>,
}

/// A shallow patch for `update_breakpoint`. `None` leaves a field alone;
/// for the bounds, `Some(None)` clears the bound.
#[derive(Debug, Clone, Default)]
pub struct BreakpointPatch {
    pub name: Option<String>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub device: Option<DeviceClass>,
    pub min_width: Option<Option<f32>>,
    pub max_width: Option<Option<f32>>,
    /// `Some(true)` promotes the target to default, clearing the flag on
    /// the previous default in the same operation. `Some(false)` aimed at
    /// the current default is ignored: the registry always carries
    /// exactly one base layer.
    pub is_default: Option<bool>,
}

/// The persisted record: registry, active id, view flags. One JSON value
/// under `STORAGE_KEY`, rewritten on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    breakpoints: Vec<Breakpoint>,
    active: BreakpointId,
    preview_enabled: bool,
    multi_view_enabled: bool,
}

pub struct ResponsiveSession {
    breakpoints: Vec<Breakpoint>,
    active: BreakpointId,
    preview_enabled: bool,
    multi_view_enabled: bool,
    store: Box<dyn SettingsStore>,
}

impl ResponsiveSession {
    /// Load session state from `store`, seeding the default registry when
    /// no record exists or the record is unreadable or empty.
    pub fn load(store: Box<dyn SettingsStore>) -> Self {
        let record = match store.load(STORAGE_KEY) {
            Ok(raw) => match serde_json::from_str::<SessionRecord>(&raw) {
                Ok(record) if !record.breakpoints.is_empty() => Some(record),
                Ok(_) => {
                    log::warn!("saved responsive session had an empty registry, reseeding");
                    None
                }
                Err(err) => {
                    log::warn!("discarding unreadable responsive session record: {err}");
                    None
                }
            },
            // First use: nothing stored yet.
            Err(_) => None,
        };

        match record {
            Some(record) => Self {
                breakpoints: record.breakpoints,
                active: record.active,
                preview_enabled: record.preview_enabled,
                multi_view_enabled: record.multi_view_enabled,
                store,
            },
            None => {
                let breakpoints = seed_breakpoints();
                let active = model::default_breakpoint(&breakpoints)
                    .expect("seed set is non-empty")
                    .id;
                Self {
                    breakpoints,
                    active,
                    preview_enabled: false,
                    multi_view_enabled: false,
                    store,
                }
            }
        }
    }

    /// Tear down the session, handing the store back to the host.
    pub fn into_store(self) -> Box<dyn SettingsStore> {
        self.store
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// All breakpoints in registry (display) order.
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn breakpoint(&self, id: BreakpointId) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| bp.id == id)
    }

    /// Ids of every registered breakpoint, for pruning element override
    /// maps after deletions.
    pub fn breakpoint_ids(&self) -> Vec<BreakpointId> {
        self.breakpoints.iter().map(|bp| bp.id).collect()
    }

    pub fn active_id(&self) -> BreakpointId {
        self.active
    }

    /// The breakpoint being edited. A dangling active id (possible via the
    /// unconditional setter) degrades to the default breakpoint.
    pub fn active_breakpoint(&self) -> &Breakpoint {
        self.breakpoints
            .iter()
            .find(|bp| bp.id == self.active)
            .unwrap_or_else(|| self.default_breakpoint())
    }

    /// The one breakpoint marked default, or the first if no flag survived
    /// external corruption of the record.
    pub fn default_breakpoint(&self) -> &Breakpoint {
        model::default_breakpoint(&self.breakpoints).expect("registry is never empty")
    }

    pub fn is_default(&self, id: BreakpointId) -> bool {
        self.breakpoint(id).is_some_and(|bp| bp.is_default)
    }

    pub fn preview_enabled(&self) -> bool {
        self.preview_enabled
    }

    pub fn multi_view_enabled(&self) -> bool {
        self.multi_view_enabled
    }

    /// The breakpoint governing a raw preview-viewport width. Total: the
    /// registry is never empty, so matching always lands somewhere.
    pub fn breakpoint_for_width(&self, width: f32) -> &Breakpoint {
        find_matching_breakpoint(&self.breakpoints, width).expect("registry is never empty")
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Mint a fresh id, append the breakpoint, persist. Returns the new id.
    pub fn add_breakpoint(&mut self, spec: BreakpointSpec) -> BreakpointId {
        // Ids in a loaded registry may come from an earlier process whose
        // counter ran ahead of ours; retry until the candidate is unused.
        let id = loop {
            let candidate = BreakpointId::unique("bp");
            if !self.breakpoints.iter().any(|bp| bp.id == candidate) {
                break candidate;
            }
        };
        self.breakpoints.push(Breakpoint {
            id,
            name: spec.name,
            width: spec.width,
            height: spec.height,
            device: spec.device,
            min_width: spec.min_width,
            max_width: spec.max_width,
            is_default: false,
        });
        self.save();
        id
    }

    /// Shallow-merge `patch` into the breakpoint matching `id`. Returns
    /// false (and changes nothing) for an unknown id.
    pub fn update_breakpoint(&mut self, id: BreakpointId, patch: BreakpointPatch) -> bool {
        let Some(idx) = self.breakpoints.iter().position(|bp| bp.id == id) else {
            log::debug!("update for unknown breakpoint {id}");
            return false;
        };

        if patch.is_default == Some(true) && !self.breakpoints[idx].is_default {
            for bp in &mut self.breakpoints {
                bp.is_default = false;
            }
            self.breakpoints[idx].is_default = true;
        }
        // `Some(false)` on the current default is dropped: demoting
        // without promoting would leave zero base layers.

        let bp = &mut self.breakpoints[idx];
        if let Some(name) = patch.name {
            bp.name = name;
        }
        if let Some(width) = patch.width {
            bp.width = width;
        }
        if let Some(height) = patch.height {
            bp.height = height;
        }
        if let Some(device) = patch.device {
            bp.device = device;
        }
        if let Some(min_width) = patch.min_width {
            bp.min_width = min_width;
        }
        if let Some(max_width) = patch.max_width {
            bp.max_width = max_width;
        }

        self.save();
        true
    }

    /// Remove a breakpoint. The default breakpoint is refused (returns
    /// false); deleting the active one resets `active` to the default's
    /// id. Element stores prune their override maps afterwards via
    /// `ResponsiveStyles::retain_breakpoints`.
    pub fn delete_breakpoint(&mut self, id: BreakpointId) -> bool {
        let Some(idx) = self.breakpoints.iter().position(|bp| bp.id == id) else {
            log::debug!("delete for unknown breakpoint {id}");
            return false;
        };
        // Guards the flagged default, and the first-breakpoint fallback
        // when no flag survived a corrupted record.
        if self.default_breakpoint().id == id {
            return false;
        }

        self.breakpoints.remove(idx);
        if self.active == id {
            self.active = self.default_breakpoint().id;
        }
        self.save();
        true
    }

    /// Reorder the registry to match `ordered`. Ids not in the registry
    /// are ignored; registry members missing from `ordered` are dropped,
    /// except the default breakpoint, which is kept at the front so the
    /// registry never loses its base layer.
    pub fn reorder_breakpoints(&mut self, ordered: &[BreakpointId]) {
        let default_id = self.default_breakpoint().id;

        let mut next: Vec<Breakpoint> = Vec::with_capacity(ordered.len());
        for id in ordered {
            if let Some(pos) = self.breakpoints.iter().position(|bp| bp.id == *id) {
                next.push(self.breakpoints.remove(pos));
            }
        }
        if let Some(pos) = self.breakpoints.iter().position(|bp| bp.id == default_id) {
            next.insert(0, self.breakpoints.remove(pos));
        }
        self.breakpoints = next;

        if !self.breakpoints.iter().any(|bp| bp.id == self.active) {
            self.active = default_id;
        }
        self.save();
    }

    /// Unconditionally set the active breakpoint id. No existence check;
    /// a dangling id degrades through `active_breakpoint`'s fallback.
    pub fn set_active_breakpoint(&mut self, id: BreakpointId) {
        self.active = id;
        self.save();
    }

    pub fn set_preview_enabled(&mut self, enabled: bool) {
        self.preview_enabled = enabled;
        self.save();
    }

    pub fn set_multi_view_enabled(&mut self, enabled: bool) {
        self.multi_view_enabled = enabled;
        self.save();
    }

    /// Replace the registry with the seed set, reset the active id to the
    /// seed default, and clear both view flags.
    pub fn reset_to_defaults(&mut self) {
        self.breakpoints = seed_breakpoints();
        self.active = self.default_breakpoint().id;
        self.preview_enabled = false;
        self.multi_view_enabled = false;
        self.save();
    }

    /// Serialize the whole record and write it through the store. Storage
    /// failures are logged and absorbed; in-memory state stays
    /// authoritative.
    fn save(&mut self) {
        let record = SessionRecord {
            breakpoints: self.breakpoints.clone(),
            active: self.active,
            preview_enabled: self.preview_enabled,
            multi_view_enabled: self.multi_view_enabled,
        };
        match serde_json::to_string(&record) {
            Ok(raw) => {
                if let Err(err) = self.store.save(STORAGE_KEY, &raw) {
                    log::warn!("failed to persist responsive session: {err}");
                }
            }
            Err(err) => log::warn!("failed to serialize responsive session: {err}"),
        }
    }
}
