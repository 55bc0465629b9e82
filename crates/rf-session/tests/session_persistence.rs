//! Integration tests: store → session → mutations → reload.
//!
//! Exercises the full `rf-session` lifecycle against the in-memory store,
//! including a record saved by an earlier run (fixture) and the pruning
//! handshake with `rf-core`'s element override maps.

use rf_core::id::BreakpointId;
use rf_core::model::{DeviceClass, ResponsiveStyles};
use rf_session::{
    BreakpointPatch, BreakpointSpec, MemoryStore, ResponsiveSession, STORAGE_KEY, SettingsStore,
};

fn store_with_fixture(raw: &str) -> Box<MemoryStore> {
    let mut store = MemoryStore::new();
    store.save(STORAGE_KEY, raw).unwrap();
    Box::new(store)
}

// ─── Loading saved records ───────────────────────────────────────────────

#[test]
fn loads_a_record_saved_by_an_earlier_run() {
    let raw = include_str!("fixtures/saved_session.json");
    let session = ResponsiveSession::load(store_with_fixture(raw));

    assert_eq!(session.breakpoints().len(), 3);
    assert_eq!(session.active_id(), BreakpointId::intern("tablet"));
    assert!(session.preview_enabled());
    assert!(!session.multi_view_enabled());

    let wide = session
        .breakpoint(BreakpointId::intern("bp_oldrun_4"))
        .expect("user breakpoint survives reload");
    assert_eq!(wide.name, "Wide desktop");
    assert_eq!(wide.min_width, Some(1600.0));
    assert_eq!(wide.device, DeviceClass::Desktop);

    assert!(session.is_default(BreakpointId::intern("desktop")));
}

#[test]
fn record_without_a_default_degrades_to_first() {
    let raw = r#"{
        "breakpoints": [
            {"id": "flaky-a", "name": "A", "width": 800.0, "height": 600.0,
             "device": "Desktop", "min_width": null, "max_width": null, "is_default": false},
            {"id": "flaky-b", "name": "B", "width": 400.0, "height": 600.0,
             "device": "Mobile", "min_width": null, "max_width": 767.0, "is_default": false}
        ],
        "active": "flaky-a",
        "preview_enabled": false,
        "multi_view_enabled": false
    }"#;
    let session = ResponsiveSession::load(store_with_fixture(raw));

    assert_eq!(session.default_breakpoint().id, BreakpointId::intern("flaky-a"));
    // Matching still lands somewhere for any width
    assert_eq!(session.breakpoint_for_width(5000.0).name, "A");
}

#[test]
fn minted_ids_avoid_ids_from_the_loaded_record() {
    let raw = include_str!("fixtures/saved_session.json");
    let mut session = ResponsiveSession::load(store_with_fixture(raw));
    let existing = session.breakpoint_ids();

    let id = session.add_breakpoint(BreakpointSpec {
        name: "Fresh".to_string(),
        width: 1280.0,
        height: 800.0,
        device: DeviceClass::Desktop,
        min_width: None,
        max_width: None,
    });

    assert!(!existing.contains(&id));
}

// ─── Full lifecycle ──────────────────────────────────────────────────────

#[test]
fn lifecycle_roundtrips_through_the_store() {
    let mut session = ResponsiveSession::load(Box::new(MemoryStore::new()));

    let kiosk = session.add_breakpoint(BreakpointSpec {
        name: "Kiosk".to_string(),
        width: 1080.0,
        height: 1920.0,
        device: DeviceClass::Desktop,
        min_width: Some(1024.0),
        max_width: None,
    });
    session.update_breakpoint(
        kiosk,
        BreakpointPatch {
            max_width: Some(Some(1279.0)),
            ..Default::default()
        },
    );
    session.set_active_breakpoint(kiosk);
    session.set_multi_view_enabled(true);

    let reloaded = ResponsiveSession::load(session.into_store());

    assert_eq!(reloaded.breakpoints().len(), 4);
    assert_eq!(reloaded.active_id(), kiosk);
    assert!(reloaded.multi_view_enabled());

    let bp = reloaded.breakpoint(kiosk).expect("kiosk persisted");
    assert_eq!(bp.min_width, Some(1024.0));
    assert_eq!(bp.max_width, Some(1279.0));
    assert_eq!(reloaded.breakpoint_for_width(1100.0).id, kiosk);
}

// ─── Deletion pruning handshake ──────────────────────────────────────────

#[test]
fn deleting_a_breakpoint_prunes_element_overrides() {
    let mut session = ResponsiveSession::load(Box::new(MemoryStore::new()));
    let tablet = BreakpointId::intern("tablet");
    let mobile = BreakpointId::intern("mobile");

    // An element carrying overrides for both non-default breakpoints
    let mut element = ResponsiveStyles::new();
    element.set_style_property(tablet, "fontSize", 18.0);
    element.set_visible(mobile, false);

    assert!(session.delete_breakpoint(tablet));
    element.retain_breakpoints(&session.breakpoint_ids());

    assert!(!element.has_override(tablet));
    assert!(element.has_override(mobile));
}
