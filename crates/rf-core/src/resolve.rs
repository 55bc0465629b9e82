//! Style resolution: override layering and breakpoint matching.
//!
//! Pure functions over the model, with no registry handle and no storage,
//! so the rendering layer calls them once per element per pass and tests
//! drive them directly. Matching must be deterministic across repeated calls:
//! ordering uses a stable sort and `total_cmp`, so even equal or malformed
//! (NaN) bounds order the same way every time.

use crate::id::BreakpointId;
use crate::model::{
    Breakpoint, Position, ResponsiveStyles, Size, StyleMap, default_breakpoint, merge_styles,
};
use smallvec::SmallVec;

/// The resolved geometry/visibility bucket for one breakpoint. These govern
/// layout rather than paint, and the caller applies them through its own
/// layout machinery; they never end up in the resolved style map.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutPatch {
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub visible: Option<bool>,
}

/// Effective paint styles for `breakpoint`: a copy of `base` with the
/// override's style keys shallow-merged on top, override values winning
/// key-by-key.
///
/// `base` is never mutated. With no override entry for `breakpoint` the
/// result is content-equal to `base`.
pub fn resolve_styles(
    base: &StyleMap,
    responsive: &ResponsiveStyles,
    breakpoint: BreakpointId,
) -> StyleMap {
    let mut resolved = base.clone();
    if let Some(patch) = responsive.override_for(breakpoint) {
        merge_styles(&mut resolved, &patch.styles);
    }
    resolved
}

/// The position/size/visibility overrides for `breakpoint`, all `None`
/// when the element has no entry for it.
pub fn resolve_layout_patch(
    responsive: &ResponsiveStyles,
    breakpoint: BreakpointId,
) -> LayoutPatch {
    match responsive.override_for(breakpoint) {
        Some(patch) => LayoutPatch {
            position: patch.position,
            size: patch.size,
            visible: patch.visible,
        },
        None => LayoutPatch::default(),
    }
}

/// Whether `breakpoint` governs a viewport of `width`. Bounds are
/// inclusive; a breakpoint with neither bound matches every width (the
/// usual shape of a catch-all default).
pub fn matches_breakpoint(breakpoint: &Breakpoint, width: f32) -> bool {
    if let Some(min) = breakpoint.min_width
        && width < min
    {
        return false;
    }
    if let Some(max) = breakpoint.max_width
        && width > max
    {
        return false;
    }
    true
}

/// Breakpoints in matching order: effective `min_width` descending, ties
/// keeping registry order. Registry order is a UI concern only; the
/// specificity order produced here is what matching and emission use.
pub fn sort_for_matching(breakpoints: &[Breakpoint]) -> SmallVec<[&Breakpoint; 8]> {
    let mut sorted: SmallVec<[&Breakpoint; 8]> = breakpoints.iter().collect();
    // Stable sort; total_cmp keeps NaN bounds from flipping the order
    // between calls.
    sorted.sort_by(|a, b| b.effective_min_width().total_cmp(&a.effective_min_width()));
    sorted
}

/// The most specific breakpoint governing `width`, falling back to the
/// default (or first) breakpoint so matching never comes up empty.
/// `None` only for an empty slice.
pub fn find_matching_breakpoint(breakpoints: &[Breakpoint], width: f32) -> Option<&Breakpoint> {
    let sorted = sort_for_matching(breakpoints);
    if let Some(found) = sorted
        .iter()
        .copied()
        .find(|bp| matches_breakpoint(bp, width))
    {
        return Some(found);
    }
    log::debug!("no breakpoint matches width {width}, falling back to default");
    default_breakpoint(breakpoints)
}
