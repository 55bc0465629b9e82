pub mod emitter;
pub mod id;
pub mod model;
pub mod resolve;

pub use emitter::generate_media_queries;
pub use id::BreakpointId;
pub use model::*;
pub use resolve::{
    LayoutPatch, find_matching_breakpoint, matches_breakpoint, resolve_layout_patch,
    resolve_styles, sort_for_matching,
};
