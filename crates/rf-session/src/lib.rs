pub mod session;
pub mod store;

pub use session::{
    BreakpointPatch, BreakpointSpec, ResponsiveSession, STORAGE_KEY, seed_breakpoints,
};
pub use store::{FileStore, MemoryStore, SettingsStore};
