pub mod attrs;
pub mod client;
pub mod diff;
pub mod normalize;
pub mod reconcile;
pub mod runstate;

pub use attrs::{AttrMap, Attrs, EntryMap};
pub use reconcile::{DesiredConfig, Reconciler, SetupOptions, SetupService};
pub use runstate::{RunningConfig, RunningConfigSource};
