pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod surface;
pub mod utils;

pub use crate::config::RowdiffConfig;
pub use crate::core::{
    reconcile, DiffAlgorithm, Diffable, DuplicatePolicy, Edit, EditScript, Reconciler,
    Reconciliation,
};
pub use crate::error::{LayoutError, ReconcileError, ReloadError, SurfaceError};
pub use crate::surface::{
    reload_rows, ReloadOptions, RenderSurface, RowAnimation, RowAnimations, RowTable,
};
