//! Rendering surfaces and the step that applies reconciliations to them.

pub mod animation;
pub mod table;

pub use animation::{RowAnimation, RowAnimations};
pub use table::{RowTable, SurfaceEvent};

use std::cell::Cell;

use tracing::{debug, warn};

use crate::config::RowdiffConfig;
use crate::core::edit::{EditScript, Reconciliation};
use crate::core::item::Diffable;
use crate::core::reconcile::Reconciler;
use crate::error::{ReloadError, SurfaceError};

/// A list control that displays rows and can update them incrementally.
///
/// Methods take `&mut self`: a surface handles one update at a time, and a
/// new reconciliation can only start once the previous one returned.
pub trait RenderSurface {
    /// Apply `script` to the rows of `section`.
    ///
    /// The surface must call `update_data` exactly once, before it commits
    /// the row changes, so that its data source already reflects the new
    /// sequence when fresh rows are requested. Returning marks completion.
    fn apply_edits(
        &mut self,
        section: usize,
        script: &EditScript,
        animations: &RowAnimations,
        update_data: &mut dyn FnMut(),
    ) -> Result<(), SurfaceError>;

    /// Discard all rows and rebuild them from the data source
    fn full_reload(&mut self);
}

/// Settings for [`reload_rows`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadOptions {
    pub section: usize,
    pub reconciler: Reconciler,
    pub animations: RowAnimations,
}

impl ReloadOptions {
    pub fn from_config(config: &RowdiffConfig) -> Self {
        Self {
            section: 0,
            reconciler: config.diff.reconciler(),
            animations: config.animations,
        }
    }

    pub fn with_section(mut self, section: usize) -> Self {
        self.section = section;
        self
    }
}

/// Reconcile `old` against `new` and bring `surface` up to date.
///
/// `update_data` makes the backing model match `new`. It runs exactly once
/// whenever reconciliation succeeds: inside the surface's batch update on the
/// incremental path, or right before a full reload when either side is empty.
/// When reconciliation fails, neither the model nor the surface is touched.
/// When the surface rejects the batch, the data step still runs once and the
/// surface is fully reloaded before the error is returned.
pub fn reload_rows<S, T>(
    surface: &mut S,
    old: &[T],
    new: &[T],
    options: &ReloadOptions,
    update_data: &mut dyn FnMut(),
) -> Result<Reconciliation, ReloadError>
where
    S: RenderSurface + ?Sized,
    T: Diffable,
{
    let reconciliation = options.reconciler.reconcile(old, new)?;

    match &reconciliation {
        Reconciliation::Incremental(script) => {
            let called = Cell::new(false);
            let mut once = || {
                if !called.replace(true) {
                    update_data();
                }
            };
            let result = surface.apply_edits(options.section, script, &options.animations, &mut once);
            if !called.get() {
                warn!(section = options.section, "surface did not run the data update, running it now");
                once();
            }
            if let Err(e) = result {
                // The model now matches `new`; rebuild rows so the surface does too.
                warn!(section = options.section, error = %e, "batch update failed, reloading");
                surface.full_reload();
                return Err(e.into());
            }
        }
        Reconciliation::Reload => {
            update_data();
            debug!(section = options.section, "full reload");
            surface.full_reload();
        }
    }

    Ok(reconciliation)
}
