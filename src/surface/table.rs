use serde::Serialize;
use tracing::warn;

use crate::core::edit::{Edit, EditScript, RowOrigin};
use crate::error::SurfaceError;
use crate::surface::{RenderSurface, RowAnimations};

/// Something the table did to its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SurfaceEvent {
    /// An animated batch update
    Batch {
        section: usize,
        deleted: Vec<usize>,
        inserted: Vec<usize>,
        moved: Vec<(usize, usize)>,
        reloaded: Vec<usize>,
        animations: RowAnimations,
    },
    /// All rows rebuilt from the data source
    FullReload { rows: usize },
}

/// In-memory single-section list surface.
///
/// The table keeps the identity key of every visible row and pulls fresh
/// rows from its data source, the same way a list control asks its data
/// source for cells after the model changed.
pub struct RowTable<K> {
    rows: Vec<K>,
    source: Box<dyn Fn() -> Vec<K>>,
    events: Vec<SurfaceEvent>,
}

impl<K: Clone> RowTable<K> {
    /// Create an empty table backed by `source`. Call
    /// [`RenderSurface::full_reload`] to load the initial rows.
    pub fn new(source: impl Fn() -> Vec<K> + 'static) -> Self {
        Self {
            rows: Vec::new(),
            source: Box::new(source),
            events: Vec::new(),
        }
    }

    /// Visible rows, top to bottom
    pub fn rows(&self) -> &[K] {
        &self.rows
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn reload_from_source(&mut self) {
        self.rows = (self.source)();
        self.events.push(SurfaceEvent::FullReload {
            rows: self.rows.len(),
        });
    }
}

impl<K: Clone> RenderSurface for RowTable<K> {
    fn apply_edits(
        &mut self,
        section: usize,
        script: &EditScript,
        animations: &RowAnimations,
        update_data: &mut dyn FnMut(),
    ) -> Result<(), SurfaceError> {
        if section != 0 {
            return Err(SurfaceError::NoSuchSection {
                section,
                sections: 1,
            });
        }

        update_data();
        let fresh = (self.source)();

        let layout = match script.layout(self.rows.len(), fresh.len()) {
            Ok(layout) => layout,
            Err(e) => {
                // The model already changed; resync rather than show stale rows.
                warn!(error = %e, "edit script does not fit the table, reloading");
                self.reload_from_source();
                return Err(e.into());
            }
        };

        let rows: Vec<K> = layout
            .into_iter()
            .map(|origin| match origin {
                RowOrigin::Old(i) => self.rows[i].clone(),
                RowOrigin::New(j) => fresh[j].clone(),
            })
            .collect();
        self.rows = rows;

        let mut deleted = Vec::new();
        let mut inserted = Vec::new();
        let mut moved = Vec::new();
        let mut reloaded = Vec::new();
        for edit in script {
            match *edit {
                Edit::Delete { index } => deleted.push(index),
                Edit::Insert { index } => inserted.push(index),
                Edit::Move { from, to } => moved.push((from, to)),
                Edit::Replace { index } => reloaded.push(index),
            }
        }

        self.events.push(SurfaceEvent::Batch {
            section,
            deleted,
            inserted,
            moved,
            reloaded,
            animations: *animations,
        });

        Ok(())
    }

    fn full_reload(&mut self) {
        self.reload_from_source();
    }
}
