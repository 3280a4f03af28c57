pub mod edit;
pub mod item;
pub mod matching;
pub mod reconcile;

pub use edit::{Edit, EditScript, Reconciliation, RowOrigin};
pub use item::Diffable;
pub use matching::DuplicatePolicy;
pub use reconcile::{reconcile, DiffAlgorithm, Reconciler};
