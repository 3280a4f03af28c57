use serde::{Deserialize, Serialize};

/// Visual transition used when rows change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowAnimation {
    /// Let the surface pick
    #[default]
    Automatic,
    Fade,
    Left,
    Right,
    Top,
    Bottom,
    Middle,
    /// Change rows without a transition
    None,
}

/// Animation choice per operation class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowAnimations {
    pub insertion: RowAnimation,
    pub deletion: RowAnimation,
    pub replacement: RowAnimation,
}

impl RowAnimations {
    /// Same animation for every class
    pub fn uniform(animation: RowAnimation) -> Self {
        Self {
            insertion: animation,
            deletion: animation,
            replacement: animation,
        }
    }
}
