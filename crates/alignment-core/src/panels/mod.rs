//! Feature panels - each owns private sub-state and proposes updates
//!
//! Panels never mutate game state. They read the current snapshot, keep
//! their own timers and prompts, and hand back `StateUpdate`s for the
//! session to submit.

mod cosmic;
mod decisions;
mod dialogue;
mod resources;
mod technology;

pub use cosmic::*;
pub use decisions::*;
pub use dialogue::*;
pub use resources::*;
pub use technology::*;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PanelKind {
    Decisions,
    Resources,
    Technology,
    Dialogue,
    Cosmic,
}

impl PanelKind {
    pub const ALL: [PanelKind; 5] = [
        PanelKind::Decisions,
        PanelKind::Resources,
        PanelKind::Technology,
        PanelKind::Dialogue,
        PanelKind::Cosmic,
    ];

    /// Phase at which the panel appears.
    pub fn min_phase(self) -> u8 {
        match self {
            PanelKind::Decisions => 1,
            PanelKind::Resources => 2,
            PanelKind::Technology => 3,
            PanelKind::Dialogue => 4,
            PanelKind::Cosmic => 5,
        }
    }

    pub fn is_visible(self, phase: u8) -> bool {
        phase >= self.min_phase()
    }

    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Decisions => "decision engine",
            PanelKind::Resources => "resource management",
            PanelKind::Technology => "technology tree",
            PanelKind::Dialogue => "philosophical dialogue",
            PanelKind::Cosmic => "cosmic expansion",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panels_appear_in_order() {
        let visible: Vec<usize> = (0..=6u8)
            .map(|p| PanelKind::ALL.iter().filter(|k| k.is_visible(p)).count())
            .collect();
        assert_eq!(visible, vec![0, 1, 2, 3, 4, 5, 5]);
    }
}
