//! Modal overlays: options, share and comments.
//!
//! At most one overlay exists at a time. Dismissal is two-phase: `dismiss`
//! moves the overlay to `Closing` so the shell can animate it out, and only
//! `hide_completed` with the matching token clears it. Tokens make a late
//! completion for an overlay that was since replaced a no-op.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::generator::ItemId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayToken(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    Options,
    Share(ItemId),
    Comments(ItemId),
}

impl OverlayKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Options => "options",
            Self::Share(_) => "share",
            Self::Comments(_) => "comments",
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<ItemId> {
        match self {
            Self::Options => None,
            Self::Share(id) | Self::Comments(id) => Some(*id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayPhase {
    Open,
    Closing,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayState {
    #[default]
    Closed,
    Active {
        kind: OverlayKind,
        phase: OverlayPhase,
        token: OverlayToken,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayCoordinator {
    state: OverlayState,
    next_token: u64,
}

impl OverlayCoordinator {
    #[must_use]
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    /// The overlay currently on screen, including one that is animating out.
    #[must_use]
    pub fn active(&self) -> Option<&OverlayKind> {
        match &self.state {
            OverlayState::Closed => None,
            OverlayState::Active { kind, .. } => Some(kind),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            OverlayState::Active {
                phase: OverlayPhase::Open,
                ..
            }
        )
    }

    #[must_use]
    pub fn is_closing(&self) -> bool {
        matches!(
            self.state,
            OverlayState::Active {
                phase: OverlayPhase::Closing,
                ..
            }
        )
    }

    /// Token of the active overlay while it is open, `None` once it is closing.
    #[must_use]
    pub fn open_token(&self) -> Option<OverlayToken> {
        match &self.state {
            OverlayState::Active {
                phase: OverlayPhase::Open,
                token,
                ..
            } => Some(*token),
            _ => None,
        }
    }

    /// Shows `kind`, replacing whatever was active.
    pub fn open(&mut self, kind: OverlayKind) -> OverlayToken {
        if let Some(previous) = self.active() {
            debug!(previous = previous.name(), next = kind.name(), "replacing overlay");
        }
        self.next_token += 1;
        let token = OverlayToken(self.next_token);
        debug!(overlay = kind.name(), token = token.0, "overlay opened");
        self.state = OverlayState::Active {
            kind,
            phase: OverlayPhase::Open,
            token,
        };
        token
    }

    /// Starts the closing transition. Returns the token the shell must echo
    /// back once the overlay is hidden, or `None` if nothing is open.
    pub fn dismiss(&mut self) -> Option<OverlayToken> {
        match &mut self.state {
            OverlayState::Active { kind, phase, token } if *phase == OverlayPhase::Open => {
                *phase = OverlayPhase::Closing;
                debug!(overlay = kind.name(), token = token.0, "overlay closing");
                Some(*token)
            }
            _ => None,
        }
    }

    /// Commits a dismissal. Returns the overlay that was cleared.
    pub fn hide_completed(&mut self, token: OverlayToken) -> Option<OverlayKind> {
        let closing = matches!(
            &self.state,
            OverlayState::Active {
                phase: OverlayPhase::Closing,
                token: current,
                ..
            } if *current == token
        );
        if !closing {
            debug!(token = token.0, "ignoring stale hide completion");
            return None;
        }

        match std::mem::take(&mut self.state) {
            OverlayState::Active { kind, .. } => {
                debug!(overlay = kind.name(), token = token.0, "overlay closed");
                Some(kind)
            }
            OverlayState::Closed => None,
        }
    }
}
