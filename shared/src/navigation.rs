use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::feed::FeedKind;
use crate::generator::{Item, ItemId};

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationError {
    #[error("invalid transition: {action} while {state}")]
    InvalidTransition { action: String, state: String },

    #[error("item {id} is not in the {} feed", .feed.as_str())]
    UnknownItem { feed: FeedKind, id: ItemId },
}

impl NavigationError {
    pub fn invalid(action: impl Into<String>, state: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            state: state.into(),
        }
    }
}

/// List or detail. The detail keeps its own copy of the item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationState {
    #[default]
    List,
    Detail(Item),
}

impl NavigationState {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Detail(_) => "detail",
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Item> {
        match self {
            Self::List => None,
            Self::Detail(item) => Some(item),
        }
    }

    #[must_use]
    pub fn is_detail(&self) -> bool {
        matches!(self, Self::Detail(_))
    }

    /// The system back gesture belongs to the app only while a detail is open.
    #[must_use]
    pub fn intercepts_back(&self) -> bool {
        self.is_detail()
    }

    /// Shows `item`. From a detail this replaces the current target.
    pub fn select(&mut self, item: Item) {
        if let Self::Detail(current) = self {
            debug!(from = %current.id, to = %item.id, "replacing detail target");
        } else {
            debug!(id = %item.id, "opening detail");
        }
        *self = Self::Detail(item);
    }

    /// Returns to the list. `false` when already there.
    pub fn back(&mut self) -> bool {
        match self {
            Self::List => false,
            Self::Detail(item) => {
                debug!(id = %item.id, "closing detail");
                *self = Self::List;
                true
            }
        }
    }
}
