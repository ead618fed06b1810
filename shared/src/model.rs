use serde::{Deserialize, Serialize};

use crate::comments::{flip_like, CommentComposer, CommentThread};
use crate::feed::{FeedController, FeedKind};
use crate::navigation::NavigationState;
use crate::overlay::OverlayCoordinator;
use crate::scroll::ScrollObserver;
use crate::{AppError, PIN_BASE_LIKE_COUNT};

/// Top-level tabs. Only Home hosts the feed.
#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    #[default]
    Home,
    Search,
    Create,
    Inbox,
    Profile,
}

impl Destination {
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::Search,
        Self::Create,
        Self::Inbox,
        Self::Profile,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Search => "Search",
            Self::Create => "Create",
            Self::Inbox => "Inbox",
            Self::Profile => "Profile",
        }
    }
}

/// Like toggle of the pin shown in the detail view.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinLikes {
    pub count: u32,
    pub liked: bool,
}

impl Default for PinLikes {
    fn default() -> Self {
        Self {
            count: PIN_BASE_LIKE_COUNT,
            liked: false,
        }
    }
}

impl PinLikes {
    pub fn toggle(&mut self) {
        flip_like(&mut self.liked, &mut self.count);
    }
}

/// A pagination controller and the observer watching its grid.
#[derive(Clone, Debug)]
pub struct FeedScope {
    pub feed: FeedController,
    pub scroll: ScrollObserver,
}

impl FeedScope {
    #[must_use]
    pub fn new(feed: FeedController) -> Self {
        let scroll = ScrollObserver::new(feed.config().near_end_threshold);
        Self { feed, scroll }
    }

    pub fn reset(&mut self) {
        self.feed.reset();
        self.scroll.reset();
    }
}

#[derive(Clone, Debug)]
pub struct Model {
    pub destination: Destination,

    // Feed
    pub home: FeedScope,
    pub navigation: NavigationState,

    // Detail scope
    pub related: FeedScope,
    pub pin_likes: PinLikes,

    // Overlays
    pub overlay: OverlayCoordinator,
    pub comments: CommentThread,
    pub composer: CommentComposer,

    // Generic UI state
    pub active_toast: Option<String>,
    pub active_error: Option<AppError>,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            destination: Destination::Home,
            home: FeedScope::new(FeedController::home()),
            navigation: NavigationState::List,
            related: FeedScope::new(FeedController::related()),
            pin_likes: PinLikes::default(),
            overlay: OverlayCoordinator::default(),
            comments: CommentThread::default(),
            composer: CommentComposer::default(),
            active_toast: None,
            active_error: None,
        }
    }
}

impl Model {
    #[must_use]
    pub fn feed(&self, kind: FeedKind) -> &FeedScope {
        match kind {
            FeedKind::Home => &self.home,
            FeedKind::Related => &self.related,
        }
    }

    pub fn feed_mut(&mut self, kind: FeedKind) -> &mut FeedScope {
        match kind {
            FeedKind::Home => &mut self.home,
            FeedKind::Related => &mut self.related,
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.active_toast = Some(message.into());
    }

    pub fn clear_toast(&mut self) {
        self.active_toast = None;
    }

    /// Surfaces `error` as a toast and keeps it for inspection.
    pub fn set_error(&mut self, error: AppError) {
        self.active_toast = Some(error.user_facing_message());
        self.active_error = Some(error);
    }

    #[must_use]
    pub fn intercepts_back(&self) -> bool {
        self.overlay.is_open() || self.navigation.intercepts_back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn default_model_starts_on_empty_home_list() {
        let model = Model::default();
        assert_eq!(model.destination, Destination::Home);
        assert!(model.home.feed.is_empty());
        assert_eq!(model.home.scroll.threshold(), 6);
        assert_eq!(model.related.scroll.threshold(), 4);
        assert!(!model.intercepts_back());
    }

    #[test]
    fn pin_likes_round_trip() {
        let mut likes = PinLikes::default();
        likes.toggle();
        assert_eq!(likes, PinLikes { count: 1201, liked: true });
        likes.toggle();
        assert_eq!(likes, PinLikes::default());
    }

    #[test]
    fn set_error_shows_user_message() {
        let mut model = Model::default();
        model.set_error(AppError::new(ErrorKind::NotFound, "comment not found: x"));
        assert_eq!(
            model.active_toast.as_deref(),
            Some("The requested item could not be found.")
        );
        model.clear_toast();
        assert!(model.active_toast.is_none());
        assert!(model.active_error.is_some());
    }

    #[test]
    fn destination_labels() {
        let labels: Vec<_> = Destination::ALL.iter().map(|d| d.label()).collect();
        assert_eq!(labels, ["Home", "Search", "Create", "Inbox", "Profile"]);
    }
}
