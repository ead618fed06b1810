use serde::{Deserialize, Serialize};

use crate::capabilities::{FetchResult, ShareResult, WHATSAPP_PACKAGE};
use crate::comments::CommentId;
use crate::feed::{FeedKind, PageRequest};
use crate::generator::ItemId;
use crate::model::Destination;
use crate::overlay::OverlayToken;
use crate::scroll::LayoutSnapshot;

/// Entries of the pin options sheet.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinOption {
    Save,
    Share,
    DownloadImage,
    SeeMoreLikeThis,
    Hide,
    Report,
}

impl PinOption {
    pub const ALL: [Self; 6] = [
        Self::Save,
        Self::Share,
        Self::DownloadImage,
        Self::SeeMoreLikeThis,
        Self::Hide,
        Self::Report,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Save => "Save",
            Self::Share => "Share",
            Self::DownloadImage => "Download image",
            Self::SeeMoreLikeThis => "See more like this",
            Self::Hide => "Hide",
            Self::Report => "Report Pin",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ShareTarget {
    CopyLink,
    WhatsApp,
    Messages,
    /// The system chooser.
    More,
    Contact(String),
}

impl ShareTarget {
    pub const CONTACTS: [&'static str; 5] = ["Alice", "Bob", "Charlie", "Dave", "Eve"];

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::CopyLink => "Copy link",
            Self::WhatsApp => "WhatsApp",
            Self::Messages => "Messages",
            Self::More => "More",
            Self::Contact(name) => name,
        }
    }

    /// Package id to hand to the platform, `None` for the chooser.
    #[must_use]
    pub fn package(&self) -> Option<&'static str> {
        match self {
            Self::WhatsApp => Some(WHATSAPP_PACKAGE),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    AppStarted,
    DestinationSelected {
        destination: Destination,
    },

    // Feeds
    FeedScrolled {
        feed: FeedKind,
        snapshot: LayoutSnapshot,
    },
    LoadMoreRequested {
        feed: FeedKind,
    },

    // Navigation
    ItemSelected {
        feed: FeedKind,
        id: ItemId,
    },
    BackPressed,
    PinLikeToggled,

    // Overlays
    OptionsRequested,
    ShareRequested,
    CommentsRequested,
    OptionChosen {
        option: PinOption,
    },
    ShareTargetChosen {
        target: ShareTarget,
    },
    OverlayDismissRequested,
    OverlayHidden {
        token: OverlayToken,
    },

    // Comments
    CommentDraftChanged {
        text: String,
    },
    ReplyStarted {
        id: CommentId,
    },
    ReplyCancelled,
    CommentSubmitted,
    CommentLikeToggled {
        id: CommentId,
    },

    ToastDismissed,

    // Capability responses (boxed to keep enum size small)
    PageFetched(Box<PageFetched>),
    ShareFinished(Box<ShareFinished>),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PageFetched {
    pub request: PageRequest,
    pub result: FetchResult,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShareFinished {
    /// The share sheet that issued the request.
    pub token: OverlayToken,
    pub target: ShareTarget,
    pub result: ShareResult,
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::DestinationSelected { .. } => "destination_selected",
            Self::FeedScrolled { .. } => "feed_scrolled",
            Self::LoadMoreRequested { .. } => "load_more_requested",
            Self::ItemSelected { .. } => "item_selected",
            Self::BackPressed => "back_pressed",
            Self::PinLikeToggled => "pin_like_toggled",
            Self::OptionsRequested => "options_requested",
            Self::ShareRequested => "share_requested",
            Self::CommentsRequested => "comments_requested",
            Self::OptionChosen { .. } => "option_chosen",
            Self::ShareTargetChosen { .. } => "share_target_chosen",
            Self::OverlayDismissRequested => "overlay_dismiss_requested",
            Self::OverlayHidden { .. } => "overlay_hidden",
            Self::CommentDraftChanged { .. } => "comment_draft_changed",
            Self::ReplyStarted { .. } => "reply_started",
            Self::ReplyCancelled => "reply_cancelled",
            Self::CommentSubmitted => "comment_submitted",
            Self::CommentLikeToggled { .. } => "comment_like_toggled",
            Self::ToastDismissed => "toast_dismissed",
            Self::PageFetched(_) => "page_fetched",
            Self::ShareFinished(_) => "share_finished",
        }
    }

    /// Everything except capability responses and shell bookkeeping.
    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        !matches!(
            self,
            Self::AppStarted
                | Self::FeedScrolled { .. }
                | Self::OverlayHidden { .. }
                | Self::PageFetched(_)
                | Self::ShareFinished(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_labels() {
        let labels: Vec<_> = PinOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            [
                "Save",
                "Share",
                "Download image",
                "See more like this",
                "Hide",
                "Report Pin"
            ]
        );
    }

    #[test]
    fn only_whatsapp_targets_a_package() {
        assert_eq!(ShareTarget::WhatsApp.package(), Some("com.whatsapp"));
        assert_eq!(ShareTarget::Messages.package(), None);
        assert_eq!(ShareTarget::More.package(), None);
        assert_eq!(ShareTarget::Contact("Bob".into()).label(), "Bob");
    }

    #[test]
    fn capability_responses_are_not_user_initiated() {
        assert!(Event::BackPressed.is_user_initiated());
        assert!(!Event::OverlayHidden {
            token: OverlayToken(1)
        }
        .is_user_initiated());
        assert_eq!(Event::CommentSubmitted.name(), "comment_submitted");
    }

    #[test]
    fn event_size_is_reasonable() {
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 64,
            "Event enum is {} bytes, box more variants",
            size
        );
    }
}
