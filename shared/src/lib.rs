#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod capabilities;
pub mod comments;
pub mod event;
pub mod feed;
pub mod generator;
pub mod model;
pub mod navigation;
pub mod overlay;
pub mod scroll;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::capabilities::{FetchError, ShareError};
use crate::comments::{Comment, CommentError, CommentId};
use crate::event::{PinOption, ShareTarget};
use crate::feed::{FeedError, FeedKind};
use crate::generator::{Item, ItemId, IMAGE_WIDTH};
use crate::navigation::NavigationError;
use crate::overlay::OverlayToken;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;

pub const PIN_BASE_LIKE_COUNT: u32 = 1200;
pub const COMMENT_COUNT_LABEL: &str = "342";

pub const SAVED_TOAST: &str = "Saved!";
pub const LINK_COPIED_TOAST: &str = "Link copied to clipboard";
pub const APP_NOT_INSTALLED_TOAST: &str = "App not installed, opening options...";
pub const SHARE_FAILED_TOAST: &str = "Could not share";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Server,
    NotFound,
    Validation,
    InvalidState,
    ShareUnavailable,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Server => "SERVER_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::ShareUnavailable => "SHARE_UNAVAILABLE",
            Self::Internal => "INTERNAL_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::Server => ErrorSeverity::Transient,
            Self::NotFound
            | Self::Validation
            | Self::InvalidState
            | Self::ShareUnavailable
            | Self::Internal => ErrorSeverity::Permanent,
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Server)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && matches!(self.severity, ErrorSeverity::Transient)
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Server => "Couldn't load more pins. Please try again.".into(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::InvalidState => "That action isn't available right now.".into(),
            ErrorKind::ShareUnavailable => SHARE_FAILED_TOAST.into(),
            ErrorKind::Internal => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Network { .. } => Self::new(ErrorKind::Network, e.to_string()),
            FetchError::Timeout => Self::new(ErrorKind::Timeout, e.to_string()),
            FetchError::Server { status } => {
                let error = Self::new(ErrorKind::Server, e.to_string())
                    .with_context("http_status", status.to_string());
                if status >= 500 {
                    error
                } else {
                    error.with_severity(ErrorSeverity::Permanent)
                }
            }
        }
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        match e {
            FeedError::FetchFailed { feed, source } => {
                let message = format!("{} feed: {source}", feed.as_str());
                let mut error = Self::from(source).with_context("feed", feed.as_str());
                error.message = message;
                error
            }
            FeedError::InvalidConfig(_) => Self::new(ErrorKind::Validation, e.to_string()),
        }
    }
}

impl From<CommentError> for AppError {
    fn from(e: CommentError) -> Self {
        match &e {
            CommentError::NotFound(id) => Self::new(ErrorKind::NotFound, e.to_string())
                .with_context("comment_id", id.as_str()),
            CommentError::EmptyText => Self::new(ErrorKind::Validation, e.to_string()),
            CommentError::TooDeep { id, depth } => Self::new(ErrorKind::Validation, e.to_string())
                .with_context("comment_id", id.as_str())
                .with_context("depth", depth.to_string()),
        }
    }
}

impl From<NavigationError> for AppError {
    fn from(e: NavigationError) -> Self {
        Self::new(ErrorKind::InvalidState, e.to_string())
    }
}

impl From<ShareError> for AppError {
    fn from(e: ShareError) -> Self {
        match &e {
            ShareError::AppNotInstalled { package } => {
                Self::new(ErrorKind::ShareUnavailable, e.to_string()).with_context("package", package)
            }
            ShareError::Failed { .. } => Self::new(ErrorKind::Internal, e.to_string()),
        }
    }
}

#[must_use]
pub fn get_current_time_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Compact like counts: `999`, `1.2k`.
#[must_use]
pub fn format_count(count: u32) -> String {
    if count >= 1000 {
        format!("{:.1}k", f64::from(count) / 1000.0)
    } else {
        count.to_string()
    }
}

#[must_use]
pub fn sent_to_toast(contact: &str) -> String {
    format!("Sent to {contact}!")
}

// View model

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PinCard {
    pub id: ItemId,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub caption: Option<String>,
}

impl From<&Item> for PinCard {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            image_url: item.image_ref.clone(),
            width: IMAGE_WIDTH,
            height: item.media_aspect_height,
            caption: item.caption.clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FeedView {
    pub kind: FeedKind,
    pub items: Vec<PinCard>,
    pub is_loading_more: bool,
    /// Banner text after a failed page fetch.
    pub error: Option<String>,
    pub retryable: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PinDetailView {
    pub pin: PinCard,
    pub like_count_label: String,
    pub liked: bool,
    pub comment_count_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScreenView {
    List,
    Detail {
        detail: PinDetailView,
        related: FeedView,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OptionEntryView {
    pub option: PinOption,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShareTargetView {
    pub target: ShareTarget,
    pub label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentView {
    pub id: CommentId,
    pub author: String,
    pub initial: Option<char>,
    pub text: String,
    pub like_count: u32,
    pub liked: bool,
    pub replies: Vec<CommentView>,
}

impl From<&Comment> for CommentView {
    fn from(c: &Comment) -> Self {
        Self {
            id: c.id.clone(),
            author: c.author.clone(),
            initial: c.initial(),
            text: c.text.clone(),
            like_count: c.like_count,
            liked: c.liked,
            replies: c.replies.iter().map(Self::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ReplyTargetView {
    pub id: CommentId,
    pub author: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OverlayContentView {
    Options {
        entries: Vec<OptionEntryView>,
    },
    Share {
        pin: ItemId,
        message: String,
        targets: Vec<ShareTargetView>,
    },
    Comments {
        pin: ItemId,
        comments: Vec<CommentView>,
        draft: String,
        can_send: bool,
        replying_to: Option<ReplyTargetView>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OverlayView {
    pub content: OverlayContentView,
    /// Set while the hide transition runs; echo `token` in `OverlayHidden`.
    pub closing: bool,
    pub token: OverlayToken,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserFacingError {
    pub message: String,
    pub is_transient: bool,
    pub is_retryable: bool,
    pub error_code: String,
}

impl From<&AppError> for UserFacingError {
    fn from(e: &AppError) -> Self {
        Self {
            message: e.user_facing_message(),
            is_transient: e.severity == ErrorSeverity::Transient,
            is_retryable: e.is_retryable(),
            error_code: e.code().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub destination: model::Destination,
    pub home: FeedView,
    pub screen: ScreenView,
    pub overlay: Option<OverlayView>,
    /// Whether the shell should route the system back gesture to the core.
    pub intercept_back: bool,
    pub toast: Option<String>,
    pub error: Option<UserFacingError>,
}

pub mod app {
    use tracing::{debug, info, warn};

    use super::*;
    use crate::capabilities::{share_message, FetchOutput, ShareOutput};
    use crate::comments::{CommentThread, LOCAL_AUTHOR};
    use crate::event::{PageFetched, ShareFinished};
    use crate::feed::PageOutcome;
    use crate::model::{FeedScope, PinLikes};
    use crate::overlay::{OverlayKind, OverlayPhase, OverlayState};

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Starts a page fetch for `kind` unless one is already in flight.
        fn request_page(model: &mut Model, kind: FeedKind, caps: &Capabilities) {
            let Some(request) = model.feed_mut(kind).feed.request_more() else {
                return;
            };
            let echoed = request.clone();
            caps.fetch.page(request, move |result| {
                Event::PageFetched(Box::new(PageFetched {
                    request: echoed,
                    result,
                }))
            });
        }

        fn reject(error: NavigationError) {
            warn!(error = %error, "ignoring event");
        }

        fn selected_id(model: &Model) -> Option<ItemId> {
            model.navigation.selected().map(|item| item.id)
        }

        fn comments_open(model: &Model) -> bool {
            model.overlay.is_open()
                && matches!(model.overlay.active(), Some(OverlayKind::Comments(_)))
        }

        fn dismiss_overlay(model: &mut Model) {
            if model.overlay.dismiss().is_none() {
                debug!("no open overlay to dismiss");
            }
        }

        /// `token` identifies the share sheet the result belongs to.
        fn send_share(token: OverlayToken, target: ShareTarget, text: String, caps: &Capabilities) {
            let package = target.package().map(str::to_owned);
            let copy = target == ShareTarget::CopyLink;
            let finished = move |result| {
                Event::ShareFinished(Box::new(ShareFinished {
                    token,
                    target,
                    result,
                }))
            };
            if copy {
                caps.share.copy_to_clipboard(text, finished);
            } else {
                caps.share.send_text(text, package, finished);
            }
        }

        fn handle_page(model: &mut Model, fetched: PageFetched) {
            let PageFetched { request, result } = fetched;
            let scope = model.feed_mut(request.feed);
            match result {
                Ok(FetchOutput::PageReady) => {
                    if let PageOutcome::Appended(_) = scope.feed.complete(&request) {
                        // Re-arm so a grid still at the end after the append pages again.
                        scope.scroll.reset();
                    }
                }
                Err(e) => {
                    if let Some(error) = scope.feed.fail(&request, e) {
                        model.active_error = Some(error.into());
                    }
                }
            }
        }

        fn handle_option(model: &mut Model, option: PinOption) {
            if !(model.overlay.is_open()
                && matches!(model.overlay.active(), Some(OverlayKind::Options)))
            {
                Self::reject(NavigationError::invalid(
                    format!("choose {}", option.label()),
                    "options closed",
                ));
                return;
            }

            match option {
                PinOption::Save => {
                    model.show_toast(SAVED_TOAST);
                    Self::dismiss_overlay(model);
                }
                PinOption::Share => match Self::selected_id(model) {
                    Some(id) => {
                        model.overlay.open(OverlayKind::Share(id));
                    }
                    None => {
                        Self::reject(NavigationError::invalid(
                            "open share",
                            model.navigation.name(),
                        ));
                        Self::dismiss_overlay(model);
                    }
                },
                PinOption::DownloadImage
                | PinOption::SeeMoreLikeThis
                | PinOption::Hide
                | PinOption::Report => Self::dismiss_overlay(model),
            }
        }

        fn handle_share_target(model: &mut Model, target: ShareTarget, caps: &Capabilities) {
            let (token, shared) = match (model.overlay.state(), model.navigation.selected()) {
                (
                    OverlayState::Active {
                        kind: OverlayKind::Share(id),
                        phase: OverlayPhase::Open,
                        token,
                    },
                    Some(item),
                ) if *id == item.id => (*token, item.image_ref.clone()),
                _ => {
                    Self::reject(NavigationError::invalid(
                        format!("share via {}", target.label()),
                        "share closed",
                    ));
                    return;
                }
            };

            if let ShareTarget::Contact(name) = &target {
                model.show_toast(sent_to_toast(name));
                Self::dismiss_overlay(model);
                return;
            }

            info!(target = target.label(), "sharing pin");
            Self::send_share(token, target, share_message(&shared), caps);
        }

        fn handle_share_finished(model: &mut Model, finished: ShareFinished, caps: &Capabilities) {
            let ShareFinished {
                token,
                target,
                result,
            } = finished;

            // The sheet may have been dismissed or replaced while the platform was busy.
            if model.overlay.open_token() != Some(token) {
                debug!(token = token.0, target = target.label(), "dropping result for a closed share sheet");
                return;
            }

            match result {
                Ok(ShareOutput::Copied) => {
                    model.show_toast(LINK_COPIED_TOAST);
                    Self::dismiss_overlay(model);
                }
                Ok(ShareOutput::Sent) => {
                    debug!(target = target.label(), "share sent");
                    Self::dismiss_overlay(model);
                }
                Err(ShareError::AppNotInstalled { package }) if target.package().is_some() => {
                    warn!(package = %package, "share target missing, using chooser");
                    model.show_toast(APP_NOT_INSTALLED_TOAST);
                    match model.navigation.selected() {
                        Some(item) => {
                            let text = share_message(&item.image_ref);
                            Self::send_share(token, ShareTarget::More, text, caps);
                        }
                        None => Self::dismiss_overlay(model),
                    }
                }
                Err(e) => {
                    warn!(error = %e, target = target.label(), "share failed");
                    model.active_error = Some(e.into());
                    model.show_toast(SHARE_FAILED_TOAST);
                }
            }
        }

        fn handle_comment_error(model: &mut Model, error: CommentError) {
            match error {
                CommentError::EmptyText => debug!("ignoring blank comment"),
                e => {
                    warn!(error = %e, "comment rejected");
                    model.set_error(e.into());
                }
            }
        }

        fn feed_view(scope: &FeedScope) -> FeedView {
            let error = scope.feed.last_error().cloned().map(AppError::from);
            FeedView {
                kind: scope.feed.kind(),
                items: scope.feed.items().iter().map(PinCard::from).collect(),
                is_loading_more: scope.feed.is_loading_more(),
                retryable: error.as_ref().is_some_and(AppError::is_retryable),
                error: error.map(|e| e.user_facing_message()),
            }
        }

        fn overlay_view(model: &Model) -> Option<OverlayView> {
            let OverlayState::Active { kind, phase, token } = model.overlay.state() else {
                return None;
            };

            let content = match kind {
                OverlayKind::Options => OverlayContentView::Options {
                    entries: PinOption::ALL
                        .iter()
                        .map(|&option| OptionEntryView {
                            option,
                            label: option.label().into(),
                        })
                        .collect(),
                },
                OverlayKind::Share(pin) => {
                    let message = model
                        .navigation
                        .selected()
                        .map(|item| share_message(&item.image_ref))
                        .unwrap_or_default();
                    let targets = [
                        ShareTarget::CopyLink,
                        ShareTarget::WhatsApp,
                        ShareTarget::Messages,
                        ShareTarget::More,
                    ]
                    .into_iter()
                    .chain(
                        ShareTarget::CONTACTS
                            .iter()
                            .map(|name| ShareTarget::Contact((*name).to_string())),
                    )
                    .map(|target| ShareTargetView {
                        label: target.label().to_string(),
                        target,
                    })
                    .collect();
                    OverlayContentView::Share {
                        pin: *pin,
                        message,
                        targets,
                    }
                }
                OverlayKind::Comments(pin) => OverlayContentView::Comments {
                    pin: *pin,
                    comments: model.comments.comments().iter().map(CommentView::from).collect(),
                    draft: model.composer.draft().to_string(),
                    can_send: model.composer.can_send(),
                    replying_to: model.composer.replying_to().and_then(|id| {
                        model.comments.find(id).map(|c| ReplyTargetView {
                            id: c.id.clone(),
                            author: c.author.clone(),
                        })
                    }),
                },
            };

            Some(OverlayView {
                content,
                closing: *phase == OverlayPhase::Closing,
                token: *token,
            })
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            debug!(
                event = event.name(),
                user_action = event.is_user_initiated(),
                "update"
            );

            match event {
                Event::AppStarted => {
                    if model.home.feed.is_empty() {
                        Self::request_page(model, FeedKind::Home, caps);
                    }
                }

                Event::DestinationSelected { destination } => {
                    model.destination = destination;
                }

                Event::FeedScrolled { feed, snapshot } => {
                    if feed == FeedKind::Related && !model.navigation.is_detail() {
                        debug!("related grid scrolled without a detail, ignoring");
                    } else if model.feed_mut(feed).scroll.observe(snapshot) {
                        Self::request_page(model, feed, caps);
                    }
                }

                Event::LoadMoreRequested { feed } => {
                    if feed == FeedKind::Related && !model.navigation.is_detail() {
                        Self::reject(NavigationError::invalid(
                            "load related pins",
                            model.navigation.name(),
                        ));
                    } else {
                        Self::request_page(model, feed, caps);
                    }
                }

                Event::PageFetched(fetched) => Self::handle_page(model, *fetched),

                Event::ItemSelected { feed, id } => {
                    match model.feed(feed).feed.find(id).cloned() {
                        Some(item) => {
                            model.navigation.select(item);
                            model.pin_likes = PinLikes::default();
                            model.related.reset();
                            Self::request_page(model, FeedKind::Related, caps);
                        }
                        None => Self::reject(NavigationError::UnknownItem { feed, id }),
                    }
                }

                Event::BackPressed => {
                    if model.overlay.is_open() {
                        Self::dismiss_overlay(model);
                    } else if model.navigation.back() {
                        model.related.reset();
                    } else {
                        debug!("back pressed on list, nothing to do");
                    }
                }

                Event::PinLikeToggled => {
                    if model.navigation.is_detail() {
                        model.pin_likes.toggle();
                    } else {
                        Self::reject(NavigationError::invalid("like pin", model.navigation.name()));
                    }
                }

                Event::OptionsRequested => {
                    model.overlay.open(OverlayKind::Options);
                }

                Event::ShareRequested => match Self::selected_id(model) {
                    Some(id) => {
                        model.overlay.open(OverlayKind::Share(id));
                    }
                    None => {
                        Self::reject(NavigationError::invalid("open share", model.navigation.name()));
                    }
                },

                Event::CommentsRequested => match Self::selected_id(model) {
                    Some(id) => {
                        model.comments = CommentThread::seeded();
                        model.composer.clear();
                        model.overlay.open(OverlayKind::Comments(id));
                    }
                    None => Self::reject(NavigationError::invalid(
                        "open comments",
                        model.navigation.name(),
                    )),
                },

                Event::OptionChosen { option } => Self::handle_option(model, option),

                Event::ShareTargetChosen { target } => {
                    Self::handle_share_target(model, target, caps);
                }

                Event::ShareFinished(finished) => {
                    Self::handle_share_finished(model, *finished, caps);
                }

                Event::OverlayDismissRequested => Self::dismiss_overlay(model),

                Event::OverlayHidden { token } => {
                    if let Some(OverlayKind::Comments(_)) = model.overlay.hide_completed(token) {
                        model.composer.clear();
                    }
                }

                Event::CommentDraftChanged { text } => {
                    if Self::comments_open(model) {
                        model.composer.set_draft(text);
                    } else {
                        Self::reject(NavigationError::invalid("edit comment", "comments closed"));
                    }
                }

                Event::ReplyStarted { id } => {
                    if !Self::comments_open(model) {
                        Self::reject(NavigationError::invalid("start reply", "comments closed"));
                    } else if let Err(e) = model.composer.reply_to(&model.comments, &id) {
                        Self::handle_comment_error(model, e);
                    }
                }

                Event::ReplyCancelled => model.composer.cancel_reply(),

                Event::CommentSubmitted => {
                    if !Self::comments_open(model) {
                        Self::reject(NavigationError::invalid("send comment", "comments closed"));
                    } else {
                        match model.composer.submit(&mut model.comments, LOCAL_AUTHOR) {
                            Ok(id) => info!(id = %id, "comment posted"),
                            Err(e) => Self::handle_comment_error(model, e),
                        }
                    }
                }

                Event::CommentLikeToggled { id } => {
                    if !Self::comments_open(model) {
                        Self::reject(NavigationError::invalid("like comment", "comments closed"));
                    } else if let Err(e) = model.comments.toggle_like(&id) {
                        Self::handle_comment_error(model, e);
                    }
                }

                Event::ToastDismissed => model.clear_toast(),
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            let screen = match model.navigation.selected() {
                None => ScreenView::List,
                Some(item) => ScreenView::Detail {
                    detail: PinDetailView {
                        pin: PinCard::from(item),
                        like_count_label: format_count(model.pin_likes.count),
                        liked: model.pin_likes.liked,
                        comment_count_label: COMMENT_COUNT_LABEL.into(),
                    },
                    related: Self::feed_view(&model.related),
                },
            };

            ViewModel {
                destination: model.destination,
                home: Self::feed_view(&model.home),
                screen,
                overlay: Self::overlay_view(model),
                intercept_back: model.intercepts_back(),
                toast: model.active_toast.clone(),
                error: model.active_error.as_ref().map(UserFacingError::from),
            }
        }
    }
}
