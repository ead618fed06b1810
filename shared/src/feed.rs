use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::capabilities::FetchError;
use crate::generator::{ContentGenerator, Item, ItemId, SyntheticGenerator, DEFAULT_IMAGE_HOST};

pub const HOME_SEED_SIZE: usize = 40;
pub const HOME_PAGE_SIZE: usize = 20;
pub const HOME_NEAR_END_THRESHOLD: usize = 6;
pub const RELATED_PAGE_SIZE: usize = 10;
pub const RELATED_NEAR_END_THRESHOLD: usize = 4;
pub const SIMULATED_LATENCY_MS: u64 = 1500;
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedKind {
    /// The main grid on the Home destination.
    Home,
    /// "More like this" under the detail view.
    Related,
}

impl FeedKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Related => "related",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedError {
    #[error("fetching the {} feed failed: {source}", .feed.as_str())]
    FetchFailed { feed: FeedKind, source: FetchError },

    #[error("invalid feed config: {0}")]
    InvalidConfig(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub seed_size: usize,
    pub page_size: usize,
    pub near_end_threshold: usize,
    pub latency_ms: u64,
    pub seed_prefix: String,
    pub caption_prefix: String,
    pub caption_every: u64,
    pub image_host: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::home()
    }
}

impl FeedConfig {
    #[must_use]
    pub fn home() -> Self {
        Self {
            seed_size: HOME_SEED_SIZE,
            page_size: HOME_PAGE_SIZE,
            near_end_threshold: HOME_NEAR_END_THRESHOLD,
            latency_ms: SIMULATED_LATENCY_MS,
            seed_prefix: "pintera".into(),
            caption_prefix: "Aesthetic Inspiration".into(),
            caption_every: 3,
            image_host: DEFAULT_IMAGE_HOST.into(),
        }
    }

    #[must_use]
    pub fn related() -> Self {
        Self {
            seed_size: RELATED_PAGE_SIZE,
            page_size: RELATED_PAGE_SIZE,
            near_end_threshold: RELATED_NEAR_END_THRESHOLD,
            latency_ms: SIMULATED_LATENCY_MS,
            seed_prefix: "pintera_more".into(),
            caption_prefix: "Related Pin".into(),
            caption_every: 3,
            image_host: DEFAULT_IMAGE_HOST.into(),
        }
    }

    #[must_use]
    pub fn with_seed_size(mut self, seed_size: usize) -> Self {
        self.seed_size = seed_size;
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, near_end_threshold: usize) -> Self {
        self.near_end_threshold = near_end_threshold;
        self
    }

    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    #[must_use]
    pub fn with_image_host(mut self, image_host: impl Into<String>) -> Self {
        self.image_host = image_host.into();
        self
    }

    pub fn validate(&self) -> Result<(), FeedError> {
        if self.seed_size == 0 || self.seed_size > MAX_PAGE_SIZE {
            return Err(FeedError::InvalidConfig(format!(
                "seed_size must be in 1..={MAX_PAGE_SIZE}"
            )));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(FeedError::InvalidConfig(format!(
                "page_size must be in 1..={MAX_PAGE_SIZE}"
            )));
        }
        if self.near_end_threshold == 0 {
            return Err(FeedError::InvalidConfig(
                "near_end_threshold must be > 0".into(),
            ));
        }
        if self.seed_prefix.trim().is_empty() {
            return Err(FeedError::InvalidConfig("seed_prefix cannot be empty".into()));
        }
        match Url::parse(&self.image_host) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
            _ => {
                return Err(FeedError::InvalidConfig(format!(
                    "image_host is not an http(s) base url: {}",
                    self.image_host
                )))
            }
        }
        Ok(())
    }
}

/// One page fetch, as handed to the shell and echoed back on completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub feed: FeedKind,
    pub epoch: u64,
    pub start_id: ItemId,
    pub count: usize,
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Appended(usize),
    /// The result belongs to a fetch this feed no longer waits for.
    Discarded,
}

/// Pagination controller: owns the append-only item collection of one feed.
#[derive(Debug, Clone)]
pub struct FeedController {
    kind: FeedKind,
    config: FeedConfig,
    generator: SyntheticGenerator,
    items: Vec<Item>,
    in_flight: Option<PageRequest>,
    last_error: Option<FeedError>,
    epoch: u64,
}

impl FeedController {
    pub fn with_config(kind: FeedKind, config: FeedConfig) -> Result<Self, FeedError> {
        config.validate()?;
        Ok(Self::unchecked(kind, config))
    }

    #[must_use]
    pub fn home() -> Self {
        Self::unchecked(FeedKind::Home, FeedConfig::home())
    }

    #[must_use]
    pub fn related() -> Self {
        Self::unchecked(FeedKind::Related, FeedConfig::related())
    }

    fn unchecked(kind: FeedKind, config: FeedConfig) -> Self {
        Self {
            kind,
            generator: SyntheticGenerator::from_config(&config),
            config,
            items: Vec::new(),
            in_flight: None,
            last_error: None,
            epoch: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FeedKind {
        self.kind
    }

    #[must_use]
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_loading_more(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items
            .get(usize::try_from(id.0).unwrap_or(usize::MAX))
            .filter(|item| item.id == id)
            .or_else(|| self.items.iter().find(|item| item.id == id))
    }

    /// Starts the next fetch unless one is already in flight.
    ///
    /// Returns the request the shell must fulfil, or `None` when the call was
    /// absorbed by the in-flight fetch. The first fetch of an empty feed uses
    /// the seed size, every later one the page size.
    #[instrument(skip(self), fields(feed = self.kind.as_str(), count = self.items.len()))]
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if let Some(pending) = &self.in_flight {
            debug!(start_id = %pending.start_id, "fetch already in flight, ignoring");
            return None;
        }

        let count = if self.items.is_empty() {
            self.config.seed_size
        } else {
            self.config.page_size
        };

        let request = PageRequest {
            feed: self.kind,
            epoch: self.epoch,
            start_id: ItemId(self.items.len() as u64),
            count,
            delay_ms: self.config.latency_ms,
        };

        self.last_error = None;
        self.in_flight = Some(request.clone());
        debug!(start_id = %request.start_id, count, "fetch started");
        Some(request)
    }

    /// Appends the page for `request` if it is the fetch in flight.
    #[instrument(skip(self, request), fields(feed = self.kind.as_str(), start_id = %request.start_id))]
    pub fn complete(&mut self, request: &PageRequest) -> PageOutcome {
        if self.in_flight.as_ref() != Some(request) {
            debug!(epoch = request.epoch, current_epoch = self.epoch, "discarding stale page");
            return PageOutcome::Discarded;
        }

        let page = self.generator.generate_page(request.start_id, request.count);
        self.items.extend(page);
        self.in_flight = None;

        info!(appended = request.count, total = self.items.len(), "page appended");
        PageOutcome::Appended(request.count)
    }

    /// Ends the in-flight fetch without touching the items, so it can be retried.
    #[instrument(skip(self, request, error), fields(feed = self.kind.as_str()))]
    pub fn fail(&mut self, request: &PageRequest, error: FetchError) -> Option<FeedError> {
        if self.in_flight.as_ref() != Some(request) {
            debug!("discarding failure of stale fetch");
            return None;
        }

        self.in_flight = None;
        let error = FeedError::FetchFailed {
            feed: self.kind,
            source: error,
        };
        warn!(error = %error, "page fetch failed");
        self.last_error = Some(error.clone());
        Some(error)
    }

    /// Drops every item and starts a new epoch; results of earlier fetches
    /// are discarded when they arrive.
    pub fn reset(&mut self) {
        self.items.clear();
        self.in_flight = None;
        self.last_error = None;
        self.epoch += 1;
        debug!(feed = self.kind.as_str(), epoch = self.epoch, "feed reset");
    }
}
