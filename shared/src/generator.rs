use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::feed::FeedConfig;

pub const IMAGE_WIDTH: u32 = 400;
pub const MIN_MEDIA_HEIGHT: u32 = 150;
pub const MAX_MEDIA_HEIGHT: u32 = 450;
pub const DEFAULT_IMAGE_HOST: &str = "https://picsum.photos";

/// Position of an item within its feed. Ids start at 0 and are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl ItemId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn offset(self, by: u64) -> Self {
        Self(self.0 + by)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pin. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub media_aspect_height: u32,
    pub image_ref: String,
    pub caption: Option<String>,
}

impl Item {
    /// Width over height, as the grid and detail image expect it.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        IMAGE_WIDTH as f32 / self.media_aspect_height.max(1) as f32
    }
}

pub trait ContentGenerator {
    /// Must be pure: the same id always yields the same item.
    fn generate(&self, id: ItemId) -> Item;

    fn generate_page(&self, start: ItemId, count: usize) -> Vec<Item> {
        (0..count as u64).map(|i| self.generate(start.offset(i))).collect()
    }
}

/// Placeholder-image generator keyed by a seed prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntheticGenerator {
    seed_prefix: String,
    caption_prefix: String,
    caption_every: u64,
    base: Option<Url>,
    image_host: String,
}

impl SyntheticGenerator {
    #[must_use]
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            seed_prefix: config.seed_prefix.clone(),
            caption_prefix: config.caption_prefix.clone(),
            caption_every: config.caption_every,
            base: Url::parse(&config.image_host).ok(),
            image_host: config.image_host.clone(),
        }
    }

    fn seed_for(&self, id: ItemId) -> String {
        format!("{}_{}", self.seed_prefix, id)
    }

    fn height_for(seed: &str) -> u32 {
        let hash = blake3::hash(seed.as_bytes());
        let bytes = hash.as_bytes();
        let n = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        MIN_MEDIA_HEIGHT + n % (MAX_MEDIA_HEIGHT - MIN_MEDIA_HEIGHT)
    }

    fn image_ref(&self, seed: &str, height: u32) -> String {
        let width = IMAGE_WIDTH.to_string();
        let height = height.to_string();

        if let Some(mut url) = self.base.clone() {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .extend(["seed", seed, width.as_str(), height.as_str()]);
            }
            return url.into();
        }

        // Only reachable with an unvalidated config.
        format!(
            "{}/seed/{seed}/{width}/{height}",
            self.image_host.trim_end_matches('/')
        )
    }
}

impl ContentGenerator for SyntheticGenerator {
    fn generate(&self, id: ItemId) -> Item {
        let seed = self.seed_for(id);
        let height = Self::height_for(&seed);
        let caption = (self.caption_every > 0 && id.0 % self.caption_every == 0)
            .then(|| format!("{} #{}", self.caption_prefix, id));

        Item {
            id,
            media_aspect_height: height,
            image_ref: self.image_ref(&seed, height),
            caption,
        }
    }
}
