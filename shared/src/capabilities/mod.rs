mod fetch;
mod share;

pub use self::fetch::{Fetch, FetchError, FetchOperation, FetchOutput, FetchResult};
pub use self::share::{
    share_message, Share, ShareError, ShareOperation, ShareOutput, ShareResult,
    SHARE_MESSAGE_PREFIX, WHATSAPP_PACKAGE,
};

// Crux's built-in Render covers view updates.
pub use crux_core::render::Render;

use crate::event::Event;
use crate::App;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub fetch: Fetch<Event>,
    pub share: Share<Event>,
}
