use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SHARE_MESSAGE_PREFIX: &str = "Check out this pin: ";
pub const WHATSAPP_PACKAGE: &str = "com.whatsapp";

/// Hands text to the platform share sheet or clipboard.
#[derive(Clone)]
pub struct Share<E> {
    context: CapabilityContext<ShareOperation, E>,
}

impl<Ev> Capability<Ev> for Share<Ev> {
    type Operation = ShareOperation;
    type MappedSelf<MappedEv> = Share<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Share::new(self.context.map_event(f))
    }
}

impl<E> Share<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<ShareOperation, E>) -> Self {
        Self { context }
    }

    /// `target_app` is a platform package id; `None` opens the system chooser.
    pub fn send_text<F>(&self, text: String, target_app: Option<String>, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        self.request(ShareOperation::SendText { text, target_app }, callback);
    }

    pub fn copy_to_clipboard<F>(&self, text: String, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        self.request(ShareOperation::CopyToClipboard { text }, callback);
    }

    fn request<F>(&self, operation: ShareOperation, callback: F)
    where
        F: FnOnce(ShareResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOperation {
    SendText {
        text: String,
        target_app: Option<String>,
    },
    CopyToClipboard {
        text: String,
    },
}

impl Operation for ShareOperation {
    type Output = ShareResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareOutput {
    Sent,
    Copied,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShareError {
    #[error("app not installed: {package}")]
    AppNotInstalled { package: String },

    #[error("share failed: {reason}")]
    Failed { reason: String },
}

pub type ShareResult = Result<ShareOutput, ShareError>;

#[must_use]
pub fn share_message(image_ref: &str) -> String {
    format!("{SHARE_MESSAGE_PREFIX}{image_ref}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_message_prefixes_link() {
        assert_eq!(
            share_message("https://picsum.photos/seed/pintera_1/400/200"),
            "Check out this pin: https://picsum.photos/seed/pintera_1/400/200"
        );
    }
}
