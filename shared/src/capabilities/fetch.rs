use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::feed::PageRequest;

/// Asks the shell to deliver one page. With synthetic content the shell only
/// waits `delay_ms`; a backed shell would fetch here.
#[derive(Clone)]
pub struct Fetch<E> {
    context: CapabilityContext<FetchOperation, E>,
}

impl<Ev> Capability<Ev> for Fetch<Ev> {
    type Operation = FetchOperation;
    type MappedSelf<MappedEv> = Fetch<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Fetch::new(self.context.map_event(f))
    }
}

impl<E> Fetch<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<FetchOperation, E>) -> Self {
        Self { context }
    }

    pub fn page<F>(&self, request: PageRequest, callback: F)
    where
        F: FnOnce(FetchResult) -> E + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = ctx
                .request_from_shell(FetchOperation::Page { request })
                .await;
            ctx.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchOperation {
    Page { request: PageRequest },
}

impl Operation for FetchOperation {
    type Output = FetchResult;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchOutput {
    PageReady,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {message}")]
    Network { message: String },

    #[error("request timed out")]
    Timeout,

    #[error("server error {status}")]
    Server { status: u16 },
}

impl FetchError {
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout => true,
            Self::Server { status } => *status >= 500,
        }
    }
}

pub type FetchResult = Result<FetchOutput, FetchError>;
