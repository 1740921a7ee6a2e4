//! Message transports
//!
//! A transport delivers inbound `(user, text)` pairs and carries replies back.
//! [`serve`] handles each inbound message on its own task, so one slow check
//! never holds up anybody else's reply.

pub mod line;

pub use line::{LineTransport, StdioTransport};

use crate::models::UserId;
use crate::runner::Dispatcher;
use crate::utils::TransportError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;

/// A message received from a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub user: UserId,
    pub text: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Next inbound message, or `None` once the transport is closed
    async fn receive(&self) -> Result<Option<Inbound>, TransportError>;

    /// Deliver a reply to a user
    async fn send(&self, user: UserId, text: &str) -> Result<(), TransportError>;
}

/// Answer every inbound message until the transport closes, then wait for
/// replies still in flight. A receive error stops intake but in-flight
/// replies are still delivered before it is returned.
pub async fn serve<T>(transport: Arc<T>, dispatcher: Arc<Dispatcher>) -> Result<(), TransportError>
where
    T: Transport + 'static,
{
    let mut in_flight = JoinSet::new();

    let received = loop {
        let inbound = match transport.receive().await {
            Ok(Some(inbound)) => inbound,
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        };

        let transport = Arc::clone(&transport);
        let dispatcher = Arc::clone(&dispatcher);
        in_flight.spawn(async move {
            let reply = dispatcher.handle_text(inbound.user, &inbound.text).await;
            if let Err(e) = transport.send(inbound.user, &reply).await {
                tracing::error!("{}", e);
            }
        });

        while let Some(finished) = in_flight.try_join_next() {
            if let Err(e) = finished {
                tracing::error!("Message task died: {}", e);
            }
        }
    };

    while let Some(finished) = in_flight.join_next().await {
        if let Err(e) = finished {
            tracing::error!("Message task died: {}", e);
        }
    }

    received
}
