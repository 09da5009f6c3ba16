//! Explicit session context
//!
//! Holds the bearer token used by every API call and notifies subscribers when
//! the operator signs in or out. Subscribers receive events over their own
//! channel and are removed with [`SessionContext::unsubscribe`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};

use crate::errors::{SharedError, SharedResult};
use crate::types::{SubscriberId, UserType};

/// Authenticated session as persisted between runs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, user_type: UserType) -> Self {
        Self {
            token: token.into(),
            user_type,
            user: None,
            signed_in_at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user: Option<serde_json::Value>) -> Self {
        self.user = user;
        self
    }
}

/// Session change notification
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    SignedIn { user_type: UserType },
    SignedOut,
}

/// Shared session state with subscribe/unsubscribe semantics
#[derive(Debug, Default)]
pub struct SessionContext {
    current: RwLock<Option<Session>>,
    subscribers: RwLock<HashMap<SubscriberId, mpsc::UnboundedSender<SessionEvent>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context that starts out signed in
    pub fn with_session(session: Session) -> Self {
        Self {
            current: RwLock::new(Some(session)),
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    /// User type of the current session; admin when signed out
    pub async fn user_type(&self) -> UserType {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.user_type)
            .unwrap_or_default()
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn sign_in(&self, session: Session) {
        let user_type = session.user_type;
        *self.current.write().await = Some(session);
        self.broadcast(SessionEvent::SignedIn { user_type }).await;
    }

    pub async fn sign_out(&self) {
        let was_signed_in = self.current.write().await.take().is_some();
        if was_signed_in {
            self.broadcast(SessionEvent::SignedOut).await;
        }
    }

    /// Register a subscriber and return its id and event receiver
    pub async fn subscribe(&self) -> (SubscriberId, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = SubscriberId::new();
        self.subscribers.write().await.insert(id.clone(), tx);
        (id, rx)
    }

    pub async fn unsubscribe(&self, id: &SubscriberId) -> SharedResult<()> {
        self.subscribers
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SharedError::SubscriberNotFound {
                subscriber: id.to_string(),
            })
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    async fn broadcast(&self, event: SessionEvent) {
        let mut subscribers = self.subscribers.write().await;
        // Receivers dropped without unsubscribing are pruned here
        subscribers.retain(|id, tx| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                tracing::debug!(subscriber = %id, "Dropping closed session subscriber");
            }
            delivered
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_notifies_subscribers() {
        let context = SessionContext::new();
        let (_id, mut rx) = context.subscribe().await;

        context.sign_in(Session::new("abc", UserType::Merchant)).await;

        assert_eq!(
            rx.recv().await,
            Some(SessionEvent::SignedIn { user_type: UserType::Merchant })
        );
        assert_eq!(context.token().await.as_deref(), Some("abc"));
        assert_eq!(context.user_type().await, UserType::Merchant);
    }

    #[tokio::test]
    async fn test_unsubscribed_receiver_gets_nothing() {
        let context = SessionContext::new();
        let (id, mut rx) = context.subscribe().await;
        context.unsubscribe(&id).await.unwrap();

        context.sign_in(Session::new("abc", UserType::Admin)).await;

        assert_eq!(rx.recv().await, None);
        assert_eq!(context.subscriber_count().await, 0);
        assert!(context.unsubscribe(&id).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_silent() {
        let context = SessionContext::new();
        let (_id, mut rx) = context.subscribe().await;

        context.sign_out().await;

        assert!(rx.try_recv().is_err());
        assert_eq!(context.user_type().await, UserType::Admin);
    }

    #[tokio::test]
    async fn test_dropped_receivers_are_pruned() {
        let context = SessionContext::new();
        let (_id, rx) = context.subscribe().await;
        drop(rx);

        context.sign_in(Session::new("abc", UserType::Admin)).await;

        assert_eq!(context.subscriber_count().await, 0);
    }
}
