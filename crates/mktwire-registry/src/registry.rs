//! Subscription registry keyed by correlation token.
//!
//! Populated once at startup, read-only afterwards. The gateway owns
//! the registry exclusively; events resolve against it on every
//! dispatch.

use crate::error::{RegistryError, RegistryResult};
use mktwire_core::{CorrelationToken, Subscription};
use std::collections::HashMap;
use tracing::debug;

/// Maps correlation tokens to their subscription descriptors.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<CorrelationToken, Subscription>,
    /// Insertion order, so `all()` iterates the way subscriptions were
    /// configured.
    order: Vec<CorrelationToken>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one subscription.
    ///
    /// Fails if the token is already present; the registry is never
    /// silently overwritten.
    pub fn register(&mut self, subscription: Subscription) -> RegistryResult<()> {
        let token = subscription.token.clone();
        if self.subscriptions.contains_key(&token) {
            return Err(RegistryError::DuplicateToken(token));
        }
        debug!(
            token = %token,
            topic = %subscription.topic,
            feed_kind = %subscription.feed_kind,
            "Subscription registered"
        );
        self.order.push(token.clone());
        self.subscriptions.insert(token, subscription);
        Ok(())
    }

    /// Look up the subscription for a token. Misses return None.
    pub fn resolve(&self, token: &CorrelationToken) -> Option<&Subscription> {
        self.subscriptions.get(token)
    }

    /// All registered subscriptions, in registration order.
    pub fn all(&self) -> impl Iterator<Item = &Subscription> {
        self.order
            .iter()
            .filter_map(|token| self.subscriptions.get(token))
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Distinct vendor services required by the registered
    /// subscriptions, in first-use order.
    pub fn required_services(&self) -> Vec<String> {
        let mut services: Vec<String> = Vec::new();
        for sub in self.all() {
            let service = sub.service();
            if !services.iter().any(|s| s == service) {
                services.push(service.to_string());
            }
        }
        services
    }
}
