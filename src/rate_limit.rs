// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-client rate limiting for the public contact endpoint.
//!
//! Backed by a keyed `governor` limiter (GCRA). The quota is expressed as a
//! burst of `max_requests` cells, each cell replenishing after one full
//! `window`. That guarantees no client address ever gets more than
//! `max_requests` accepted requests inside any rolling `window`: the
//! (N+1)th request is accepted only once a full window has passed since the
//! first of the previous N.
//!
//! Per-key state is updated with a compare-and-swap, so concurrent requests
//! from the same address cannot race past the quota.
//!
//! Keys whose state has fully replenished carry no information and are
//! pruned once the table grows past a threshold.

use std::{net::IpAddr, num::NonZeroU32, time::Duration};

use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};

/// Contact submissions allowed per client per window.
pub const CONTACT_MAX_REQUESTS: NonZeroU32 = match NonZeroU32::new(3) {
    Some(n) => n,
    None => panic!("contact quota must be non-zero"),
};

/// Tracked client count above which stale entries are dropped.
pub const DEFAULT_PRUNE_THRESHOLD: usize = 10_000;

/// Rolling window for contact submissions.
pub const CONTACT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

/// Keyed rate limiter for contact submissions.
pub struct ContactRateLimiter<C: Clock = DefaultClock> {
    limiter: RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, C, NoOpMiddleware<C::Instant>>,
    prune_threshold: usize,
}

impl ContactRateLimiter {
    /// Limiter with the contact endpoint's quota (3 per rolling minute).
    pub fn for_contact_form() -> Self {
        Self::new(CONTACT_MAX_REQUESTS, CONTACT_WINDOW)
    }

    pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, &DefaultClock::default())
    }
}

impl<C: Clock> ContactRateLimiter<C> {
    /// Build a limiter on an explicit clock (tests drive a fake one).
    pub fn with_clock(max_requests: NonZeroU32, window: Duration, clock: &C) -> Self {
        let quota = Quota::with_period(window)
            .unwrap_or_else(|| Quota::per_minute(max_requests))
            .allow_burst(max_requests);

        Self {
            limiter: RateLimiter::new(quota, DefaultKeyedStateStore::default(), clock),
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
        }
    }

    /// Override the tracked-client count that triggers pruning.
    pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
        self.prune_threshold = threshold;
        self
    }

    /// Number of client addresses currently holding limiter state.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Record one request from `client` and decide whether it may proceed.
    pub fn check(&self, client: IpAddr) -> RateLimitDecision {
        if self.limiter.len() > self.prune_threshold {
            self.limiter.retain_recent();
            self.limiter.shrink_to_fit();
            tracing::debug!(
                remaining = self.limiter.len(),
                "pruned idle rate-limit entries"
            );
        }

        match self.limiter.check_key(&client) {
            Ok(()) => RateLimitDecision::Allowed,
            Err(_) => RateLimitDecision::Limited,
        }
    }
}
