//! Cache invalidation side-effect port.
//!
//! Grounded in the original `CreditCacheHandler`: a use case calls this
//! once after every successful session. The teacher contract has no
//! off-chain cache to invalidate (it publishes on-chain events instead);
//! this port is the layer those events would drive in a regular backend.

use uuid::Uuid;

pub trait CacheInvalidator {
    /// Invalidates whatever is cached for `tenant_id`. `slug`, if the
    /// caller has one handy, lets an implementation also clear
    /// slug-keyed cache entries.
    fn invalidate(&self, tenant_id: Uuid, slug: Option<&str>);
}

/// Default for callers with no cache layer wired up.
pub struct NoopCacheInvalidator;

impl CacheInvalidator for NoopCacheInvalidator {
    fn invalidate(&self, _tenant_id: Uuid, _slug: Option<&str>) {}
}

/// Records invalidations via `tracing` instead of touching a real cache —
/// useful in tests and as a template for a real key-value backed
/// implementation.
pub struct LoggingCacheInvalidator;

impl CacheInvalidator for LoggingCacheInvalidator {
    fn invalidate(&self, tenant_id: Uuid, slug: Option<&str>) {
        tracing::debug!(%tenant_id, ?slug, "invalidating credit cache");
    }
}
