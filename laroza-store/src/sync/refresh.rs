//! Auto-refresh binding
//!
//! Lets a UI surface declare "I care about these collections" and get a
//! refresh callback for every matching change event: any action kind, any
//! originating tab or surface, the surface's own mutations included.
//! Dropping the binding unsubscribes, so a torn-down surface never gets a
//! stale callback.

use shared::sync::Collection;

use super::registry::Subscription;
use super::tab::TabContext;

/// A live interest-set binding. Keep it alive for the lifetime of the
/// owning surface; drop it on teardown.
pub struct AutoRefresh {
    subscription: Subscription,
}

impl AutoRefresh {
    /// Bind `on_refresh` to every event whose collection tag is in
    /// `interests`. An empty interest set never fires.
    ///
    /// Redundant refreshes are expected and fine; re-reading an
    /// unaffected collection is a cheap whole-array fetch.
    pub fn bind(
        tab: &TabContext,
        interests: &[Collection],
        on_refresh: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let interests = interests.to_vec();
        let subscription = tab.subscribe(move |event| {
            if interests.contains(&event.collection) {
                on_refresh();
            }
        });
        Self { subscription }
    }

    /// Tear the binding down early. Dropping does the same.
    pub fn close(&self) {
        self.subscription.unsubscribe();
    }
}

impl std::fmt::Debug for AutoRefresh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoRefresh").finish_non_exhaustive()
    }
}
