use super::MeasuredContentBox;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// A measurement is cached in two phases: the first observation is held as
/// pending, and only a second observation with unchanged pixel dimensions
/// promotes it. A size still settling (a late font swap mid-measure) keeps
/// replacing the pending slot and never reaches readers, so a transient
/// flash cannot poison the cache.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Pending(MeasuredContentBox),
    Confirmed(MeasuredContentBox),
}

/// Signature-keyed measurement cache shared by every preview target of a
/// session. Injectable so tests can isolate instances; safe to evict or
/// drop entirely at any time (only visual smoothness is lost).
#[derive(Default)]
pub struct MeasureCache {
    entries: RwLock<HashMap<String, Slot>>,
}

fn same_pixel_size(a: &MeasuredContentBox, b: &MeasuredContentBox) -> bool {
    a.width.round() == b.width.round() && a.height.round() == b.height.round()
}

impl MeasureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Confirmed measurement for a signature, if any. Pending observations
    /// are never served.
    pub async fn get(&self, signature: &str) -> Option<MeasuredContentBox> {
        match self.entries.read().await.get(signature) {
            Some(Slot::Confirmed(measured)) => Some(*measured),
            _ => None,
        }
    }

    /// Record one observation for a signature. Returns the confirmed value
    /// once the observation has been stable for two consecutive checks.
    pub async fn observe(
        &self,
        signature: &str,
        measured: MeasuredContentBox,
    ) -> Option<MeasuredContentBox> {
        let mut entries = self.entries.write().await;
        let slot = match entries.get(signature) {
            Some(Slot::Confirmed(prev)) if same_pixel_size(prev, &measured) => {
                Slot::Confirmed(*prev)
            }
            Some(Slot::Confirmed(_)) => {
                // Same signature measuring differently means an asset was
                // replaced under us; demote and re-confirm.
                debug!("Measurement for cached signature changed, re-confirming");
                Slot::Pending(measured)
            }
            Some(Slot::Pending(prev)) if same_pixel_size(prev, &measured) => {
                Slot::Confirmed(measured)
            }
            Some(Slot::Pending(_)) | None => Slot::Pending(measured),
        };
        entries.insert(signature.to_string(), slot);
        match slot {
            Slot::Confirmed(confirmed) => Some(confirmed),
            Slot::Pending(_) => None,
        }
    }

    pub async fn evict(&self, signature: &str) {
        self.entries.write().await.remove(signature);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn confirmed_len(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|slot| matches!(slot, Slot::Confirmed(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(width: f32, height: f32) -> MeasuredContentBox {
        MeasuredContentBox { width, height }
    }

    #[tokio::test]
    async fn test_single_observation_stays_pending() {
        let cache = MeasureCache::new();
        assert!(cache.observe("sig", boxed(80.0, 20.0)).await.is_none());
        assert!(
            cache.get("sig").await.is_none(),
            "Pending observations must not be served"
        );
    }

    #[tokio::test]
    async fn test_stable_observation_confirms() {
        let cache = MeasureCache::new();
        cache.observe("sig", boxed(80.0, 20.0)).await;
        let confirmed = cache.observe("sig", boxed(80.0, 20.0)).await;
        assert!(confirmed.is_some());
        assert_eq!(cache.get("sig").await.unwrap().width, 80.0);
    }

    #[tokio::test]
    async fn test_changing_observation_resets_stability() {
        let cache = MeasureCache::new();
        cache.observe("sig", boxed(80.0, 20.0)).await;
        // Font swap landed between frames: size changed, confirmation
        // starts over from the new value.
        assert!(cache.observe("sig", boxed(95.0, 22.0)).await.is_none());
        assert!(cache.get("sig").await.is_none());
        assert!(cache.observe("sig", boxed(95.0, 22.0)).await.is_some());
        assert_eq!(cache.get("sig").await.unwrap().width, 95.0);
    }

    #[tokio::test]
    async fn test_subpixel_jitter_still_confirms() {
        let cache = MeasureCache::new();
        cache.observe("sig", boxed(80.2, 20.1)).await;
        let confirmed = cache.observe("sig", boxed(80.4, 19.9)).await;
        assert!(
            confirmed.is_some(),
            "Stability is judged in whole pixels, not float identity"
        );
    }

    #[tokio::test]
    async fn test_eviction_is_harmless() {
        let cache = MeasureCache::new();
        cache.observe("sig", boxed(80.0, 20.0)).await;
        cache.observe("sig", boxed(80.0, 20.0)).await;
        cache.evict("sig").await;
        assert!(cache.get("sig").await.is_none());
        // Re-confirming works from scratch
        cache.observe("sig", boxed(80.0, 20.0)).await;
        assert!(cache.observe("sig", boxed(80.0, 20.0)).await.is_some());
    }
}
