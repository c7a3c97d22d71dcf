use std::time::Duration;

use rand::{Rng, seq::IndexedRandom};
use tracing::debug;

use crate::dao::models::{Activatable, EntityId};

/// The two popup overlays a display cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupKind {
    /// Special offers.
    Offer,
    /// Motivational phrases.
    Phrase,
}

impl PopupKind {
    /// Selection interval as a multiple of the popup display duration.
    pub fn interval_multiplier(self) -> u32 {
        match self {
            Self::Offer => 3,
            Self::Phrase => 4,
        }
    }
}

/// Interval-driven random selection of one active item to overlay.
///
/// Every `duration × multiplier` seconds one active item is picked uniformly
/// at random and shown for `duration` seconds.
#[derive(Debug, Clone)]
pub struct PopupCycler {
    kind: PopupKind,
    duration_secs: u32,
    visible: Option<EntityId>,
}

impl PopupCycler {
    /// Cycler with nothing visible yet.
    pub fn new(kind: PopupKind, duration_secs: u32) -> Self {
        Self {
            kind,
            duration_secs,
            visible: None,
        }
    }

    /// Which overlay this cycler drives.
    pub fn kind(&self) -> PopupKind {
        self.kind
    }

    /// Item currently overlaid, if any.
    pub fn visible(&self) -> Option<EntityId> {
        self.visible
    }

    /// How long a selected item stays on screen. Zero counts as one second.
    pub fn display_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs.max(1)))
    }

    /// Time between two selections.
    pub fn interval_period(&self) -> Duration {
        self.display_duration() * self.kind.interval_multiplier()
    }

    /// Adopt a new display duration, returning whether it changed.
    pub fn set_duration(&mut self, duration_secs: u32) -> bool {
        let changed = self.duration_secs != duration_secs;
        self.duration_secs = duration_secs;
        changed
    }

    /// Run one selection interval.
    ///
    /// Nothing is selected when the cycler is disabled, when no item is
    /// active, or when `suppressed` is set (another overlay is on screen).
    /// Returns the newly visible id; the caller schedules [`Self::hide`]
    /// after [`Self::display_duration`].
    pub fn tick<T, R>(
        &mut self,
        enabled: bool,
        items: &[T],
        suppressed: bool,
        rng: &mut R,
    ) -> Option<EntityId>
    where
        T: Activatable,
        R: Rng + ?Sized,
    {
        if !enabled || suppressed {
            return None;
        }

        let active: Vec<&T> = items.iter().filter(|item| item.is_active()).collect();
        let picked = active.choose(rng)?.id();
        debug!(kind = ?self.kind, id = picked, candidates = active.len(), "popup selected");
        self.visible = Some(picked);
        Some(picked)
    }

    /// End the visible period started for `id`.
    ///
    /// A stale hide for an item that has since been replaced is ignored.
    pub fn hide(&mut self, id: EntityId) -> bool {
        if self.visible == Some(id) {
            self.visible = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use time::OffsetDateTime;

    use super::*;
    use crate::dao::models::{OfferEntity, PhraseEntity};

    fn offer(id: EntityId, active: bool) -> OfferEntity {
        OfferEntity {
            id,
            title: format!("offer {id}"),
            description: "half price".into(),
            active,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn phrase(id: EntityId) -> PhraseEntity {
        PhraseEntity {
            id,
            text: "PLAY IN OURS".into(),
            active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn intervals_scale_with_kind() {
        let offers = PopupCycler::new(PopupKind::Offer, 10);
        let phrases = PopupCycler::new(PopupKind::Phrase, 10);
        assert_eq!(offers.interval_period(), Duration::from_secs(30));
        assert_eq!(phrases.interval_period(), Duration::from_secs(40));
        assert_eq!(
            PopupCycler::new(PopupKind::Offer, 0).interval_period(),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn no_active_offers_never_fires() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cycler = PopupCycler::new(PopupKind::Offer, 10);
        let offers = [offer(1, false), offer(2, false)];

        for _ in 0..20 {
            assert_eq!(cycler.tick(true, &offers, false, &mut rng), None);
        }
        assert_eq!(cycler.visible(), None);
    }

    #[test]
    fn disabled_cycler_never_fires() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cycler = PopupCycler::new(PopupKind::Offer, 10);
        let offers = [offer(1, true)];

        for _ in 0..20 {
            assert_eq!(cycler.tick(false, &offers, false, &mut rng), None);
        }
    }

    #[test]
    fn only_active_items_are_selected() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut cycler = PopupCycler::new(PopupKind::Offer, 10);
        let offers = [offer(1, false), offer(2, true), offer(3, false), offer(4, true)];

        for _ in 0..50 {
            let picked = cycler.tick(true, &offers, false, &mut rng).unwrap();
            assert!(picked == 2 || picked == 4);
        }
    }

    #[test]
    fn suppressed_phrase_tick_is_skipped() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut cycler = PopupCycler::new(PopupKind::Phrase, 10);
        let phrases = [phrase(5)];

        assert_eq!(cycler.tick(true, &phrases, true, &mut rng), None);
        assert_eq!(cycler.tick(true, &phrases, false, &mut rng), Some(5));
    }

    #[test]
    fn stale_hide_is_ignored() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut cycler = PopupCycler::new(PopupKind::Phrase, 10);
        let phrases = [phrase(5)];
        cycler.tick(true, &phrases, false, &mut rng);

        assert!(!cycler.hide(6));
        assert_eq!(cycler.visible(), Some(5));
        assert!(cycler.hide(5));
        assert_eq!(cycler.visible(), None);
    }
}
