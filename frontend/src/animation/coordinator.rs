//! Scroll-reveal bookkeeping, independent of the DOM.
//!
//! The browser side feeds intersection ratios into [`Coordinator::on_intersect`]
//! and applies whatever [`RevealPlan`] comes back. Every watched target moves
//! from pending to revealed at most once.

pub type WatchId = usize;

/// Ratios reported by the browser can land a hair under the threshold that
/// triggered the callback.
const RATIO_EPSILON: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entrance {
    FadeUp,
    Rise,
    Zoom,
    SlideLeft,
    SlideRight,
    Drop,
}

impl Entrance {
    pub fn hidden_transform(self) -> &'static str {
        match self {
            Entrance::FadeUp => "translateY(30px)",
            Entrance::Rise => "translateY(50px) scale(0.9)",
            Entrance::Zoom => "scale(0.8)",
            Entrance::SlideLeft => "translateX(-50px)",
            Entrance::SlideRight => "translateX(50px)",
            Entrance::Drop => "translateY(-20px)",
        }
    }

    pub fn shown_transform(self) -> &'static str {
        match self {
            Entrance::FadeUp | Entrance::Drop => "translateY(0)",
            Entrance::Rise => "translateY(0) scale(1)",
            Entrance::Zoom => "scale(1)",
            Entrance::SlideLeft | Entrance::SlideRight => "translateX(0)",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealProfile {
    /// Fraction of the target that must be visible.
    pub threshold: f64,
    /// Passed through to the observer as its root margin.
    pub root_margin: &'static str,
    /// Delay per position inside the registered batch.
    pub stagger_ms: u32,
    pub entrance: Entrance,
    /// Extra wait between the reveal and the start of a count-up.
    pub counter_delay_ms: u32,
    pub counter_duration_ms: u32,
}

impl Default for RevealProfile {
    fn default() -> Self {
        RevealProfile {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px",
            stagger_ms: 0,
            entrance: Entrance::FadeUp,
            counter_delay_ms: 0,
            counter_duration_ms: 2000,
        }
    }
}

/// A target handed to [`Coordinator::register`], with the number it should
/// count up to when it carries one.
#[derive(Clone, Debug)]
pub struct Watched<T> {
    pub target: T,
    pub counter_target: Option<u64>,
}

impl<T> Watched<T> {
    pub fn new(target: T) -> Self {
        Watched { target, counter_target: None }
    }

    pub fn with_counter(mut self, value: Option<u64>) -> Self {
        self.counter_target = value;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterPlan {
    pub target: u64,
    pub start_after_ms: u32,
    pub duration_ms: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealPlan<T> {
    pub id: WatchId,
    pub target: T,
    pub delay_ms: u32,
    pub entrance: Entrance,
    /// Set when the reveal should skip transitions entirely.
    pub immediate: bool,
    pub counter: Option<CounterPlan>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    Pending,
    Revealed,
    Detached,
}

struct Entry<T> {
    target: T,
    profile: usize,
    batch_index: usize,
    counter_target: Option<u64>,
}

enum Slot<T> {
    Pending(Entry<T>),
    Revealed,
    Detached,
}

pub struct Coordinator<T> {
    profiles: Vec<RevealProfile>,
    slots: Vec<Slot<T>>,
}

impl<T: Clone> Default for Coordinator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Coordinator<T> {
    pub fn new() -> Self {
        Coordinator {
            profiles: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// Starts watching a batch of targets that share one profile. Ids are
    /// returned in batch order.
    pub fn register<I>(&mut self, batch: I, profile: RevealProfile) -> Vec<WatchId>
    where
        I: IntoIterator<Item = Watched<T>>,
    {
        let profile_index = self.profiles.len();
        self.profiles.push(profile);

        batch
            .into_iter()
            .enumerate()
            .map(|(batch_index, watched)| {
                let id = self.slots.len();
                self.slots.push(Slot::Pending(Entry {
                    target: watched.target,
                    profile: profile_index,
                    batch_index,
                    counter_target: watched.counter_target,
                }));
                id
            })
            .collect()
    }

    pub fn state(&self, id: WatchId) -> Option<WatchState> {
        self.slots.get(id).map(|slot| match slot {
            Slot::Pending(_) => WatchState::Pending,
            Slot::Revealed => WatchState::Revealed,
            Slot::Detached => WatchState::Detached,
        })
    }

    pub fn pending(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Pending(_)))
            .count()
    }

    /// The single mutation point for intersection reports. Returns a plan the
    /// first time the target is visible enough and `None` on every later call.
    pub fn on_intersect(&mut self, id: WatchId, ratio: f64) -> Option<RevealPlan<T>> {
        let threshold = match self.slots.get(id)? {
            Slot::Pending(entry) => self.profiles[entry.profile].threshold,
            _ => return None,
        };
        if ratio <= 0.0 || ratio + RATIO_EPSILON < threshold {
            return None;
        }
        self.take(id, false)
    }

    /// Detaches every pending target the predicate reports as gone and hands
    /// them back so the caller can stop observing them.
    pub fn prune<F>(&mut self, is_attached: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut gone = Vec::new();
        for slot in self.slots.iter_mut() {
            let detached = matches!(&*slot, Slot::Pending(entry) if !is_attached(&entry.target));
            if detached {
                if let Slot::Pending(entry) = std::mem::replace(slot, Slot::Detached) {
                    gone.push(entry.target);
                }
            }
        }
        gone
    }

    /// Fallback when the browser cannot report intersections: everything
    /// still pending is revealed at once, without transitions.
    pub fn reveal_all(&mut self) -> Vec<RevealPlan<T>> {
        (0..self.slots.len())
            .filter_map(|id| self.take(id, true))
            .collect()
    }

    fn take(&mut self, id: WatchId, immediate: bool) -> Option<RevealPlan<T>> {
        let slot = self.slots.get_mut(id)?;
        if !matches!(slot, Slot::Pending(_)) {
            return None;
        }
        let Slot::Pending(entry) = std::mem::replace(slot, Slot::Revealed) else {
            return None;
        };
        let profile = &self.profiles[entry.profile];

        let delay_ms = if immediate {
            0
        } else {
            profile.stagger_ms.saturating_mul(entry.batch_index as u32)
        };
        let counter = entry.counter_target.map(|target| CounterPlan {
            target,
            start_after_ms: if immediate { 0 } else { profile.counter_delay_ms },
            duration_ms: if immediate { 0 } else { profile.counter_duration_ms },
        });

        Some(RevealPlan {
            id,
            target: entry.target,
            delay_ms,
            entrance: profile.entrance,
            immediate,
            counter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staggered(ms: u32) -> RevealProfile {
        RevealProfile {
            stagger_ms: ms,
            ..RevealProfile::default()
        }
    }

    fn batch(names: &[&'static str]) -> Vec<Watched<&'static str>> {
        names.iter().map(|n| Watched::new(*n)).collect()
    }

    #[test]
    fn reveals_each_target_at_most_once() {
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(batch(&["a", "b"]), staggered(100));

        let first = coordinator.on_intersect(ids[0], 1.0).expect("first report reveals");
        assert_eq!(first.target, "a");
        assert_eq!(first.delay_ms, 0);

        for _ in 0..5 {
            assert!(coordinator.on_intersect(ids[0], 1.0).is_none());
            assert!(coordinator.on_intersect(ids[0], 0.0).is_none());
        }
        assert_eq!(coordinator.state(ids[0]), Some(WatchState::Revealed));
        assert_eq!(coordinator.pending(), 1);
    }

    #[test]
    fn stagger_follows_batch_position() {
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(batch(&["a", "b", "c"]), staggered(150));

        let third = coordinator.on_intersect(ids[2], 0.5).unwrap();
        let second = coordinator.on_intersect(ids[1], 0.5).unwrap();
        assert_eq!(third.delay_ms, 300);
        assert_eq!(second.delay_ms, 150);

        // a second batch starts counting from zero again
        let more = coordinator.register(batch(&["d"]), staggered(150));
        assert_eq!(coordinator.on_intersect(more[0], 0.5).unwrap().delay_ms, 0);
    }

    #[test]
    fn target_visible_at_registration_fires_on_initial_report() {
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(batch(&["hero"]), RevealProfile::default());
        assert_eq!(coordinator.state(ids[0]), Some(WatchState::Pending));

        // the observer's initial callback for an already visible target
        assert!(coordinator.on_intersect(ids[0], 1.0).is_some());
        assert!(coordinator.on_intersect(ids[0], 1.0).is_none());
    }

    #[test]
    fn below_threshold_keeps_waiting() {
        let mut coordinator = Coordinator::new();
        let profile = RevealProfile {
            threshold: 0.5,
            ..RevealProfile::default()
        };
        let ids = coordinator.register(batch(&["stats"]), profile);

        assert!(coordinator.on_intersect(ids[0], 0.2).is_none());
        assert!(coordinator.on_intersect(ids[0], 0.0).is_none());
        assert_eq!(coordinator.state(ids[0]), Some(WatchState::Pending));
        assert!(coordinator.on_intersect(ids[0], 0.4995).is_some());
    }

    #[test]
    fn detached_targets_never_reveal() {
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(batch(&["kept", "removed"]), RevealProfile::default());

        let gone = coordinator.prune(|target| *target != "removed");
        assert_eq!(gone, vec!["removed"]);
        assert_eq!(coordinator.state(ids[1]), Some(WatchState::Detached));
        assert!(coordinator.on_intersect(ids[1], 1.0).is_none());
        assert!(coordinator.reveal_all().iter().all(|plan| plan.target == "kept"));
    }

    #[test]
    fn fallback_reveals_everything_immediately() {
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(batch(&["a", "b", "c"]), staggered(200));
        coordinator.on_intersect(ids[0], 1.0);

        let plans = coordinator.reveal_all();
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|plan| plan.immediate && plan.delay_ms == 0));
        assert_eq!(coordinator.pending(), 0);
        assert!(coordinator.reveal_all().is_empty());
    }

    #[test]
    fn counter_targets_travel_with_the_plan() {
        let mut coordinator = Coordinator::new();
        let profile = RevealProfile {
            counter_delay_ms: 300,
            counter_duration_ms: 2000,
            ..RevealProfile::default()
        };
        let ids = coordinator.register(
            vec![Watched::new("projects").with_counter(Some(150)), Watched::new("label")],
            profile,
        );

        let counter = coordinator.on_intersect(ids[0], 1.0).unwrap().counter.unwrap();
        assert_eq!(counter, CounterPlan { target: 150, start_after_ms: 300, duration_ms: 2000 });
        assert!(coordinator.on_intersect(ids[1], 1.0).unwrap().counter.is_none());
    }

    #[test]
    fn text_without_a_leading_number_gets_no_counter() {
        use crate::animation::counter::parse_target;

        let text = "Más de 15 años pintando hogares";
        let mut coordinator = Coordinator::new();
        let ids = coordinator.register(
            vec![Watched::new(text).with_counter(parse_target(None, text))],
            RevealProfile::default(),
        );
        let plan = coordinator.on_intersect(ids[0], 1.0).unwrap();
        assert_eq!(plan.target, text);
        assert_eq!(plan.counter, None);
    }

    #[test]
    fn pruning_returns_targets_from_every_batch_with_their_owner() {
        // (owning watcher, element) pairs, as the page registers one batch per watcher
        let mut coordinator: Coordinator<(&str, &str)> = Coordinator::new();
        coordinator.register(
            vec![Watched::new(("cards", "card-1")), Watched::new(("cards", "card-2"))],
            RevealProfile::default(),
        );
        coordinator.register(
            vec![Watched::new(("gallery", "photo-1"))],
            RevealProfile::default(),
        );

        let gone = coordinator.prune(|(_, element)| *element == "card-1");
        assert_eq!(gone, vec![("cards", "card-2"), ("gallery", "photo-1")]);
        assert_eq!(coordinator.pending(), 1);
        assert_eq!(coordinator.prune(|_| false), vec![("cards", "card-1")]);
        assert_eq!(coordinator.pending(), 0);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut coordinator: Coordinator<&str> = Coordinator::new();
        assert!(coordinator.on_intersect(42, 1.0).is_none());
        assert_eq!(coordinator.state(42), None);
    }
}
