use super::coordinator::{Entrance, RevealProfile};

const CARD_MARGIN: &str = "0px 0px -50px 0px";
const ABOUT_MARGIN: &str = "0px 0px -30px 0px";

/// How the page's counters find their number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CounterSource {
    None,
    /// The element itself holds the number (`data-number`, `data-counter` or
    /// the integer its text starts with).
    Own,
    /// A descendant matching this selector holds it.
    Child(&'static str),
}

/// One selector of the page markup and the reveal it gets.
#[derive(Clone, Debug)]
pub struct RevealGroup {
    pub selector: &'static str,
    pub profile: RevealProfile,
    pub counter: CounterSource,
}

fn group(selector: &'static str, profile: RevealProfile) -> RevealGroup {
    RevealGroup { selector, profile, counter: CounterSource::None }
}

fn cards(entrance: Entrance, stagger_ms: u32) -> RevealProfile {
    RevealProfile {
        threshold: 0.1,
        root_margin: CARD_MARGIN,
        stagger_ms,
        entrance,
        ..RevealProfile::default()
    }
}

fn about(entrance: Entrance, stagger_ms: u32) -> RevealProfile {
    RevealProfile {
        threshold: 0.2,
        root_margin: ABOUT_MARGIN,
        stagger_ms,
        entrance,
        ..RevealProfile::default()
    }
}

/// Every reveal group the site markup relies on. Groups whose selector
/// matches nothing on the current page are skipped.
pub fn site_groups() -> Vec<RevealGroup> {
    vec![
        group(".service__card", cards(Entrance::Rise, 100)),
        group(".gallery__item", cards(Entrance::Zoom, 80)),
        group(".testimonial__card", cards(Entrance::SlideLeft, 150)),
        group(".section__title", cards(Entrance::Drop, 0)),
        group(".section__subtitle", cards(Entrance::FadeUp, 0)),
        group(".faq__item", cards(Entrance::FadeUp, 100)),
        group(".timeline__item--left", about(Entrance::SlideLeft, 200)),
        group(".timeline__item:not(.timeline__item--left)", about(Entrance::SlideRight, 200)),
        group(".mission-vision__card, .certification__item, .team__card", about(Entrance::FadeUp, 100)),
        RevealGroup {
            selector: ".stat-about__item",
            profile: RevealProfile {
                threshold: 0.3,
                root_margin: "0px",
                stagger_ms: 200,
                entrance: Entrance::Rise,
                counter_delay_ms: 300,
                counter_duration_ms: 2000,
            },
            counter: CounterSource::Child(".stat-about__number"),
        },
        RevealGroup {
            selector: ".hero__stat-number, .counter, [data-counter]",
            profile: RevealProfile {
                threshold: 0.5,
                root_margin: "0px",
                counter_duration_ms: 2000,
                ..RevealProfile::default()
            },
            counter: CounterSource::Own,
        },
        // generic marker for markup added later; numbers go through `[data-counter]`
        group("[data-reveal]", cards(Entrance::FadeUp, 100)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_are_unique() {
        let groups = site_groups();
        let mut selectors: Vec<_> = groups.iter().map(|g| g.selector).collect();
        selectors.sort();
        selectors.dedup();
        assert_eq!(selectors.len(), groups.len());
    }

    #[test]
    fn counters_only_where_numbers_live() {
        let groups = site_groups();
        let stats = groups.iter().find(|g| g.selector == ".stat-about__item").unwrap();
        assert_eq!(stats.counter, CounterSource::Child(".stat-about__number"));
        assert_eq!(stats.profile.counter_delay_ms, 300);

        let cards = groups.iter().find(|g| g.selector == ".service__card").unwrap();
        assert_eq!(cards.counter, CounterSource::None);
        assert_eq!(cards.profile.stagger_ms, 100);
    }

    #[test]
    fn generic_reveal_never_counts() {
        let groups = site_groups();
        let generic = groups.iter().find(|g| g.selector == "[data-reveal]").unwrap();
        assert_eq!(generic.counter, CounterSource::None);

        let counters = groups
            .iter()
            .find(|g| g.selector == ".hero__stat-number, .counter, [data-counter]")
            .unwrap();
        assert_eq!(counters.counter, CounterSource::Own);
    }

    #[test]
    fn thresholds_are_fractions() {
        assert!(site_groups()
            .iter()
            .all(|g| g.profile.threshold > 0.0 && g.profile.threshold <= 1.0));
    }
}
