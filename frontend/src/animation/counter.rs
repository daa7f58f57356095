/// Linear count-up from zero to `target`, sampled by elapsed time.
#[derive(Clone, Debug, PartialEq)]
pub struct CounterTween {
    target: u64,
    duration_ms: u32,
}

impl CounterTween {
    pub fn new(target: u64, duration_ms: u32) -> Self {
        CounterTween { target, duration_ms }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Integer value to display after `elapsed_ms`. Never above the target and
    /// exactly the target once the duration has passed.
    pub fn advance(&self, elapsed_ms: f64) -> u64 {
        if self.duration_ms == 0 || elapsed_ms >= self.duration_ms as f64 {
            return self.target;
        }
        if elapsed_ms <= 0.0 {
            return 0;
        }
        let progress = elapsed_ms / self.duration_ms as f64;
        let value = (self.target as f64 * progress).floor() as u64;
        value.min(self.target)
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.duration_ms == 0 || elapsed_ms >= self.duration_ms as f64
    }
}

/// Decoration kept around the number while it counts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CounterFormat {
    pub suffix: String,
}

impl CounterFormat {
    /// Picks up a trailing `+` or `%` from the text the element shipped with.
    pub fn from_text(text: &str) -> Self {
        let mut suffix = String::new();
        if text.contains('+') {
            suffix.push('+');
        }
        if text.contains('%') {
            suffix.push('%');
        }
        CounterFormat { suffix }
    }

    pub fn render(&self, value: u64) -> String {
        format!("{}{}", value, self.suffix)
    }
}

/// Reads a count-up target from a `data-number` value, falling back to the
/// integer the element's text starts with ("150+" gives 150). Text that does
/// not start with a number has no target.
pub fn parse_target(data_number: Option<&str>, text: &str) -> Option<u64> {
    if let Some(value) = data_number.and_then(leading_number) {
        return Some(value);
    }
    leading_number(text)
}

fn leading_number(raw: &str) -> Option<u64> {
    let raw = raw.trim_start();
    let unsigned = raw.strip_prefix('+').unwrap_or(raw);
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_exactly_on_target_without_overshoot() {
        for target in [0u64, 1, 7, 99, 100, 150, 2023, 98_765] {
            let tween = CounterTween::new(target, 2000);
            let mut last = 0;
            let mut elapsed = 0.0;
            while !tween.is_finished(elapsed) {
                let value = tween.advance(elapsed);
                assert!(value <= target);
                assert!(value >= last, "count never goes backwards");
                last = value;
                elapsed += 16.7;
            }
            assert_eq!(tween.advance(elapsed), target);
        }
    }

    #[test]
    fn samples_are_floored() {
        let tween = CounterTween::new(10, 1000);
        assert_eq!(tween.advance(0.0), 0);
        assert_eq!(tween.advance(99.0), 0);
        assert_eq!(tween.advance(100.0), 1);
        assert_eq!(tween.advance(999.9), 9);
        assert_eq!(tween.advance(1000.0), 10);
        assert_eq!(tween.advance(5000.0), 10);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let tween = CounterTween::new(42, 0);
        assert!(tween.is_finished(0.0));
        assert_eq!(tween.advance(0.0), 42);
    }

    #[test]
    fn suffix_comes_from_original_text() {
        assert_eq!(CounterFormat::from_text("500+").render(12), "12+");
        assert_eq!(CounterFormat::from_text("100%").render(100), "100%");
        assert_eq!(CounterFormat::from_text("15").render(3), "3");
    }

    #[test]
    fn targets_prefer_data_number() {
        assert_eq!(parse_target(Some("250"), "0"), Some(250));
        assert_eq!(parse_target(None, "150+"), Some(150));
        assert_eq!(parse_target(Some("n/a"), "98%"), Some(98));
        assert_eq!(parse_target(None, "many"), None);
    }

    #[test]
    fn only_a_leading_integer_is_a_target() {
        assert_eq!(parse_target(None, "Más de 15 años pintando hogares"), None);
        assert_eq!(parse_target(None, "  +500 clientes"), Some(500));
        assert_eq!(parse_target(None, "-3"), None);
        assert_eq!(parse_target(Some("12 proyectos"), "x"), Some(12));
    }
}
