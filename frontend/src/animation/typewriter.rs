/// Types `text` out one character every `char_ms`.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    char_ms: u32,
    char_count: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, char_ms: u32) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Typewriter { text, char_ms, char_count }
    }

    fn shown_chars(&self, elapsed_ms: f64) -> usize {
        if self.char_ms == 0 {
            return self.char_count;
        }
        if elapsed_ms <= 0.0 {
            return 0;
        }
        // first character lands after one tick
        let ticks = (elapsed_ms / self.char_ms as f64).floor() as usize;
        ticks.min(self.char_count)
    }

    /// Prefix visible after `elapsed_ms`, always cut on a char boundary.
    pub fn advance(&self, elapsed_ms: f64) -> &str {
        let shown = self.shown_chars(elapsed_ms);
        match self.text.char_indices().nth(shown) {
            Some((byte_index, _)) => &self.text[..byte_index],
            None => &self.text,
        }
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.shown_chars(elapsed_ms) >= self.char_count
    }

    pub fn duration_ms(&self) -> u64 {
        self.char_count as u64 * self.char_ms as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotatorFrame {
    pub index: usize,
    pub fading: bool,
}

/// Cycles the hero title through a list of words. The first swap happens
/// at `start_ms + interval_ms`; each swap fades the old word out for
/// `fade_ms` before the next one appears.
#[derive(Clone, Debug)]
pub struct WordRotator {
    words: Vec<String>,
    start_ms: u32,
    interval_ms: u32,
    fade_ms: u32,
}

impl WordRotator {
    fn new(words: Vec<String>, start_ms: u32, interval_ms: u32, fade_ms: u32) -> Self {
        WordRotator { words, start_ms, interval_ms, fade_ms }
    }

    /// Parses a `data-words` attribute ("Interior, Exterior,Commercial").
    pub fn from_attribute(raw: &str, start_ms: u32, interval_ms: u32, fade_ms: u32) -> Option<Self> {
        let words: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Self::new(words, start_ms, interval_ms, fade_ms))
    }

    pub fn word(&self, index: usize) -> &str {
        index
            .checked_rem(self.words.len())
            .and_then(|i| self.words.get(i))
            .map_or("", String::as_str)
    }

    pub fn phase(&self, elapsed_ms: f64) -> RotatorFrame {
        let len = self.words.len();
        let since_start = elapsed_ms - self.start_ms as f64;
        if len < 2 || self.interval_ms == 0 || since_start < self.interval_ms as f64 {
            return RotatorFrame { index: 0, fading: false };
        }

        let interval = self.interval_ms as f64;
        let swaps = (since_start / interval).floor() as usize;
        let into_swap = since_start - swaps as f64 * interval;
        if into_swap < self.fade_ms as f64 {
            RotatorFrame { index: (swaps - 1) % len, fading: true }
        } else {
            RotatorFrame { index: swaps % len, fading: false }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typewriter_reveals_one_char_per_tick() {
        let tw = Typewriter::new("Pintura", 50);
        assert_eq!(tw.advance(0.0), "");
        assert_eq!(tw.advance(49.0), "");
        assert_eq!(tw.advance(50.0), "P");
        assert_eq!(tw.advance(175.0), "Pin");
        assert_eq!(tw.advance(10_000.0), "Pintura");
        assert!(!tw.is_finished(300.0));
        assert!(tw.is_finished(350.0));
        assert_eq!(tw.duration_ms(), 350);
    }

    #[test]
    fn typewriter_respects_multibyte_characters() {
        let tw = Typewriter::new("Diseño ñ", 10);
        assert_eq!(tw.advance(60.0), "Diseño");
        assert_eq!(tw.advance(80.0), "Diseño ñ");
    }

    #[test]
    fn rotator_holds_then_cycles_with_fade() {
        let rotator = WordRotator::from_attribute("Interior, Exterior,Comercial", 2000, 3000, 200).unwrap();
        assert_eq!(rotator.phase(0.0), RotatorFrame { index: 0, fading: false });
        assert_eq!(rotator.phase(4999.0), RotatorFrame { index: 0, fading: false });
        assert_eq!(rotator.phase(5000.0), RotatorFrame { index: 0, fading: true });
        assert_eq!(rotator.phase(5200.0), RotatorFrame { index: 1, fading: false });
        assert_eq!(rotator.phase(8100.0), RotatorFrame { index: 1, fading: true });
        assert_eq!(rotator.phase(11_500.0), RotatorFrame { index: 0, fading: false });
        assert_eq!(rotator.word(1), "Exterior");
    }

    #[test]
    fn rotator_needs_words() {
        assert!(WordRotator::from_attribute(" , ", 0, 1000, 100).is_none());
        let single = WordRotator::from_attribute("Solo", 0, 1000, 100).unwrap();
        assert_eq!(single.phase(50_000.0), RotatorFrame { index: 0, fading: false });
    }

    #[test]
    fn empty_rotator_does_not_panic() {
        let empty = WordRotator::new(Vec::new(), 0, 1000, 100);
        assert_eq!(empty.word(3), "");
        assert_eq!(empty.phase(9_000.0), RotatorFrame { index: 0, fading: false });
    }
}
