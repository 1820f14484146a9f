//! Reading-time estimation and human-readable time buckets.

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

/// Whitespace-delimited word count, independent of how the body renders.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes needed to read `words` at `words_per_minute`, rounded up and never
/// below one minute.
pub fn minutes_for(words: usize, words_per_minute: u32) -> u32 {
    let rate = words_per_minute.max(1) as usize;
    let minutes = words.div_ceil(rate);
    u32::try_from(minutes).unwrap_or(u32::MAX).max(1)
}

/// Per-post label, e.g. `12 min read`.
pub fn label(minutes: u32) -> String {
    format!("{minutes} min read")
}

/// Series-level rollup label: minutes below an hour, hours and minutes above.
pub fn bucket_minutes(total_minutes: u32) -> String {
    if total_minutes < 60 {
        return format!("{total_minutes} min");
    }

    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        format!("{hours} h")
    } else {
        format!("{hours} h {minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_round_up_to_one_minute() {
        assert_eq!(minutes_for(0, DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(minutes_for(50, DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(label(minutes_for(50, DEFAULT_WORDS_PER_MINUTE)), "1 min read");
    }

    #[test]
    fn representative_long_body() {
        assert_eq!(minutes_for(2400, DEFAULT_WORDS_PER_MINUTE), 12);
        assert_eq!(
            label(minutes_for(2400, DEFAULT_WORDS_PER_MINUTE)),
            "12 min read"
        );
    }

    #[test]
    fn minutes_are_monotone_in_word_count() {
        let mut previous = 0;
        for words in [0, 1, 50, 199, 200, 201, 1000, 2400, 10_000] {
            let minutes = minutes_for(words, DEFAULT_WORDS_PER_MINUTE);
            assert!(minutes >= previous, "regressed at {words} words");
            previous = minutes;
        }
    }

    #[test]
    fn buckets_switch_to_hours() {
        assert_eq!(bucket_minutes(45), "45 min");
        assert_eq!(bucket_minutes(60), "1 h");
        assert_eq!(bucket_minutes(135), "2 h 15 min");
    }
}
