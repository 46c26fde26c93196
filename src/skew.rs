//! Peer Clock Skew Statistics
//!
//! Deterministic summaries over the clock skews reported by connected
//! peers. Used by the facade to answer "is our clock wrong, or are
//! theirs" without trusting any single peer.

/// Median skew in seconds over a sample set, or None when empty.
///
/// For even-sized sets this is the upper-middle element after sorting,
/// not the mean of the two middles; deterministic for a given set.
pub fn median(samples: &[i64]) -> Option<i64> {
    if samples.is_empty() {
        return None;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    Some(sorted[sorted.len() / 2])
}

/// Framed average skew in seconds: trim the extreme tails, then average.
///
/// `pct_to_include` selects how much of the (sorted) sample set to keep
/// around the centre; e.g. 75 keeps roughly the middle three quarters.
/// Trimming is symmetric: the same number of samples is discarded from
/// each end, so an odd discard count keeps one extra centre sample
/// rather than trimming unevenly. Returns 0 when there are no samples.
pub fn framed_average(samples: &[i64], pct_to_include: u8) -> i64 {
    if samples.is_empty() {
        return 0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let len = sorted.len();
    let frame = ((len * pct_to_include as usize) / 100).max(1);
    let drop_per_end = len.saturating_sub(frame) / 2;

    let kept = &sorted[drop_per_end..len - drop_per_end];
    let sum: i64 = kept.iter().sum();
    sum / kept.len() as i64
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[5, -3, 10]), Some(5));
        assert_eq!(median(&[0]), Some(0));
    }

    #[test]
    fn test_median_even_is_upper_middle() {
        assert_eq!(median(&[1, 2, 3, 4]), Some(3));
        assert_eq!(median(&[-10, 10]), Some(10));
    }

    #[test]
    fn test_median_ignores_input_order() {
        assert_eq!(median(&[10, -10, 0]), median(&[-10, 0, 10]));
    }

    #[test]
    fn test_framed_average_empty() {
        assert_eq!(framed_average(&[], 75), 0);
    }

    #[test]
    fn test_framed_average_drops_tails_symmetrically() {
        // 7 samples at 71%: frame of 4 rounds the discard down to one
        // sample per end, keeping the middle five.
        let samples = [-10, -5, 0, 0, 5, 10, 100];
        // kept: [-5, 0, 0, 5, 10], sum 10, avg 2
        assert_eq!(framed_average(&samples, 71), 2);
    }

    #[test]
    fn test_framed_average_full_inclusion() {
        let samples = [-10, 0, 10];
        assert_eq!(framed_average(&samples, 100), 0);
    }

    #[test]
    fn test_framed_average_never_empties_the_frame() {
        // Tiny inclusion percent still averages at least one sample.
        let samples = [1, 2, 3, 4, 5];
        let avg = framed_average(&samples, 1);
        assert_eq!(avg, 3);
    }

    #[test]
    fn test_framed_average_is_deterministic() {
        let samples = [3, -7, 12, 0, -1, 44, -44, 9];
        let first = framed_average(&samples, 75);
        for _ in 0..5 {
            assert_eq!(framed_average(&samples, 75), first);
        }
        // Input order must not matter
        let mut shuffled = samples;
        shuffled.reverse();
        assert_eq!(framed_average(&shuffled, 75), first);
    }

    #[test]
    fn test_framed_average_outlier_excluded() {
        // An extreme outlier on one end disappears once trimmed.
        let samples = [0, 0, 0, 0, 0, 0, 0, 0, 0, 1_000_000];
        assert_eq!(framed_average(&samples, 80), 0);
    }
}
