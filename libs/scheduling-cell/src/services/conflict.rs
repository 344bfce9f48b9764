// libs/scheduling-cell/src/services/conflict.rs
use chrono::{DateTime, Utc};

/// Half-open interval intersection, shared by the slot booked-flag and the
/// booking overlap guard so both report the same conflicts.
///
/// Two windows overlap if:
/// start1 < end2 AND start2 < end1
///
/// Under `[start, end)` semantics a window ending exactly where another
/// begins does not overlap it.
pub fn windows_overlap(
    start1: DateTime<Utc>,
    end1: DateTime<Utc>,
    start2: DateTime<Utc>,
    end2: DateTime<Utc>,
) -> bool {
    start1 < end2 && start2 < end1
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 8, hour, minute, 0).unwrap()
    }

    #[test]
    fn partial_overlap_is_detected() {
        assert!(windows_overlap(at(9, 0), at(10, 0), at(9, 30), at(10, 30)));
    }

    #[test]
    fn containment_is_detected() {
        assert!(windows_overlap(at(9, 0), at(12, 0), at(10, 0), at(10, 30)));
        assert!(windows_overlap(at(10, 0), at(10, 30), at(9, 0), at(12, 0)));
    }

    #[test]
    fn identical_windows_overlap() {
        assert!(windows_overlap(at(9, 0), at(10, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (at(9, 0), at(10, 0), at(9, 30), at(10, 30)),
            (at(9, 0), at(10, 0), at(11, 0), at(12, 0)),
            (at(9, 0), at(10, 0), at(10, 0), at(11, 0)),
        ];
        for (s1, e1, s2, e2) in cases {
            assert_eq!(
                windows_overlap(s1, e1, s2, e2),
                windows_overlap(s2, e2, s1, e1)
            );
        }
    }

    #[test]
    fn back_to_back_windows_do_not_overlap() {
        assert!(!windows_overlap(at(9, 0), at(10, 0), at(10, 0), at(11, 0)));
        assert!(!windows_overlap(at(10, 0), at(11, 0), at(9, 0), at(10, 0)));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!windows_overlap(at(9, 0), at(10, 0), at(14, 0), at(15, 0)));
    }
}
