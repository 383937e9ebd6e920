// Math utilities and helper functions

/// Clamp a value between min and max
///
/// Unlike `f32::clamp` this never panics when `min > max`; the lower bound
/// wins, which keeps a sprite pinned to the left edge of a surface narrower
/// than itself.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    let value = if value > max { max } else { value };
    if value < min {
        min
    } else {
        value
    }
}

/// Offset that centers a span of `inner` length inside a span of `outer` length.
/// Negative when `inner` is larger than `outer`.
pub fn centered_offset(outer: f32, inner: f32) -> f32 {
    ((outer - inner) / 2.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_clamp_inverted_bounds_prefers_min() {
        assert_eq!(clamp(3.0, 4.0, 2.0), 4.0);
        assert_eq!(clamp(5.0, 4.0, 2.0), 4.0);
    }

    #[test]
    fn test_centered_offset() {
        assert_eq!(centered_offset(100.0, 64.0), 18.0);
        assert_eq!(centered_offset(64.0, 64.0), 0.0);
        assert_eq!(centered_offset(50.0, 64.0), -7.0);
    }
}
