use num_traits::Num;

/// Bracketing pair for `target` in a sorted slice of distinct values:
/// the greatest tabulated value <= target and the least tabulated value
/// >= target. Targets outside the tabulated range clamp to the nearest
/// edge value instead of extrapolating. `None` only for an empty slice.
pub fn bracket<T>(values: &[T], target: T) -> Option<(T, T)>
where
    T: PartialOrd + Copy,
{
    let (&first, &last) = (values.first()?, values.last()?);

    let lower = values
        .iter()
        .copied()
        .filter(|&v| v <= target)
        .last()
        .unwrap_or(first);
    let upper = values
        .iter()
        .copied()
        .find(|&v| v >= target)
        .unwrap_or(last);

    Some((lower, upper))
}

/// Linear interpolation between (p1, v1) and (p2, v2) evaluated at `target`.
/// A degenerate bracket (p1 == p2) yields v1: the target coincides with or
/// is clamped to that single grid point.
pub fn lerp<T>(v1: T, v2: T, p1: T, p2: T, target: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if p1 == p2 {
        return v1;
    }

    v1 + (v2 - v1) * (target - p1) / (p2 - p1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket() {
        assert_eq!(bracket::<f64>(&[], 1.0), None);

        let grid = [0.0, 500.0, 1000.0, 2500.0];

        assert_eq!(bracket(&grid, 750.0), Some((500.0, 1000.0)));
        assert_eq!(bracket(&grid, 500.0), Some((500.0, 500.0)));
        assert_eq!(bracket(&grid, 0.0), Some((0.0, 0.0)));
        assert_eq!(bracket(&grid, 2500.0), Some((2500.0, 2500.0)));
    }

    #[test]
    fn test_bracket_clamps_outside_range() {
        let grid = [-25.0, 0.0, 25.0, 50.0];

        assert_eq!(bracket(&grid, -40.0), Some((-25.0, -25.0)));
        assert_eq!(bracket(&grid, 80.0), Some((50.0, 50.0)));
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(100.0, 200.0, 0.0, 1000.0, 250.0), 125.0);
        assert_eq!(lerp(100.0, 200.0, 0.0, 1000.0, 0.0), 100.0);
        assert_eq!(lerp(100.0, 200.0, 0.0, 1000.0, 1000.0), 200.0);

        // Equal values are unaffected by the evaluation point.
        assert_eq!(lerp(7.0, 7.0, 0.0, 10.0, 123.0), 7.0);
    }

    #[test]
    fn test_lerp_degenerate_bracket() {
        assert_eq!(lerp(1.0, 99.0, 5.0, 5.0, 5.0), 1.0);
        assert_eq!(lerp(1.0, 99.0, 5.0, 5.0, 42.0), 1.0);
    }
}
