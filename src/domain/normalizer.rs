use crate::domain::models::{TouchPoint, ViewportSize};

/// Position expressed as whole percentages of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedPosition {
    pub percent_x: i32,
    pub percent_y: i32,
}

/// Convert a viewport position to percentages, truncating toward zero.
///
/// Returns `None` until the viewport has been measured. Positions outside the
/// viewport are passed through unclamped, so the receiver may see values
/// below 0 or above 100.
pub fn normalize(position: TouchPoint, viewport: ViewportSize) -> Option<NormalizedPosition> {
    if !viewport.is_measured() {
        return None;
    }

    let percent_x = (100.0 * position.x) / viewport.width;
    let percent_y = (100.0 * position.y) / viewport.height;

    Some(NormalizedPosition {
        percent_x: percent_x as i32,
        percent_y: percent_y as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(x: f32, y: f32, w: f32, h: f32) -> Option<(i32, i32)> {
        normalize(TouchPoint::new(x, y), ViewportSize::new(w, h))
            .map(|n| (n.percent_x, n.percent_y))
    }

    #[test]
    fn test_center() {
        assert_eq!(norm(50.0, 50.0, 100.0, 100.0), Some((50, 50)));
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        assert_eq!(norm(33.0, 67.0, 100.0, 100.0), Some((33, 67)));
        assert_eq!(norm(1.0, 2.0, 3.0, 3.0), Some((33, 66)));
        assert_eq!(norm(99.9, 0.99, 100.0, 100.0), Some((99, 0)));
    }

    #[test]
    fn test_non_square_viewport() {
        assert_eq!(norm(30.0, 60.0, 120.0, 120.0), Some((25, 50)));
        assert_eq!(norm(100.0, 100.0, 400.0, 200.0), Some((25, 50)));
    }

    #[test]
    fn test_out_of_bounds_is_not_clamped() {
        assert_eq!(norm(150.0, -20.0, 100.0, 100.0), Some((150, -20)));
        // Truncation goes toward zero for negatives as well
        assert_eq!(norm(-0.5, -1.5, 100.0, 100.0), Some((0, -1)));
    }

    #[test]
    fn test_unmeasured_viewport() {
        assert_eq!(norm(10.0, 10.0, 0.0, 0.0), None);
        assert_eq!(norm(10.0, 10.0, 100.0, 0.0), None);
        assert_eq!(norm(10.0, 10.0, 0.0, 100.0), None);
    }
}
