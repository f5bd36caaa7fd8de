use nalgebra::Vector3;

/// Axis-aligned box [mm]
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub lower_left: [f64; 3],
    pub upper_right: [f64; 3],
    pub center: [f64; 3],
    pub width: [f64; 3],
}

impl BoundingBox {
    pub fn new(lower_left: [f64; 3], upper_right: [f64; 3]) -> Self {
        let center = [
            0.5 * (lower_left[0] + upper_right[0]),
            0.5 * (lower_left[1] + upper_right[1]),
            0.5 * (lower_left[2] + upper_right[2]),
        ];
        let width = [
            upper_right[0] - lower_left[0],
            upper_right[1] - lower_left[1],
            upper_right[2] - lower_left[2],
        ];
        BoundingBox {
            lower_left,
            upper_right,
            center,
            width,
        }
    }

    /// Box of full widths `width` centred on `center`
    pub fn centered(center: [f64; 3], width: [f64; 3]) -> Self {
        Self::new(
            [
                center[0] - 0.5 * width[0],
                center[1] - 0.5 * width[1],
                center[2] - 0.5 * width[2],
            ],
            [
                center[0] + 0.5 * width[0],
                center[1] + 0.5 * width[1],
                center[2] + 0.5 * width[2],
            ],
        )
    }

    pub fn contains(&self, point: [f64; 3]) -> bool {
        (0..3).all(|i| point[i] >= self.lower_left[i] && point[i] <= self.upper_right[i])
    }

    /// Parametric entry/exit distances of the ray `origin + t * direction`
    /// (t >= 0), or `None` if the ray misses the box.
    pub fn intersect(&self, origin: [f64; 3], direction: [f64; 3]) -> Option<(f64, f64)> {
        let o = Vector3::from(origin);
        let d = Vector3::from(direction);
        let mut t_enter = 0.0f64;
        let mut t_exit = f64::INFINITY;
        for i in 0..3 {
            if d[i] == 0.0 {
                if o[i] < self.lower_left[i] || o[i] > self.upper_right[i] {
                    return None;
                }
                continue;
            }
            let t1 = (self.lower_left[i] - o[i]) / d[i];
            let t2 = (self.upper_right[i] - o[i]) / d[i];
            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));
            if t_enter > t_exit {
                return None;
            }
        }
        Some((t_enter, t_exit))
    }

    /// Path length [mm] of a straight line through the box, scaled by the
    /// direction norm. Zero when the line misses.
    pub fn chord_length(&self, origin: [f64; 3], direction: [f64; 3]) -> f64 {
        let norm = Vector3::from(direction).norm();
        match self.intersect(origin, direction) {
            Some((t_enter, t_exit)) => (t_exit - t_enter) * norm,
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_width() {
        let b = BoundingBox::new([-1.0, -5.0, -70.0], [1.0, 5.0, 70.0]);
        assert_eq!(b.center, [0.0, 0.0, 0.0]);
        assert_eq!(b.width, [2.0, 10.0, 140.0]);
        assert_eq!(BoundingBox::centered([0.0; 3], [2.0, 10.0, 140.0]), b);
    }

    #[test]
    fn test_contains() {
        let b = BoundingBox::new([0.0; 3], [1.0; 3]);
        assert!(b.contains([0.5, 0.5, 0.5]));
        assert!(b.contains([1.0, 0.0, 0.0]));
        assert!(!b.contains([1.1, 0.5, 0.5]));
    }

    #[test]
    fn test_chord_along_axis() {
        let b = BoundingBox::new([-1.0, -5.0, -70.0], [1.0, 5.0, 70.0]);
        let chord = b.chord_length([-200.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!((chord - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_chord_oblique() {
        let b = BoundingBox::new([-1.0, -5.0, -70.0], [1.0, 5.0, 70.0]);
        let s = 1.0 / 2f64.sqrt();
        let chord = b.chord_length([-10.0, 0.0, -9.0], [s, 0.0, s]);
        assert!((chord - 2.0 * 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_chord_miss_and_behind() {
        let b = BoundingBox::new([-1.0, -5.0, -70.0], [1.0, 5.0, 70.0]);
        assert_eq!(b.chord_length([-200.0, 50.0, 0.0], [1.0, 0.0, 0.0]), 0.0);
        assert_eq!(b.chord_length([200.0, 0.0, 0.0], [1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_chord_from_inside() {
        let b = BoundingBox::new([-1.0, -5.0, -70.0], [1.0, 5.0, 70.0]);
        let chord = b.chord_length([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        assert!((chord - 1.0).abs() < 1e-12);
    }
}
