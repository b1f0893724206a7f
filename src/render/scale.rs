//! Linear scales, rebuilt from the filtered rows on every render.

/// A linear mapping from a data domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Domain `[min(0, observed_min), observed_max]` over `values`.
    ///
    /// The lower bound is anchored at zero unless the data goes negative. An
    /// empty input gives the degenerate domain `[0, 0]`.
    pub fn zero_anchored<I>(values: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }
        let domain = if max.is_finite() {
            (min.min(0.0), max)
        } else {
            (0.0, 0.0)
        };
        Self::new(domain, range)
    }

    /// Map a domain value into the range. A zero-width domain maps everything
    /// to the range start.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Evenly spaced tick values on "nice" steps, inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.domain;
        if count == 0 || !d0.is_finite() || !d1.is_finite() {
            return Vec::new();
        }
        if d0 == d1 {
            return vec![d0];
        }
        let (lo, hi) = if d0 < d1 { (d0, d1) } else { (d1, d0) };
        let step = nice_step((hi - lo) / count as f64);
        if step == 0.0 {
            return vec![lo, hi];
        }
        let start = (lo / step).ceil() as i64;
        let stop = (hi / step).floor() as i64;
        (start..=stop).map(|i| i as f64 * step).collect()
    }
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// Format a numeric value for axis tick labels.
pub fn format_tick_value(val: f64) -> String {
    if val.abs() >= 1e6 || (val != 0.0 && val.abs() < 1e-3) {
        format!("{val:.2e}")
    } else if val == 0.0 {
        "0".to_string()
    } else {
        let s = format!("{val:.6}");
        let s = s.trim_end_matches('0');
        let s = s.trim_end_matches('.');
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_data_is_anchored_at_zero() {
        let s = LinearScale::zero_anchored([20.0, 45.0, 30.0], (0.0, 640.0));
        assert_eq!(s.domain(), (0.0, 45.0));
        assert_eq!(s.map(45.0), 640.0);
        assert_eq!(s.map(0.0), 0.0);
    }

    #[test]
    fn negative_data_extends_below_zero() {
        let s = LinearScale::zero_anchored([-10.0, 5.0], (0.0, 100.0));
        assert_eq!(s.domain(), (-10.0, 5.0));
    }

    #[test]
    fn all_negative_keeps_observed_max() {
        let s = LinearScale::zero_anchored([-10.0, -2.0], (0.0, 100.0));
        assert_eq!(s.domain(), (-10.0, -2.0));
    }

    #[test]
    fn empty_input_is_degenerate_not_nan() {
        let s = LinearScale::zero_anchored(std::iter::empty(), (460.0, 0.0));
        assert_eq!(s.domain(), (0.0, 0.0));
        assert_eq!(s.map(12.0), 460.0);
        assert_eq!(s.ticks(10), vec![0.0]);
    }

    #[test]
    fn inverted_range_maps_top_down() {
        let s = LinearScale::new((0.0, 100.0), (460.0, 0.0));
        assert_eq!(s.map(0.0), 460.0);
        assert_eq!(s.map(100.0), 0.0);
        assert_eq!(s.map(50.0), 230.0);
    }

    #[test]
    fn ticks_are_nice_and_inside_domain() {
        let s = LinearScale::new((0.0, 47.0), (0.0, 1.0));
        assert_eq!(s.ticks(10), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0]);
    }

    #[test]
    fn tick_labels_trim_trailing_zeros() {
        assert_eq!(format_tick_value(0.0), "0");
        assert_eq!(format_tick_value(2.5), "2.5");
        assert_eq!(format_tick_value(40.0), "40");
    }
}
