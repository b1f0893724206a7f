/// Summary of one attribute over the currently plotted rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl AttributeSummary {
    /// Compute count/min/max/mean, ignoring NaN. `None` when nothing is left.
    pub fn compute<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for v in values.into_iter().filter(|v| !v.is_nan()) {
            count += 1;
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        if count == 0 {
            return None;
        }
        Some(AttributeSummary {
            count,
            min,
            max,
            mean: sum / count as f64,
        })
    }

    /// One-line report for the side panel.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}: n={}  min={:.2}  max={:.2}  mean={:.2}",
            label, self.count, self.min, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_nan() {
        let s = AttributeSummary::compute([3.0, f64::NAN, -1.0, 4.0]).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.min, -1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.mean, 2.0);
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(AttributeSummary::compute(std::iter::empty()), None);
        assert_eq!(AttributeSummary::compute([f64::NAN]), None);
    }
}
