//! Numerically stable accumulation primitives for curve integration.

/// Compensated (Neumaier) running sum.
///
/// Trapezoid areas on large curves are many small positive terms added to a
/// growing total; plain summation loses the low-order bits of each term.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    /// Start from zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one term.
    pub fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    /// Current compensated total.
    pub fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Compensated sum of a sequence.
///
/// Returns 0.0 for empty input.
pub fn stable_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = NeumaierSum::new();
    for v in values {
        acc.add(v);
    }
    acc.value()
}

/// Clamp a rate or area into [0, 1].
///
/// NaN passes through unchanged so callers can still detect it.
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() {
        return x;
    }
    x.clamp(0.0, 1.0)
}
