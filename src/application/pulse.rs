/// A triangle wave over [0, 1], advanced by a fixed increment per frame.
///
/// The direction flips once the raw value has left the range, so the raw
/// value may overshoot a bound by at most one increment; `value` is clamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorPulse {
    value: f32,
    step: f32,
    increment: f32,
}

impl ColorPulse {
    pub fn new(increment: f32) -> Self {
        Self::with_value(0.0, increment)
    }

    /// Starts the wave at `value`, moving upwards.
    pub fn with_value(value: f32, increment: f32) -> Self {
        let increment = increment.abs();
        ColorPulse {
            value,
            step: increment,
            increment,
        }
    }

    pub fn advance(&mut self) -> f32 {
        if self.value > 1.0 {
            self.step = -self.increment;
        } else if self.value < 0.0 {
            self.step = self.increment;
        }

        self.value += self.step;
        self.value()
    }

    /// The current value, within [0, 1].
    #[inline]
    pub fn value(&self) -> f32 {
        self.value.max(0.0).min(1.0)
    }

    #[inline]
    pub fn raw(&self) -> f32 {
        self.value
    }

    /// Whether the wave is currently rising.
    #[inline]
    pub fn is_rising(&self) -> bool {
        self.step > 0.0
    }
}

impl Default for ColorPulse {
    fn default() -> Self {
        ColorPulse::new(0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded() {
        let mut pulse = ColorPulse::new(0.05);
        for _ in 0..1000 {
            let v = pulse.advance();
            assert!(v >= 0.0 && v <= 1.0);
            assert!(pulse.raw() > -0.05 - 1e-4 && pulse.raw() < 1.05 + 1e-4);
        }
    }

    #[test]
    fn reverses_above_one() {
        let mut pulse = ColorPulse::with_value(1.02, 0.05);
        assert!(pulse.is_rising());

        pulse.advance();
        assert!(!pulse.is_rising());
        assert!((pulse.raw() - 0.97).abs() < 1e-6);
        assert!(pulse.value() < 1.0);
    }

    #[test]
    fn reverses_below_zero() {
        let mut pulse = ColorPulse::with_value(0.5, 0.05);
        pulse.step = -0.05;
        pulse.value = -0.01;

        pulse.advance();
        assert!(pulse.is_rising());
        assert!((pulse.raw() - 0.04).abs() < 1e-6);
    }

    #[test]
    fn keeps_direction_inside() {
        let mut pulse = ColorPulse::new(0.05);
        let mut last = pulse.raw();
        for _ in 0..20 {
            pulse.advance();
            assert!(pulse.raw() > last);
            last = pulse.raw();
        }

        assert!(pulse.raw() > 0.99);
        while pulse.raw() <= 1.0 {
            pulse.advance();
        }

        let peak = pulse.raw();
        pulse.advance();
        assert!(pulse.raw() < peak);
    }
}
