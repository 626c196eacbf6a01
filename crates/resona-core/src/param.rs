//! Automatable node parameters.
//!
//! An [`AudioParam`] holds exactly the value it was given. Range information
//! is descriptive: nodes clamp at the point of use (coefficient calculation,
//! gain application) so a caller always reads back what it wrote.

/// A named scalar parameter on a graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParam {
    name: &'static str,
    value: f32,
    default: f32,
    min: f32,
    max: f32,
}

impl AudioParam {
    /// Creates a parameter whose current value is its default.
    pub fn new(name: &'static str, default: f32, min: f32, max: f32) -> Self {
        Self {
            name,
            value: default,
            default,
            min,
            max,
        }
    }

    /// Parameter name, e.g. `"frequency"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Sets the current value. Returns `true` if it changed.
    pub fn set_value(&mut self, value: f32) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Value the parameter was created with.
    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Lower bound of the nominal range.
    pub fn min_value(&self) -> f32 {
        self.min
    }

    /// Upper bound of the nominal range.
    pub fn max_value(&self) -> f32 {
        self.max
    }

    /// Current value clamped into the nominal range.
    pub fn clamped(&self) -> f32 {
        self.value.clamp(self.min, self.max)
    }

    /// Restores the default value.
    pub fn reset(&mut self) {
        self.value = self.default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_value_verbatim() {
        let mut param = AudioParam::new("frequency", 350.0, 10.0, 24000.0);
        assert_eq!(param.value(), 350.0);
        assert!(param.set_value(30000.0));
        assert_eq!(param.value(), 30000.0);
        assert_eq!(param.clamped(), 24000.0);
    }

    #[test]
    fn set_value_reports_change() {
        let mut param = AudioParam::new("Q", 1.0, 0.0001, 1000.0);
        assert!(!param.set_value(1.0));
        assert!(param.set_value(2.0));
    }

    #[test]
    fn reset_restores_default() {
        let mut param = AudioParam::new("gain", 1.0, 0.0, 4.0);
        param.set_value(0.25);
        param.reset();
        assert_eq!(param.value(), param.default_value());
        assert_eq!(param.name(), "gain");
        assert_eq!(param.min_value(), 0.0);
        assert_eq!(param.max_value(), 4.0);
    }
}
