/// Settings for a [`Driver`](crate::handler::Driver).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveConfig {
    /// Maximum number of awaits answered between two outputs. `None` never
    /// gives up.
    ///
    /// Bounds machines that keep consuming input without producing anything,
    /// such as a filter that rejects every value of an endless stream.
    pub fuel: Option<usize>,
}

impl DriveConfig {
    pub const fn new() -> Self {
        DriveConfig { fuel: None }
    }

    pub const fn with_fuel(mut self, fuel: usize) -> Self {
        self.fuel = Some(fuel);
        self
    }

    pub(crate) fn out_of_fuel(&self, steps: usize) -> bool {
        self.fuel.is_some_and(|fuel| steps > fuel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        assert_eq!(DriveConfig::default(), DriveConfig::new());
        assert!(!DriveConfig::new().out_of_fuel(usize::MAX));
    }

    #[test]
    fn test_fuel_bound() {
        let config = DriveConfig::new().with_fuel(3);
        assert!(!config.out_of_fuel(3));
        assert!(config.out_of_fuel(4));
    }
}
