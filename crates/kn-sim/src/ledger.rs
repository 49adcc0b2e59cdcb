use serde::{Deserialize, Serialize};

/// Bookkeeping of every way rest mass enters or leaves the mesh, per
/// steradian. With fixed boundaries and no floors, `balance` stays at zero to
/// roundoff.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MassLedger {
    /// Mass on the mesh when the run started
    pub initial: f64,
    /// Net mass carried out through the domain faces
    pub boundary_outflow: f64,
    /// Mass removed with excised blocks
    pub excised: f64,
    /// Mass seeded into blocks appended at the outer edge
    pub injected: f64,
    /// Mass added by density floors
    pub floored: f64,
}

impl MassLedger {
    pub fn new(initial: f64) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    /// Mass the mesh should hold according to the ledger.
    pub fn expected(&self) -> f64 {
        self.initial - self.boundary_outflow - self.excised + self.injected + self.floored
    }

    /// Relative discrepancy between `current` and the ledger.
    pub fn relative_error(&self, current: f64) -> f64 {
        let expected = self.expected();
        (current - expected).abs() / expected.abs().max(f64::MIN_POSITIVE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_mass_accounts_for_every_channel() {
        let ledger = MassLedger {
            initial: 10.0,
            boundary_outflow: 1.0,
            excised: 2.0,
            injected: 0.5,
            floored: 0.25,
        };
        assert_eq!(ledger.expected(), 7.75);
        assert_eq!(ledger.relative_error(7.75), 0.0);
    }
}
