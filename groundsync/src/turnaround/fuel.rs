//! Fuel arithmetic for refuelling and leg carry-over.

/// Refuel counts as done once within this many kilograms of the target.
pub const REFUEL_TOLERANCE_KG: f64 = 1.0;

/// Fuel loaded before refuelling when the tanks hold more than planned.
pub const INITIAL_FUEL_KG: f64 = 1500.0;

/// Result of one refuel step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefuelProgress {
    /// Still transferring; new fuel quantity.
    Transferring(f64),
    /// Within tolerance; quantity snapped to the target.
    Complete(f64),
}

impl RefuelProgress {
    pub fn quantity(self) -> f64 {
        match self {
            RefuelProgress::Transferring(q) | RefuelProgress::Complete(q) => q,
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, RefuelProgress::Complete(_))
    }
}

/// Target quantity for a planned block fuel.
pub fn refuel_target(planned_kg: f64) -> f64 {
    planned_kg.ceil()
}

/// Quantity to set at the start of a leg, if any.
///
/// Empty tanks win, then carried-over fuel, then the fixed initial quantity
/// when the tanks hold more than planned.
pub fn initial_fuel(
    current_kg: f64,
    planned_kg: f64,
    zero_fuel_start: bool,
    carried_kg: Option<f64>,
) -> Option<f64> {
    if zero_fuel_start {
        Some(0.0)
    } else if let Some(carried) = carried_kg {
        Some(carried)
    } else if current_kg > planned_kg {
        Some(INITIAL_FUEL_KG)
    } else {
        None
    }
}

/// Move `current_kg` towards `target_kg` by at most `rate_kg`.
///
/// `rate_kg` must be positive.
pub fn refuel_step(current_kg: f64, target_kg: f64, rate_kg: f64) -> RefuelProgress {
    let gap = target_kg - current_kg;
    if gap.abs() < REFUEL_TOLERANCE_KG {
        return RefuelProgress::Complete(target_kg);
    }

    let next = current_kg + gap.signum() * rate_kg.min(gap.abs());
    if (target_kg - next).abs() < REFUEL_TOLERANCE_KG {
        RefuelProgress::Complete(target_kg)
    } else {
        RefuelProgress::Transferring(next)
    }
}
