//! Ground services and their status.

use serde::Serialize;

use crate::bus::names::lvar;

/// Status of one ground service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Inactive,
    Requested,
    Active,
    Completed,
    Disconnected,
}

impl ServiceStatus {
    /// Map a GSX state code.
    ///
    /// ```text
    /// <= 0  Disconnected
    /// 1..3  Inactive (available / not available / bypassed)
    /// 4     Requested
    /// 5     Active
    /// >= 6  Completed
    /// ```
    pub fn from_state_code(code: f64) -> Self {
        if code.is_nan() || code < 0.5 {
            ServiceStatus::Disconnected
        } else if code < 3.5 {
            ServiceStatus::Inactive
        } else if code < 4.5 {
            ServiceStatus::Requested
        } else if code < 5.5 {
            ServiceStatus::Active
        } else {
            ServiceStatus::Completed
        }
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceStatus::Inactive => write!(f, "inactive"),
            ServiceStatus::Requested => write!(f, "requested"),
            ServiceStatus::Active => write!(f, "active"),
            ServiceStatus::Completed => write!(f, "completed"),
            ServiceStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Tracked ground services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Refuel,
    Boarding,
    Deboarding,
    Catering,
    Pushback,
    Jetway,
    Stairs,
    Gpu,
    Pca,
    Chocks,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 10] = [
        ServiceKind::Refuel,
        ServiceKind::Boarding,
        ServiceKind::Deboarding,
        ServiceKind::Catering,
        ServiceKind::Pushback,
        ServiceKind::Jetway,
        ServiceKind::Stairs,
        ServiceKind::Gpu,
        ServiceKind::Pca,
        ServiceKind::Chocks,
    ];

    /// GSX state L-var for services reported by GSX.
    ///
    /// GPU, PCA and chocks are aircraft equipment and have no GSX state.
    pub fn state_lvar(self) -> Option<&'static str> {
        match self {
            ServiceKind::Refuel => Some(lvar::REFUELING_STATE),
            ServiceKind::Boarding => Some(lvar::BOARDING_STATE),
            ServiceKind::Deboarding => Some(lvar::DEBOARDING_STATE),
            ServiceKind::Catering => Some(lvar::CATERING_STATE),
            ServiceKind::Pushback => Some(lvar::DEPARTURE_STATE),
            ServiceKind::Jetway => Some(lvar::JETWAY_STATE),
            ServiceKind::Stairs => Some(lvar::STAIRS_STATE),
            ServiceKind::Gpu | ServiceKind::Pca | ServiceKind::Chocks => None,
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceKind::Refuel => "refuel",
            ServiceKind::Boarding => "boarding",
            ServiceKind::Deboarding => "deboarding",
            ServiceKind::Catering => "catering",
            ServiceKind::Pushback => "pushback",
            ServiceKind::Jetway => "jetway",
            ServiceKind::Stairs => "stairs",
            ServiceKind::Gpu => "gpu",
            ServiceKind::Pca => "pca",
            ServiceKind::Chocks => "chocks",
        };
        write!(f, "{}", name)
    }
}

/// Equipment status from an aircraft boolean.
pub fn equipment_status(connected: bool) -> ServiceStatus {
    if connected {
        ServiceStatus::Active
    } else {
        ServiceStatus::Inactive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_mapping() {
        assert_eq!(ServiceStatus::from_state_code(-1.0), ServiceStatus::Disconnected);
        assert_eq!(ServiceStatus::from_state_code(0.0), ServiceStatus::Disconnected);
        assert_eq!(ServiceStatus::from_state_code(1.0), ServiceStatus::Inactive);
        assert_eq!(ServiceStatus::from_state_code(2.0), ServiceStatus::Inactive);
        assert_eq!(ServiceStatus::from_state_code(3.0), ServiceStatus::Inactive);
        assert_eq!(ServiceStatus::from_state_code(4.0), ServiceStatus::Requested);
        assert_eq!(ServiceStatus::from_state_code(5.0), ServiceStatus::Active);
        assert_eq!(ServiceStatus::from_state_code(6.0), ServiceStatus::Completed);
        assert_eq!(ServiceStatus::from_state_code(7.0), ServiceStatus::Completed);
        assert_eq!(ServiceStatus::from_state_code(f64::NAN), ServiceStatus::Disconnected);
    }

    #[test]
    fn test_equipment_has_no_gsx_state() {
        assert!(ServiceKind::Gpu.state_lvar().is_none());
        assert_eq!(ServiceKind::Refuel.state_lvar(), Some(lvar::REFUELING_STATE));
        assert_eq!(ServiceKind::ALL.len(), 10);
    }
}
