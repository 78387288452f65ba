//! Variable name catalogue.
//!
//! Names of every GSX L-var, simulation variable and aircraft dataref the
//! orchestrator touches. Keeping them in one place makes the external surface
//! easy to audit against the addon and aircraft documentation.

/// GSX L-vars (simulator variable space).
pub mod lvar {
    /// GSX background process (Couatl) is running.
    pub const COUATL_STARTED: &str = "FSDT_GSX_COUATL_STARTED";
    /// Menu open trigger.
    pub const MENU_OPEN: &str = "FSDT_GSX_MENU_OPEN";
    /// Menu choice (zero-based index).
    pub const MENU_CHOICE: &str = "FSDT_GSX_MENU_CHOICE";

    pub const REFUELING_STATE: &str = "FSDT_GSX_REFUELING_STATE";
    pub const CATERING_STATE: &str = "FSDT_GSX_CATERING_STATE";
    pub const BOARDING_STATE: &str = "FSDT_GSX_BOARDING_STATE";
    pub const DEBOARDING_STATE: &str = "FSDT_GSX_DEBOARDING_STATE";
    pub const DEPARTURE_STATE: &str = "FSDT_GSX_DEPARTURE_STATE";
    pub const JETWAY_STATE: &str = "FSDT_GSX_JETWAY";
    pub const STAIRS_STATE: &str = "FSDT_GSX_STAIRS";

    /// Fuel hose physically connected (0/1).
    pub const FUELHOSE_CONNECTED: &str = "FSDT_GSX_FUELHOSE_CONNECTED";
    /// Nose-wheel steering bypass pin inserted (0/1).
    pub const BYPASS_PIN: &str = "FSDT_GSX_BYPASS_PIN";

    pub const BOARDING_PAX_TOTAL: &str = "FSDT_GSX_NUMPASSENGERS_BOARDING_TOTAL";
    pub const DEBOARDING_PAX_TOTAL: &str = "FSDT_GSX_NUMPASSENGERS_DEBOARDING_TOTAL";
    pub const BOARDING_CARGO_PERCENT: &str = "FSDT_GSX_BOARDING_CARGO_PERCENT";
    pub const DEBOARDING_CARGO_PERCENT: &str = "FSDT_GSX_DEBOARDING_CARGO_PERCENT";
    /// Passenger count GSX should use for the current service.
    pub const NUM_PASSENGERS: &str = "FSDT_GSX_NUMPASSENGERS";

    pub const SERVICE_1_TOGGLE: &str = "FSDT_GSX_AIRCRAFT_SERVICE_1_TOGGLE";
    pub const SERVICE_2_TOGGLE: &str = "FSDT_GSX_AIRCRAFT_SERVICE_2_TOGGLE";
    pub const CARGO_1_TOGGLE: &str = "FSDT_GSX_AIRCRAFT_CARGO_1_TOGGLE";
    pub const CARGO_2_TOGGLE: &str = "FSDT_GSX_AIRCRAFT_CARGO_2_TOGGLE";
}

/// Simulation variables (simulator variable space).
pub mod simvar {
    pub const SIM_ON_GROUND: &str = "SIM ON GROUND";
    pub const GROUND_SPEED_KT: &str = "GPS GROUND SPEED";
    pub const THROTTLE_INPUT: &str = "GENERAL ENG THROTTLE LEVER POSITION:1";
}

/// Environment variables (simulator variable space).
pub mod envvar {
    pub const ZULU_TIME: &str = "ZULU TIME";
}

/// Aircraft-systems datarefs.
pub mod dataref {
    pub const BATTERY: &str = "system.switches.S_OH_ELEC_BAT1";
    pub const ENGINE_1_RAW: &str = "aircraft.engine1.raw";
    pub const ENGINE_2_RAW: &str = "aircraft.engine2.raw";
    pub const PARKING_BRAKE: &str = "system.switches.S_MIP_PARKING_BRAKE";
    pub const BEACON: &str = "system.switches.S_OH_EXT_LT_BEACON";
    /// External power switched onto the aircraft buses.
    pub const EXT_POWER: &str = "system.switches.S_OH_ELEC_GRD_PWR_PRIMARY";

    pub const GROUND_POWER: &str = "groundservice.groundpower";
    pub const PCA: &str = "groundservice.preconditionedAir";
    pub const CHOCKS: &str = "efb.chocks";

    pub const DOOR_FWD_LEFT: &str = "doors.entry.left.fwd";
    pub const DOOR_AFT_LEFT: &str = "doors.entry.left.aft";
    pub const DOOR_CARGO_FWD: &str = "doors.cargo.forward";
    pub const DOOR_CARGO_AFT: &str = "doors.cargo.aft";

    pub const FUEL_TOTAL_KG: &str = "aircraft.fuel.total.amount.kg";
    pub const PASSENGERS: &str = "aircraft.passengers.total";
    pub const CARGO_PERCENT: &str = "aircraft.cargo.percent";

    pub const HYDRAULIC_BLUE: &str = "aircraft.hydraulics.blue.quantity";
    pub const HYDRAULIC_GREEN: &str = "aircraft.hydraulics.green.quantity";
    pub const HYDRAULIC_YELLOW: &str = "aircraft.hydraulics.yellow.quantity";

    pub const FLIGHT_PLAN_ID: &str = "efb.flightplan.id";
    pub const FLIGHT_NUMBER: &str = "efb.flightplan.flightNumber";
    pub const PLANNED_FUEL_KG: &str = "efb.flightplan.fuel.planned.kg";
    pub const PLANNED_PAX: &str = "efb.flightplan.passengers";
    pub const PLANNED_CARGO_KG: &str = "efb.flightplan.cargo.kg";

    /// Free-text ACARS uplink shown on the cockpit printer.
    pub const ACARS_UPLINK: &str = "efb.acars.uplink";

    /// Freezes the aircraft position while GSX tows it.
    pub const POSITION_FREEZE: &str = "simulator.freeze.position";

    /// Hydraulic reservoirs restored on the next leg.
    pub const HYDRAULICS: [&str; 3] = [HYDRAULIC_BLUE, HYDRAULIC_GREEN, HYDRAULIC_YELLOW];
}
