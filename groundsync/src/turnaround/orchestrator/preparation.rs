//! Preflight preparation and equipment connection.

use crate::bus::names::{dataref, lvar};
use crate::bus::{DataValue, MenuEntry, REPOSITION_GATE_ITEM};

use super::super::constants::GSX_NOT_AVAILABLE;
use super::super::fuel;
use super::super::phase::FlightPhase;
use super::super::service::{ServiceKind, ServiceStatus};
use super::{Orchestrator, StepResult};

/// Whether a jetway/stairs state code means the equipment exists here.
fn available(code: f64) -> bool {
    code >= 0.5 && (code - GSX_NOT_AVAILABLE).abs() >= 0.5
}

impl Orchestrator {
    pub(super) fn step_preflight(&mut self) -> StepResult {
        let on_ground = self.on_ground()?;
        let engines_off = self.engines_off()?;

        if !self.entry_checked {
            self.entry_checked = true;
            if !on_ground || !engines_off {
                tracing::info!(
                    on_ground,
                    engines_off,
                    "Not cold and dark at startup, skipping ground services"
                );
                self.transition(FlightPhase::Flight);
                return Ok(());
            }
        }

        if !self.prepare_aircraft()? {
            return Ok(());
        }
        self.connect_ground_equipment()?;

        if on_ground && engines_off && self.read_flag(dataref::BATTERY)? {
            if let Some(id) = self.flight_plan_id()? {
                self.start_leg(id)?;
                self.transition(FlightPhase::Departure);
            }
        }
        Ok(())
    }

    /// Wait for GSX, reposition, place GPU and chocks. Runs once.
    fn prepare_aircraft(&mut self) -> StepResult<bool> {
        if self.session.prepared {
            return Ok(true);
        }
        if !self.lvar_flag(lvar::COUATL_STARTED)? {
            tracing::debug!("Waiting for the GSX process");
            return Ok(false);
        }

        if self.config.policy.auto_reposition && !self.session.repositioned {
            self.reposition()?;
        }
        self.session.repositioned = true;

        self.set_equipment(ServiceKind::Gpu, true)?;
        self.set_equipment(ServiceKind::Chocks, true)?;
        self.session.prepared = true;
        tracing::info!("Aircraft prepared at the gate");
        Ok(true)
    }

    fn reposition(&mut self) -> StepResult {
        self.settling = true;
        let delay = self.config.timing.reposition_delay;
        let menu = self.menu();

        tracing::info!("Repositioning at the gate");
        menu.request(MenuEntry::Reposition)?;
        std::thread::sleep(delay);
        menu.select(REPOSITION_GATE_ITEM)?;
        std::thread::sleep(delay);
        Ok(())
    }

    /// Something is still to be connected under the current policy.
    pub(super) fn connect_pending(&self) -> bool {
        let policy = &self.config.policy;
        (policy.auto_connect && !self.session.connect_called)
            || (policy.connect_pca && !self.session.pca_called)
    }

    /// Call jetway and/or stairs, then PCA. Each part runs once per phase.
    pub(super) fn connect_ground_equipment(&mut self) -> StepResult {
        if !self.connect_pending() {
            return Ok(());
        }
        let auto_connect = self.config.policy.auto_connect;
        let jetway_only = self.config.policy.jetway_only;
        let connect_pca = self.config.policy.connect_pca;
        let pca_only_jetway = self.config.policy.pca_only_jetway;

        let jetway = self.gsx_code(ServiceKind::Jetway)?;
        let stairs = self.gsx_code(ServiceKind::Stairs)?;

        if auto_connect && !self.session.connect_called {
            if available(jetway) && ServiceStatus::from_state_code(jetway) != ServiceStatus::Active
            {
                self.request_service(MenuEntry::Jetway, true)?;
            }
            if !jetway_only
                && available(stairs)
                && ServiceStatus::from_state_code(stairs) != ServiceStatus::Active
            {
                self.request_service(MenuEntry::Stairs, true)?;
            }
            self.session.connect_called = true;
        }

        if connect_pca && !self.session.pca_called {
            if !pca_only_jetway || available(jetway) {
                self.set_equipment(ServiceKind::Pca, true)?;
            } else {
                tracing::debug!("No jetway at this stand, PCA not connected");
            }
            self.session.pca_called = true;
        }
        Ok(())
    }

    /// Load the flight plan and set up the new leg.
    ///
    /// From Turnaround the session is reset first.
    pub(super) fn start_leg(&mut self, id: String) -> StepResult {
        let number = self.optional_string(dataref::FLIGHT_NUMBER);
        let planned_fuel_kg = self.aircraft.read_f64(dataref::PLANNED_FUEL_KG)?;
        let planned_pax = self.aircraft.read_i64(dataref::PLANNED_PAX)?;
        let planned_cargo_kg = self.aircraft.read_f64(dataref::PLANNED_CARGO_KG)?;
        let current_fuel = self.aircraft.read_f64(dataref::FUEL_TOTAL_KG)?;

        if self.phase == FlightPhase::Turnaround {
            self.session.reset_for_leg(id, number);
        } else {
            self.session.flight_plan_id = Some(id);
            self.session.flight_number = number;
        }
        self.session.planned_fuel_kg = planned_fuel_kg;
        self.session.planned_pax = planned_pax;
        self.session.planned_cargo_kg = planned_cargo_kg;

        tracing::info!(
            flight_plan = self.session.flight_plan_id.as_deref().unwrap_or(""),
            flight_number = self.session.flight_number.as_deref().unwrap_or(""),
            planned_pax,
            planned_fuel_kg,
            planned_cargo_kg,
            "Flight plan loaded"
        );

        self.set_initial_fuel(current_fuel)?;
        self.restore_hydraulics()?;

        if self.config.policy.auto_boarding {
            self.aircraft.write(dataref::PASSENGERS, DataValue::Int(0))?;
            self.aircraft
                .write(dataref::CARGO_PERCENT, DataValue::Float(0.0))?;
            self.passengers_on_board = 0;
        }
        Ok(())
    }

    fn set_initial_fuel(&mut self, current_kg: f64) -> StepResult {
        let policy = &self.config.policy;
        let carried = if policy.save_fuel {
            self.carry.fuel_kg
        } else {
            None
        };
        if let Some(kg) = fuel::initial_fuel(
            current_kg,
            self.session.planned_fuel_kg,
            policy.zero_fuel_start,
            carried,
        ) {
            self.write_fuel(kg)?;
            tracing::info!(from_kg = current_kg, to_kg = kg, "Initial fuel set");
        }
        Ok(())
    }

    fn restore_hydraulics(&mut self) -> StepResult {
        if !self.config.policy.save_hydraulic_fluids {
            return Ok(());
        }
        if let Some(levels) = self.carry.hydraulics {
            for (name, level) in dataref::HYDRAULICS.into_iter().zip(levels) {
                self.aircraft.write(name, DataValue::Float(level))?;
            }
            tracing::info!(?levels, "Hydraulic fluid levels restored");
        }
        Ok(())
    }
}
