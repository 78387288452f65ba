//! Arrival, deboarding and the turnaround wait.

use crate::bus::names::{dataref, lvar};
use crate::bus::{DataValue, MenuEntry};

use super::super::phase::FlightPhase;
use super::super::service::{ServiceKind, ServiceStatus};
use super::{Orchestrator, StepResult};

impl Orchestrator {
    pub(super) fn step_arrival(&mut self) -> StepResult {
        if !self.session.arrival_prepared {
            self.prepare_arrival()?;
        }

        if self.connect_pending() {
            if self.read_flag(dataref::BEACON)? {
                tracing::trace!("Beacon on, deferring jetway and stairs");
            } else {
                self.connect_ground_equipment()?;
            }
        }

        self.drive_deboarding()?;

        if self.session.deboarding_finished {
            self.transition(FlightPhase::Turnaround);
        }
        Ok(())
    }

    pub(super) fn step_turnaround(&mut self) -> StepResult {
        let Some(id) = self.flight_plan_id()? else {
            return Ok(());
        };
        if self.session.flight_plan_id.as_deref() == Some(id.as_str()) {
            return Ok(());
        }

        tracing::info!(flight_plan = %id, "New flight plan, starting next leg");
        self.start_leg(id)?;
        self.transition(FlightPhase::Departure);
        Ok(())
    }

    fn prepare_arrival(&mut self) -> StepResult {
        if self.session.planned_pax == 0 {
            self.session.planned_pax = self.aircraft.read_i64(dataref::PLANNED_PAX)?;
        }

        if self.config.policy.save_fuel {
            let fuel = self.aircraft.read_f64(dataref::FUEL_TOTAL_KG)?;
            self.carry.fuel_kg = Some(fuel);
            tracing::info!(fuel_kg = fuel, "Arrival fuel saved for next leg");
        }
        if self.config.policy.save_hydraulic_fluids {
            let mut levels = [0.0; 3];
            for (slot, name) in levels.iter_mut().zip(dataref::HYDRAULICS) {
                *slot = self.aircraft.read_f64(name)?;
            }
            self.carry.hydraulics = Some(levels);
            tracing::info!(?levels, "Hydraulic fluid levels saved for next leg");
        }

        self.set_equipment(ServiceKind::Gpu, true)?;
        self.set_equipment(ServiceKind::Chocks, true)?;
        self.passengers_on_board = self.session.planned_pax;
        self.session.arrival_prepared = true;
        tracing::info!(passengers = self.session.planned_pax, "Arrived at the gate");
        Ok(())
    }

    fn drive_deboarding(&mut self) -> StepResult {
        if self.session.deboarding_finished {
            return Ok(());
        }
        let status = self.service_status(ServiceKind::Deboarding);

        if !self.session.deboarding_requested {
            if matches!(
                status,
                ServiceStatus::Requested | ServiceStatus::Active | ServiceStatus::Completed
            ) {
                self.session.deboarding_requested = true;
                tracing::info!(status = %status, "Deboarding called manually");
            } else if self.config.policy.auto_deboarding && !self.connect_pending() {
                self.sim
                    .write_lvar(lvar::NUM_PASSENGERS, self.session.planned_pax as f64)?;
                self.request_service(MenuEntry::Deboarding, false)?;
                self.session.deboarding_requested = true;
                tracing::info!(passengers = self.session.planned_pax, "Deboarding requested");
            }
            return Ok(());
        }

        if !self.session.deboarding_started {
            if !matches!(
                status,
                ServiceStatus::Requested | ServiceStatus::Active | ServiceStatus::Completed
            ) {
                return Ok(());
            }
            self.session.deboarding_started = true;
            tracing::info!("Deboarding started");
        }

        let planned = self.session.planned_pax;
        let deboarded = self.sim.read_lvar(lvar::DEBOARDING_PAX_TOTAL)?.round() as i64;
        let unloaded = self
            .sim
            .read_lvar(lvar::DEBOARDING_CARGO_PERCENT)?
            .clamp(0.0, 100.0);

        match self.session.deboard_pax.advance(deboarded) {
            Ok(delta) if delta > 0 => {
                let on_board = (planned - self.session.deboard_pax.last()).max(0);
                self.aircraft
                    .write(dataref::PASSENGERS, DataValue::Int(on_board))?;
                self.passengers_on_board = on_board;
                tracing::debug!(on_board, delta, "Passengers deboarded");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Deboarding passenger update rejected"),
        }

        let cargo_remaining = 100.0 - unloaded;
        self.aircraft
            .write(dataref::CARGO_PERCENT, DataValue::Float(cargo_remaining))?;
        if cargo_remaining <= 0.0 && !self.session.cargo_unloaded {
            self.session.cargo_unloaded = true;
            tracing::info!("Cargo unloaded, closing cargo doors");
            self.close_cargo_doors()?;
        }

        let converged = self.passengers_on_board <= 0 && cargo_remaining <= 0.0;
        if status == ServiceStatus::Completed || converged {
            self.aircraft
                .write(dataref::PASSENGERS, DataValue::Int(0))?;
            self.aircraft
                .write(dataref::CARGO_PERCENT, DataValue::Float(0.0))?;
            self.passengers_on_board = 0;
            self.session.cargo_unloaded = true;
            self.session.deboarding_finished = true;
            tracing::info!("Deboarding finished");
        }
        Ok(())
    }
}
