//! Departure loading: refuel, catering, boarding.

use crate::bus::names::{dataref, lvar};
use crate::bus::{DataValue, MenuEntry};

use super::super::doors::Door;
use super::super::fuel::{self, RefuelProgress};
use super::super::phase::FlightPhase;
use super::super::service::{ServiceKind, ServiceStatus};
use super::{Orchestrator, StepResult};

fn is_underway(status: ServiceStatus) -> bool {
    matches!(status, ServiceStatus::Requested | ServiceStatus::Active)
}

impl Orchestrator {
    pub(super) fn step_departure(&mut self) -> StepResult {
        if !self.on_ground()? {
            self.transition(FlightPhase::Flight);
            return Ok(());
        }

        self.connect_ground_equipment()?;
        self.drive_preliminary_loadsheet();
        self.drive_refuel()?;
        self.drive_catering()?;
        self.drive_boarding()?;
        self.drive_final_loadsheet();
        self.drive_equipment_removal()?;
        self.drive_pushback()?;

        if self.session.departure_complete() {
            self.transition(FlightPhase::TaxiOut);
        }
        Ok(())
    }

    // ========================================================================
    // Refuel
    // ========================================================================

    fn drive_refuel(&mut self) -> StepResult {
        if self.session.refuel_finished {
            return Ok(());
        }

        if !self.session.refuel_requested {
            if self.config.policy.auto_refuel {
                self.request_service(MenuEntry::Refuel, true)?;
                self.session.refuel_requested = true;
                let target_kg = fuel::refuel_target(self.session.planned_fuel_kg);
                tracing::info!(target_kg, "Refuel requested");
            } else if is_underway(self.service_status(ServiceKind::Refuel)) {
                self.session.refuel_requested = true;
            }
            return Ok(());
        }

        let target = fuel::refuel_target(self.session.planned_fuel_kg);

        if self.session.refuel_started
            && self.service_status(ServiceKind::Refuel) == ServiceStatus::Completed
        {
            self.write_fuel(target)?;
            self.finish_refuel(target, "GSX reported completion");
            return Ok(());
        }

        let hose = self.lvar_flag(lvar::FUELHOSE_CONNECTED)?;
        if hose != self.session.fuel_hose_connected {
            self.session.fuel_hose_connected = hose;
            if hose && self.session.refuel_started {
                self.session.refuel_paused = false;
                tracing::info!("Fuel hose reconnected, transfer resumed");
            } else if hose {
                self.session.refuel_started = true;
                tracing::info!("Fuel hose connected, transfer started");
            } else if self.session.refuel_started {
                self.session.refuel_paused = true;
                tracing::info!("Fuel hose disconnected, transfer paused");
            }
        }

        if !hose {
            return Ok(());
        }

        let current = self.aircraft.read_f64(dataref::FUEL_TOTAL_KG)?;
        match fuel::refuel_step(current, target, self.config.policy.refuel_rate_kgs) {
            RefuelProgress::Transferring(kg) => self.write_fuel(kg)?,
            RefuelProgress::Complete(kg) => {
                self.write_fuel(kg)?;
                self.finish_refuel(kg, "target reached");
            }
        }
        Ok(())
    }

    fn finish_refuel(&mut self, fuel_kg: f64, reason: &str) {
        self.session.refuel_finished = true;
        self.session.refuel_paused = false;
        tracing::info!(fuel_kg, reason, "Refuel finished");
    }

    // ========================================================================
    // Catering
    // ========================================================================

    fn drive_catering(&mut self) -> StepResult {
        if !self.config.policy.call_catering || self.session.catering_finished {
            return Ok(());
        }
        if !self.session.catering_requested {
            self.request_service(MenuEntry::Catering, true)?;
            self.session.catering_requested = true;
            tracing::info!("Catering requested");
            return Ok(());
        }
        if self.service_status(ServiceKind::Catering) == ServiceStatus::Completed {
            self.session.catering_finished = true;
            tracing::info!("Catering finished");
        }
        Ok(())
    }

    // ========================================================================
    // Boarding
    // ========================================================================

    fn drive_boarding(&mut self) -> StepResult {
        if self.session.boarding_finished {
            return Ok(());
        }
        if !self.session.boarding_requested {
            return self.request_boarding();
        }

        let status = self.service_status(ServiceKind::Boarding);
        let pax_total = self.sim.read_lvar(lvar::BOARDING_PAX_TOTAL)?.round() as i64;
        let cargo = self
            .sim
            .read_lvar(lvar::BOARDING_CARGO_PERCENT)?
            .clamp(0.0, 100.0);

        match self.session.boarding_pax.advance(pax_total) {
            Ok(delta) if delta > 0 => {
                let on_board = self.session.boarding_pax.last();
                self.aircraft
                    .write(dataref::PASSENGERS, DataValue::Int(on_board))?;
                self.passengers_on_board = on_board;
                tracing::debug!(on_board, delta, "Passengers boarded");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Boarding passenger update rejected"),
        }
        self.aircraft
            .write(dataref::CARGO_PERCENT, DataValue::Float(cargo))?;

        if cargo >= 100.0 && !self.session.cargo_loaded {
            self.session.cargo_loaded = true;
            tracing::info!("Cargo loaded, closing cargo doors");
            self.close_cargo_doors()?;
        }

        let planned = self.session.planned_pax;
        let converged = self.session.boarding_pax.last() >= planned && cargo >= 100.0;
        if status == ServiceStatus::Completed || converged {
            self.aircraft
                .write(dataref::PASSENGERS, DataValue::Int(planned))?;
            self.aircraft
                .write(dataref::CARGO_PERCENT, DataValue::Float(100.0))?;
            self.passengers_on_board = planned;
            self.close_cargo_doors()?;
            self.session.boarding_finished = true;
            tracing::info!(passengers = planned, "Boarding finished");
        }
        Ok(())
    }

    /// Call boarding once refuel and catering are done and the settle delay
    /// has passed.
    fn request_boarding(&mut self) -> StepResult {
        let catering_done = !self.config.policy.call_catering || self.session.catering_finished;
        if !(self.session.refuel_finished && catering_done) {
            return Ok(());
        }
        if self.session.boarding_settle_ticks < self.config.timing.boarding_settle_ticks {
            self.session.boarding_settle_ticks += 1;
            return Ok(());
        }

        if self.config.policy.auto_boarding {
            self.sim
                .write_lvar(lvar::NUM_PASSENGERS, self.session.planned_pax as f64)?;
            self.request_service(MenuEntry::Boarding, false)?;
            self.session.boarding_requested = true;
            tracing::info!(passengers = self.session.planned_pax, "Boarding requested");
        } else if is_underway(self.service_status(ServiceKind::Boarding)) {
            self.session.boarding_requested = true;
            tracing::info!("Boarding called manually");
        }
        Ok(())
    }

    pub(super) fn close_cargo_doors(&mut self) -> StepResult {
        self.set_door(Door::CargoForward, false)?;
        self.set_door(Door::CargoAft, false)
    }
}
