//! Departure services: loadsheets, equipment removal, pushback.

use crate::bus::names::{dataref, lvar, simvar};
use crate::bus::{DataValue, MenuEntry};
use crate::loadsheet::LoadsheetKind;

use super::super::constants::{PUSH_SKIP_SPEED_KT, PUSH_SKIP_THROTTLE};
use super::super::service::{ServiceKind, ServiceStatus};
use super::{Orchestrator, StepResult};

impl Orchestrator {
    pub(super) fn drive_preliminary_loadsheet(&mut self) {
        if self.session.flight_plan_id.is_none() {
            return;
        }
        if self.session.preliminary_loadsheet.needs_arming() {
            let delay = if self.session.preliminary_loadsheet.attempts == 0 {
                0
            } else {
                self.random_loadsheet_delay()
            };
            self.session.preliminary_loadsheet.arm(delay);
        }
        if self.session.preliminary_loadsheet.tick() {
            self.loadsheets.dispatch(LoadsheetKind::Preliminary);
        }
    }

    /// Final loadsheet after a random dispatch delay once boarding is done.
    /// A failed attempt starts a fresh delay.
    pub(super) fn drive_final_loadsheet(&mut self) {
        if !self.session.boarding_finished {
            return;
        }
        if self.session.final_loadsheet.needs_arming() {
            let delay = self.random_loadsheet_delay();
            self.session.final_loadsheet.arm(delay);
            tracing::debug!(ticks = delay, "Final loadsheet scheduled");
        }
        if self.session.final_loadsheet.tick() {
            self.loadsheets.dispatch(LoadsheetKind::Final);
        }
    }

    /// Parking brake set, beacon on and external power off: the crew is
    /// ready to push.
    pub(super) fn drive_equipment_removal(&mut self) -> StepResult {
        if self.session.equipment_removed || !self.session.boarding_finished {
            return Ok(());
        }
        let brake = self.read_flag(dataref::PARKING_BRAKE)?;
        let beacon = self.read_flag(dataref::BEACON)?;
        let ext_power = self.read_flag(dataref::EXT_POWER)?;
        if !(brake && beacon && !ext_power) {
            return Ok(());
        }

        tracing::info!("Removing ground equipment");
        self.set_equipment(ServiceKind::Chocks, false)?;
        self.set_equipment(ServiceKind::Gpu, false)?;
        if self.session.pca_called && !self.session.pca_removed {
            self.set_equipment(ServiceKind::Pca, false)?;
            self.session.pca_removed = true;
        }
        // GSX menu entries toggle: calling a connected jetway removes it.
        if self.service_status(ServiceKind::Jetway) == ServiceStatus::Active {
            self.request_service(MenuEntry::Jetway, false)?;
        }
        if self.service_status(ServiceKind::Stairs) == ServiceStatus::Active {
            self.request_service(MenuEntry::Stairs, false)?;
        }
        self.session.equipment_removed = true;
        Ok(())
    }

    pub(super) fn drive_pushback(&mut self) -> StepResult {
        if self.session.push_finished || !self.session.equipment_removed {
            return Ok(());
        }
        let departure = ServiceStatus::from_state_code(self.gsx_code(ServiceKind::Pushback)?);

        if !self.session.push_running {
            let speed = self.sim.read_simvar(simvar::GROUND_SPEED_KT)?;
            let throttle = self.sim.read_simvar(simvar::THROTTLE_INPUT)?;
            if speed > PUSH_SKIP_SPEED_KT && throttle > PUSH_SKIP_THROTTLE {
                tracing::info!(speed, throttle, "Moving under own power, pushback skipped");
                self.session.push_finished = true;
                return Ok(());
            }
            if !matches!(
                departure,
                ServiceStatus::Requested | ServiceStatus::Active | ServiceStatus::Completed
            ) {
                return Ok(());
            }
            self.session.push_running = true;
            tracing::info!("Pushback started");
        }

        if self.config.policy.synch_bypass {
            let pin = self.lvar_flag(lvar::BYPASS_PIN)?;
            if pin && !self.session.nws_disconnected {
                std::thread::sleep(self.config.timing.bypass_settle);
                self.freeze(true)?;
                self.session.nws_disconnected = true;
                tracing::info!("Bypass pin inserted, aircraft frozen for tow");
            } else if !pin && self.session.nws_disconnected {
                self.freeze(false)?;
                self.session.nws_disconnected = false;
                tracing::info!("Bypass pin removed");
                self.finish_push();
                return Ok(());
            }
        }

        if departure == ServiceStatus::Completed {
            if self.session.nws_disconnected {
                self.freeze(false)?;
                self.session.nws_disconnected = false;
            }
            self.finish_push();
        }
        Ok(())
    }

    fn freeze(&self, frozen: bool) -> StepResult {
        self.aircraft
            .write(dataref::POSITION_FREEZE, DataValue::Bool(frozen))?;
        Ok(())
    }

    fn finish_push(&mut self) {
        self.session.push_running = false;
        self.session.push_finished = true;
        tracing::info!("Pushback finished");
    }
}
