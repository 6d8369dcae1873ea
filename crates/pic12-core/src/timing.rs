//! Per-cycle timing update: shared prescaler, Timer0, and the watchdog.
//!
//! Runs once per instruction cycle as the last piece of end-of-cycle
//! bookkeeping. Sleep suspends Timer0 but not the watchdog; this is the one
//! activity that continues while asleep.

use crate::state::registers::TMR0;
use crate::state::run_state::ResetCause;
use crate::state::Cpu;

/// Watchdog base period in instruction cycles (nominal 18 ms at a 1 MHz
/// instruction rate), multiplied by the prescaler rate when the prescaler
/// is watchdog-assigned.
pub const WDT_BASE_PERIOD: u32 = 18_000;

impl Cpu {
    pub(crate) fn timing_tick(&mut self) {
        if self.inhibit > 0 {
            // A fresh TMR0 write also rolls back the increment that would
            // have landed on its own cycle.
            self.inhibit -= 1;
            if self.option.prescaler_to_timer0() {
                self.prescaler = 0;
            }
            return;
        }

        let timer0_counting = !self.sleeping() && self.option.timer0_internal_clock();

        if self.option.prescaler_to_timer0() {
            if timer0_counting {
                self.prescaler += 1;
                if self.prescaler >= self.option.timer0_prescale() {
                    self.prescaler = 0;
                    self.set_raw(TMR0, self.raw(TMR0).wrapping_add(1));
                }
            }
        } else {
            // Timer0 counts 1:1 when the prescaler belongs to the watchdog.
            if timer0_counting {
                self.set_raw(TMR0, self.raw(TMR0).wrapping_add(1));
            }
            if self.config.watchdog_enabled() {
                self.prescaler += 1;
                if self.prescaler >= self.option.watchdog_prescale() * WDT_BASE_PERIOD {
                    self.prescaler = 0;
                    self.watchdog = self.watchdog.wrapping_add(1);
                    if self.watchdog == 0 {
                        let cause = if self.sleeping() {
                            ResetCause::WdtSleep
                        } else {
                            ResetCause::WdtNormal
                        };
                        self.reset(cause);
                    }
                }
            }
        }
    }
}
