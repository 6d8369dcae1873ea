//! Prescaler, Timer0, and watchdog behavior over whole instruction cycles.

use proptest::prelude::*;

use pic12_core::{
    Cpu, ConfigWord, Op, OptionReg, ResetCause, RESET_VECTOR, STATUS_PD, STATUS_TO, TMR0,
    WDT_BASE_PERIOD,
};

/// All-NOP flash, quiet fuses unless a watchdog is requested.
fn idle_cpu(option: u8, watchdog_fused: bool) -> Cpu {
    let config = if watchdog_fused { 0b100 } else { 0 };
    let mut cpu = Cpu::with_config(ConfigWord::from_word(config));
    cpu.option = OptionReg::from_bits(option);
    cpu.pc = 0;
    cpu
}

proptest! {
    // Rate 0 divides the instruction clock by two: 2N cycles per N counts.
    #[test]
    fn timer0_counts_once_per_two_cycles_at_rate_zero(n in 1_u64..200) {
        let mut cpu = idle_cpu(0x00, false);
        cpu.run_for(2 * n);
        prop_assert_eq!(u64::from(cpu.register(TMR0)), n % 256);
        // One cycle short of the next count.
        cpu.run_for(1);
        prop_assert_eq!(u64::from(cpu.register(TMR0)), n % 256);
    }
}

#[test]
fn timer0_write_inhibits_counting_for_the_window() {
    let mut cpu = idle_cpu(0x00, false);
    cpu.set_register(TMR0, 10);
    // The write's own cycle plus two more are suppressed.
    cpu.run_for(3);
    assert_eq!(cpu.register(TMR0), 10);
    assert_eq!(cpu.prescaler, 0);
    cpu.run_for(2);
    assert_eq!(cpu.register(TMR0), 11);
}

#[test]
fn clrwdt_is_idempotent() {
    let mut cpu = idle_cpu(0x08, true);
    cpu.watchdog = 7;
    cpu.prescaler = 1234;
    cpu.execute(Op::Clrwdt);
    let after_one = (cpu.watchdog, cpu.prescaler);
    cpu.execute(Op::Clrwdt);
    assert_eq!((cpu.watchdog, cpu.prescaler), after_one);
    assert_eq!(after_one, (0, 0));
}

#[test]
fn clrwdt_spares_a_timer0_owned_prescaler() {
    let mut cpu = idle_cpu(0x00, false);
    cpu.prescaler = 1;
    cpu.watchdog = 3;
    cpu.execute(Op::Clrwdt);
    assert_eq!(cpu.watchdog, 0);
    assert_eq!(cpu.prescaler, 1);
}

#[test]
fn option_write_discards_any_partial_prescale_count() {
    let mut cpu = idle_cpu(0x07, false);
    cpu.run_for(10);
    assert!(cpu.prescaler > 0);
    cpu.w = 0x00;
    cpu.execute(Op::Option);
    assert_eq!(cpu.prescaler, 0);
    assert!(cpu.option.prescaler_to_timer0());
}

#[test]
fn watchdog_timeout_while_running_resets_with_the_normal_signature() {
    let mut cpu = idle_cpu(0x08, true);
    cpu.watchdog = u8::MAX;
    cpu.prescaler = WDT_BASE_PERIOD - 1;
    cpu.run_for(1);
    assert_eq!(cpu.last_reset, ResetCause::WdtNormal);
    assert_eq!(cpu.pc, RESET_VECTOR);
    // TO clears to flag the timeout; PD survives.
    assert!(!cpu.status_bit(STATUS_TO));
    assert!(cpu.status_bit(STATUS_PD));
}

#[test]
fn watchdog_timeout_wakes_a_sleeping_core() {
    let mut cpu = Cpu::from_words(&[Op::Sleep.encode()]);
    cpu.config = ConfigWord::from_word(0b100);
    cpu.pc = 0;
    cpu.step();
    assert!(cpu.sleeping());
    assert_eq!(cpu.watchdog, 0, "SLEEP clears the watchdog");

    cpu.option = OptionReg::from_bits(0x08);
    cpu.watchdog = u8::MAX;
    cpu.prescaler = WDT_BASE_PERIOD - 1;
    cpu.step();
    assert!(!cpu.sleeping());
    assert_eq!(cpu.last_reset, ResetCause::WdtSleep);
    assert_eq!(cpu.pc, RESET_VECTOR);
    assert!(!cpu.status_bit(STATUS_TO));
    assert!(!cpu.status_bit(STATUS_PD));
}

#[test]
fn watchdog_rate_scales_the_base_period() {
    let mut cpu = idle_cpu(0x09, true);
    cpu.watchdog = u8::MAX;
    cpu.prescaler = WDT_BASE_PERIOD;
    // Rate 1 doubles the period, so the base period is only halfway.
    cpu.run_for(1);
    assert_eq!(cpu.last_reset, ResetCause::PowerOn);
    cpu.prescaler = 2 * WDT_BASE_PERIOD - 1;
    cpu.run_for(1);
    assert_eq!(cpu.last_reset, ResetCause::WdtNormal);
}

#[test]
fn two_cycle_instructions_advance_the_timers_twice() {
    let mut cpu = idle_cpu(0x00, false);
    cpu.program[0] = Op::Goto { k: 0 }.encode();
    cpu.run_for(1);
    assert_eq!(cpu.register(TMR0), 1);
    assert_eq!(cpu.cycles, 2);
}
