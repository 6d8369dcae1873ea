//! Instruction-cycle execution: fetch, dispatch, and the execution units.

use crate::encoding::{decode, Op};
use crate::gpio::PORT_MASK;
use crate::state::option_reg::OptionReg;
use crate::state::registers::{STATUS_C, STATUS_DC, STATUS_Z};
use crate::state::run_state::CpuState;
use crate::state::{Cpu, FETCH_MASK, PC_MASK};
use crate::trace::TraceEvent;

impl Cpu {
    /// Executes one instruction cycle.
    ///
    /// While asleep only the cycle counter and the timing subsystem advance.
    /// Otherwise the word at the program counter is fetched and either
    /// skipped (consuming a pending skip), executed, or counted as illegal;
    /// end-of-cycle bookkeeping then advances the program counter and runs
    /// the timing tick. `GOTO` and `CALL` consume a second cycle.
    pub fn step(&mut self) {
        self.pc_hold = false;

        if self.sleeping() {
            self.cycles += 1;
            self.timing_tick();
            return;
        }

        let fetch_pc = self.pc & FETCH_MASK;
        let word = self.program[usize::from(fetch_pc)] & 0xFFF;
        let mut extra_cycle = false;

        if self.skip_next {
            self.skip_next = false;
            self.trace_event(TraceEvent::Skipped { pc: fetch_pc, word });
        } else if let Some(op) = decode(word) {
            extra_cycle = op.is_two_cycle();
            self.execute(op);
            self.trace_event(TraceEvent::Executed { pc: fetch_pc, op });
        } else {
            self.illegal_instructions += 1;
            self.trace_event(TraceEvent::Illegal { pc: fetch_pc, word });
        }

        // A reset applied mid-cycle has already loaded the vector; the
        // shared increment must not disturb it.
        if !self.pc_hold {
            self.pc = self.pc.wrapping_add(1) & PC_MASK;
        }
        self.cycles += 1;
        self.timing_tick();
        if extra_cycle {
            self.cycles += 1;
            self.timing_tick();
        }
    }

    /// Executes a single decoded instruction against the current state.
    ///
    /// This is the dispatch target of [`Cpu::step`]; it performs none of the
    /// per-cycle bookkeeping (program-counter advance, cycle count, timing),
    /// which makes it directly drivable by tests and instruction-injection
    /// hosts.
    pub fn execute(&mut self, op: Op) {
        match op {
            Op::Nop => {}
            Op::Option => self.op_option(),
            Op::Sleep => self.op_sleep(),
            Op::Clrwdt => self.op_clrwdt(),
            Op::Tris => self.op_tris(),
            Op::Clrw => self.op_clrw(),
            Op::Movwf { f } => self.op_movwf(f),
            Op::Clrf { f } => self.op_clrf(f),
            Op::Subwf { f, d } => self.op_subwf(f, d),
            Op::Decf { f, d } => self.op_decf(f, d),
            Op::Iorwf { f, d } => self.op_iorwf(f, d),
            Op::Andwf { f, d } => self.op_andwf(f, d),
            Op::Xorwf { f, d } => self.op_xorwf(f, d),
            Op::Addwf { f, d } => self.op_addwf(f, d),
            Op::Movf { f, d } => self.op_movf(f, d),
            Op::Comf { f, d } => self.op_comf(f, d),
            Op::Incf { f, d } => self.op_incf(f, d),
            Op::Decfsz { f, d } => self.op_decfsz(f, d),
            Op::Rrf { f, d } => self.op_rrf(f, d),
            Op::Rlf { f, d } => self.op_rlf(f, d),
            Op::Swapf { f, d } => self.op_swapf(f, d),
            Op::Incfsz { f, d } => self.op_incfsz(f, d),
            Op::Bcf { f, b } => self.op_bcf(f, b),
            Op::Bsf { f, b } => self.op_bsf(f, b),
            Op::Btfsc { f, b } => self.op_btfsc(f, b),
            Op::Btfss { f, b } => self.op_btfss(f, b),
            Op::Retlw { k } => self.op_retlw(k),
            Op::Call { k } => self.op_call(k),
            Op::Movlw { k } => self.w = k,
            Op::Iorlw { k } => self.op_iorlw(k),
            Op::Andlw { k } => self.op_andlw(k),
            Op::Xorlw { k } => self.op_xorlw(k),
            Op::Goto { k } => self.op_goto(k),
        }
    }

    /// Stores an execution-unit result to the accumulator (`d = 0`) or back
    /// to register `f` (`d = 1`).
    fn store_result(&mut self, f: u8, d: bool, value: u8) {
        if d {
            self.set_register(f, value);
        } else {
            self.w = value;
        }
    }

    fn update_zero(&mut self, value: u8) {
        self.set_status_bit(STATUS_Z, value == 0);
    }

    fn op_addwf(&mut self, f: u8, d: bool) {
        let operand = self.read_register(f);
        let (result, carry) = operand.overflowing_add(self.w);
        self.set_status_bit(STATUS_C, carry);
        self.set_status_bit(STATUS_DC, (operand & 0x0F) + (self.w & 0x0F) > 0x0F);
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    // Borrow convention: C and DC are set when no (nibble) borrow occurs.
    fn op_subwf(&mut self, f: u8, d: bool) {
        let operand = self.read_register(f);
        let result = operand.wrapping_sub(self.w);
        self.set_status_bit(STATUS_C, operand >= self.w);
        self.set_status_bit(STATUS_DC, operand & 0x0F >= self.w & 0x0F);
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_andwf(&mut self, f: u8, d: bool) {
        let result = self.read_register(f) & self.w;
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_iorwf(&mut self, f: u8, d: bool) {
        let result = self.read_register(f) | self.w;
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_xorwf(&mut self, f: u8, d: bool) {
        let result = self.read_register(f) ^ self.w;
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_comf(&mut self, f: u8, d: bool) {
        let result = !self.read_register(f);
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_movf(&mut self, f: u8, d: bool) {
        let value = self.read_register(f);
        self.update_zero(value);
        self.store_result(f, d, value);
    }

    fn op_incf(&mut self, f: u8, d: bool) {
        let result = self.read_register(f).wrapping_add(1);
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_decf(&mut self, f: u8, d: bool) {
        let result = self.read_register(f).wrapping_sub(1);
        self.update_zero(result);
        self.store_result(f, d, result);
    }

    fn op_incfsz(&mut self, f: u8, d: bool) {
        let result = self.read_register(f).wrapping_add(1);
        self.store_result(f, d, result);
        if result == 0 {
            self.skip_next = true;
        }
    }

    fn op_decfsz(&mut self, f: u8, d: bool) {
        let result = self.read_register(f).wrapping_sub(1);
        self.store_result(f, d, result);
        if result == 0 {
            self.skip_next = true;
        }
    }

    fn op_rrf(&mut self, f: u8, d: bool) {
        let operand = self.read_register(f);
        self.set_status_bit(STATUS_C, operand & 0x01 != 0);
        self.store_result(f, d, operand >> 1);
    }

    fn op_rlf(&mut self, f: u8, d: bool) {
        let operand = self.read_register(f);
        self.set_status_bit(STATUS_C, operand & 0x80 != 0);
        self.store_result(f, d, operand << 1);
    }

    fn op_swapf(&mut self, f: u8, d: bool) {
        let operand = self.read_register(f);
        self.store_result(f, d, operand << 4 | operand >> 4);
    }

    fn op_movwf(&mut self, f: u8) {
        let value = self.w;
        self.set_register(f, value);
    }

    fn op_clrf(&mut self, f: u8) {
        self.set_register(f, 0);
        self.set_status_bit(STATUS_Z, true);
    }

    fn op_clrw(&mut self) {
        self.w = 0;
        self.set_status_bit(STATUS_Z, true);
    }

    fn op_bcf(&mut self, f: u8, b: u8) {
        let value = self.read_register(f) & !(1 << (b & 0x7));
        self.set_register(f, value);
    }

    fn op_bsf(&mut self, f: u8, b: u8) {
        let value = self.read_register(f) | 1 << (b & 0x7);
        self.set_register(f, value);
    }

    fn op_btfsc(&mut self, f: u8, b: u8) {
        if self.read_register(f) & 1 << (b & 0x7) == 0 {
            self.skip_next = true;
        }
    }

    fn op_btfss(&mut self, f: u8, b: u8) {
        if self.read_register(f) & 1 << (b & 0x7) != 0 {
            self.skip_next = true;
        }
    }

    fn op_andlw(&mut self, k: u8) {
        self.w &= k;
        self.set_status_bit(STATUS_Z, self.w == 0);
    }

    fn op_iorlw(&mut self, k: u8) {
        self.w |= k;
        self.set_status_bit(STATUS_Z, self.w == 0);
    }

    fn op_xorlw(&mut self, k: u8) {
        self.w ^= k;
        self.set_status_bit(STATUS_Z, self.w == 0);
    }

    // Control transfers load the target minus one; the shared end-of-cycle
    // increment lands execution on the target itself.
    fn op_goto(&mut self, k: u16) {
        self.pc = (self.page_bits() | k & 0x1FF).wrapping_sub(1);
    }

    fn op_call(&mut self, k: u8) {
        let return_address = self.pc.wrapping_add(1) & PC_MASK;
        self.stack[1] = self.stack[0];
        self.stack[0] = return_address;
        self.pc = (self.page_bits() | u16::from(k)).wrapping_sub(1);
    }

    fn op_retlw(&mut self, k: u8) {
        self.w = k;
        let return_address = self.stack[0];
        self.stack[0] = self.stack[1];
        self.pc = return_address.wrapping_sub(1);
    }

    fn op_option(&mut self) {
        self.option = OptionReg::from_bits(self.w);
        // Reassigning prescaler ownership invalidates any partial count.
        self.prescaler = 0;
    }

    fn op_tris(&mut self) {
        self.tris = self.w & PORT_MASK;
    }

    fn op_sleep(&mut self) {
        self.watchdog = 0;
        if !self.option.prescaler_to_timer0() {
            self.prescaler = 0;
        }
        self.state = CpuState::Asleep;
    }

    fn op_clrwdt(&mut self) {
        self.watchdog = 0;
        if !self.option.prescaler_to_timer0() {
            self.prescaler = 0;
        }
    }
}
