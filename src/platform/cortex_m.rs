use cortex_m::register::control::{self, Npriv};

use crate::ExecutionContext;

/// Thread mode privilege as configured in `CONTROL.nPRIV`.
///
/// Handler mode always runs privileged; this reflects the mode the check was called from.
pub fn current_context() -> ExecutionContext {
    match control::read().npriv() {
        Npriv::Privileged => ExecutionContext::Privileged,
        Npriv::Unprivileged => ExecutionContext::Unprivileged,
    }
}

/// Mask interrupts and sleep forever.
pub fn halt() -> ! {
    cortex_m::interrupt::disable();
    loop {
        cortex_m::asm::wfi();
    }
}
