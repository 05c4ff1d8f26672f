use std::thread;

use signal_hook::consts::{SIGALRM, SIGUSR1, SIGUSR2};
use signal_hook::iterator::Signals;

use super::{Condition, Session};
use crate::error::ShellError;

const FAULT_NOTICE: &[u8] = b"A segmentation fault has been detected.\nExiting...\n";

/// A segmentation fault cannot be rerouted to a helper thread: the faulting
/// thread can never resume. The handler therefore stays strictly
/// async-signal-safe, a raw write of the notice followed by `_exit`. The log
/// needs no handler-side flush because the loop flushes after every append.
extern "C" fn fault_handler(_signal: libc::c_int) {
    unsafe {
        libc::write(
            libc::STDERR_FILENO,
            FAULT_NOTICE.as_ptr() as *const libc::c_void,
            FAULT_NOTICE.len(),
        );
        libc::_exit(Condition::Fault.exit_code());
    }
}

/// Installs the three dispositions. Interrupt and timeout handling runs in
/// ordinary threads (`ctrlc`'s handler thread and a `signal-hook` iterator)
/// so the orderly shutdown never executes in an async-signal context; the
/// handlers themselves are only notifiers.
pub fn install(session: &Session) -> Result<(), ShellError> {
    let interrupt_session = session.clone();
    ctrlc::set_handler(move || interrupt_session.terminate(Condition::Interrupt))?;

    let timeout_session = session.clone();
    let mut signals = Signals::new([SIGALRM, SIGUSR1, SIGUSR2])?;
    thread::spawn(move || {
        for signal in signals.forever() {
            match signal {
                SIGALRM => timeout_session.terminate(Condition::Timeout),
                other => eprintln!("scribe: caught unexpected signal {}", other),
            }
        }
    });

    unsafe {
        libc::signal(libc::SIGSEGV, fault_handler as libc::sighandler_t);
    }

    Ok(())
}

/// Diagnostic self-test behind the `explode` keyword: a genuine invalid
/// memory write, so the fault disposition is exercised end to end rather
/// than simulated.
pub fn trigger_fault() -> ! {
    let bomb: *mut i32 = std::ptr::null_mut();
    unsafe {
        std::ptr::write_volatile(bomb, 42);
    }
    unreachable!("the invalid write above faults the process")
}
