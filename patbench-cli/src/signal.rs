//! Interrupt Handling
//!
//! SIGINT cancels the process-wide [`CancelToken`] instead of killing the
//! process, so a running sensor stream finishes its current window and the
//! timing line is still printed. On non-Unix platforms no handler is
//! installed and the token is never cancelled by the OS.

use patbench_core::CancelToken;
use std::sync::OnceLock;

/// Token cancelled by SIGINT; created with the handler on first use.
static INTERRUPT: OnceLock<CancelToken> = OnceLock::new();

/// The interrupt token, installing the SIGINT handler on first call
pub fn interrupt_token() -> CancelToken {
    INTERRUPT
        .get_or_init(|| {
            install_sigint_handler();
            CancelToken::new()
        })
        .clone()
}

/// Install a SIGINT handler that cancels the interrupt token.
/// The handler is async-signal-safe (only touches atomics).
#[cfg(unix)]
fn install_sigint_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigint_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&mut sa.sa_mask);
        if libc::sigaction(libc::SIGINT, &sa, std::ptr::null_mut()) != 0 {
            tracing::warn!(
                error = %std::io::Error::last_os_error(),
                "failed to install SIGINT handler"
            );
        }
    }
}

#[cfg(unix)]
extern "C" fn sigint_handler(_sig: libc::c_int) {
    if let Some(token) = INTERRUPT.get() {
        token.cancel();
    }
}

/// No-op on non-Unix.
#[cfg(not(unix))]
fn install_sigint_handler() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_shared() {
        let a = interrupt_token();
        let b = interrupt_token();
        // Shared with other tests in this process; never cancelled here.
        assert_eq!(a.is_cancelled(), b.is_cancelled());
        assert!(!a.is_cancelled());
    }
}
