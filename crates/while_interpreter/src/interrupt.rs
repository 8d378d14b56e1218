use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// External cancellation signal for long running programs.
pub trait Interrupt {
    fn should_interrupt(&mut self) -> bool;
}

/// Never interrupts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupt;

impl Interrupt for NoInterrupt {
    fn should_interrupt(&mut self) -> bool {
        false
    }
}

/// Interrupts once a point in time has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(pub Instant);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }
}

impl Interrupt for Deadline {
    fn should_interrupt(&mut self) -> bool {
        Instant::now() >= self.0
    }
}

/// Interrupts once the flag is set, e.g. from another thread.
impl Interrupt for &AtomicBool {
    fn should_interrupt(&mut self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<I: Interrupt + ?Sized> Interrupt for &mut I {
    fn should_interrupt(&mut self) -> bool {
        (**self).should_interrupt()
    }
}
