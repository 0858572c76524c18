use std::thread;
use std::time::Duration;

/// Models the time a mined block spends travelling before it is validated.
pub trait Propagation {
    fn propagate(&mut self, delay: Duration);
}

/// No wall-clock wait; the delay only matters for validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Instant;

impl Propagation for Instant {
    fn propagate(&mut self, _delay: Duration) {}
}

/// Blocks the calling thread for the whole delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sleep;

impl Propagation for Sleep {
    fn propagate(&mut self, delay: Duration) {
        thread::sleep(delay);
    }
}
