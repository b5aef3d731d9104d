//! Progress reporting helpers for transfer workers.

mod throttle;

pub use throttle::ProgressThrottle;
