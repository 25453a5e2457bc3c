use embassy_time::Duration;

/// Time to wait before running a failed convergence pass again
pub const fn retry_delay() -> Duration {
    Duration::from_millis(5000)
}

/// Time to wait before binding the tunnel again after it died
pub const fn rebind_delay() -> Duration {
    Duration::from_millis(4000)
}
