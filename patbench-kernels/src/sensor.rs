//! Sensor: moving average over a pull-based counter source.

use patbench_core::{
    CancelToken, ExecutionPolicy, PatternError, StreamStats, StreamWindow, WindowConfig,
};

/// Monotonically increasing counter standing in for a hardware sensor.
///
/// The counter is owned by the sensor instance; two sensors never share it.
#[derive(Debug, Clone, Default)]
pub struct Sensor {
    next: i64,
}

impl Sensor {
    /// Counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter starting at `start`
    pub fn starting_at(start: i64) -> Self {
        Self { next: start }
    }

    /// Current reading; advances the counter
    pub fn read(&mut self) -> i64 {
        let value = self.next;
        self.next += 1;
        value
    }
}

/// Stream `sensor` through a sliding window, handing each mean to `sink`
pub fn moving_average<K>(
    config: WindowConfig,
    cancel: CancelToken,
    sensor: &mut Sensor,
    sink: K,
    policy: &ExecutionPolicy,
) -> Result<StreamStats, PatternError>
where
    K: FnMut(f64),
{
    let stream = StreamWindow::new(config, cancel)?;
    Ok(stream.run(|| sensor.read(), sink, policy))
}
