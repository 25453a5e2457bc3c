use embassy_time::Duration;

use crate::command::nr_mode::types::NrMode;

/// Desired modem configuration and retry behaviour.
///
/// Every value has a default, so an empty implementation keeps NR in
/// [`NrMode::Auto`] with dual SIM standby enabled.
pub trait EnablerConfig {
    const NR_MODE: NrMode = NrMode::Auto;

    /// Value written to the dual SIM standby NV item
    const DSS_ENABLED: u8 = 1;

    const RETRY_DELAY: Duration = crate::module_timing::retry_delay();
}

pub struct DefaultConfig;

impl EnablerConfig for DefaultConfig {}
