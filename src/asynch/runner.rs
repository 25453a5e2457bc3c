use embassy_futures::select::{select, Either};
use embassy_time::Timer;

use crate::config::EnablerConfig;
use crate::error::Error;
use crate::traits::{OemHookTunnel, Telephony};

use super::control::Control;
use super::state::{self, ConvergenceState};

/// Background task applying the configuration of `C` to every active phone.
///
/// Nothing happens until the first trigger from [`Control::reconverge`]. A
/// failed pass is retried every [`EnablerConfig::RETRY_DELAY`] until one
/// succeeds.
pub struct Runner<'d, T: OemHookTunnel, P: Telephony, C: EnablerConfig> {
    ch: state::Runner<'d>,
    control: Control<'d, T>,
    telephony: P,
    config: C,
}

impl<'d, T: OemHookTunnel, P: Telephony, C: EnablerConfig> Runner<'d, T, P, C> {
    pub(crate) fn new(
        ch: state::Runner<'d>,
        control: Control<'d, T>,
        telephony: P,
        config: C,
    ) -> Self {
        Self {
            ch,
            control,
            telephony,
            config,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Run a single convergence pass.
    ///
    /// Returns [`Error::Busy`] without touching the modem if another pass is
    /// in flight.
    pub async fn converge(&mut self) -> Result<(), Error> {
        if !self.ch.begin_pass() {
            warn!("Convergence pass already running");
            return Err(Error::Busy);
        }

        let res = self.converge_pass().await;
        match res {
            Ok(()) => info!("Modem configuration converged"),
            Err(e) => warn!(
                "Convergence pass failed: {:?}, retrying in {} ms",
                e,
                C::RETRY_DELAY.as_millis()
            ),
        }

        self.ch.end_pass(res.is_ok());
        res
    }

    async fn converge_pass(&mut self) -> Result<(), Error> {
        let phone_ids = self.telephony.active_phone_ids();
        if phone_ids.is_empty() {
            debug!("No active subscriptions");
            return Ok(());
        }

        let modem_count = self.telephony.active_modem_count();
        if let Some(&invalid) = phone_ids.iter().find(|id| !id.is_valid(modem_count)) {
            error!(
                "Phone id {} out of range for {} modems",
                invalid.0,
                modem_count
            );
            return Err(Error::InvalidPhoneId(invalid));
        }

        for &phone_id in phone_ids.iter() {
            debug!("Converging phone {}", phone_id.0);
            self.control.set_nr_mode(phone_id, C::NR_MODE).await?;
            self.control
                .set_dss_enabled(phone_id, C::DSS_ENABLED)
                .await?;
        }

        Ok(())
    }

    pub async fn run(&mut self) -> ! {
        loop {
            if self.ch.convergence_state(None) == ConvergenceState::ScheduledRetry {
                match select(self.ch.wait_for_trigger(), Timer::after(C::RETRY_DELAY)).await {
                    Either::First(()) => debug!("Reconverge requested, retry timer cancelled"),
                    Either::Second(()) => debug!(
                        "Retrying after {} failed passes",
                        self.ch.failed_passes()
                    ),
                }
            } else {
                self.ch.wait_for_trigger().await;
            }

            let _ = self.converge().await;
        }
    }
}
