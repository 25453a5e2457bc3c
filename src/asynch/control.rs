use crate::command::nr_mode::{types::NrMode, GetNrMode, SetNrMode};
use crate::command::nv::{
    responses::OemHookError,
    types::{NvData, NvItemId, NvValue},
    GetNvItem, SetNvItem,
};
use crate::error::Error;
use crate::traits::OemHookTunnel;
use crate::PhoneId;

use super::state::{self, ConvergenceState};
use super::TunnelHandle;

/// Value reported for dual SIM standby when the NV item cannot be read.
/// It matches no real setting, so the desired value always gets written.
pub const DSS_UNKNOWN: u8 = 2;

/// Reads and writes the modem configuration of a phone.
///
/// The setters read first and skip the write when the modem already holds the
/// desired value, so calling them repeatedly is cheap once converged.
pub struct Control<'a, T: OemHookTunnel> {
    state_ch: state::Runner<'a>,
    tunnel: TunnelHandle<'a, T>,
}

impl<T: OemHookTunnel> Clone for Control<'_, T> {
    fn clone(&self) -> Self {
        Self {
            state_ch: self.state_ch.clone(),
            tunnel: self.tunnel,
        }
    }
}

impl<'a, T: OemHookTunnel> Control<'a, T> {
    pub(crate) fn new(state_ch: state::Runner<'a>, tunnel: TunnelHandle<'a, T>) -> Self {
        Self { state_ch, tunnel }
    }

    pub fn convergence_state(&self) -> ConvergenceState {
        self.state_ch.convergence_state(None)
    }

    /// Consecutive failed convergence passes.
    pub fn failed_passes(&self) -> u32 {
        self.state_ch.failed_passes()
    }

    /// Apply the configuration again, typically after the carrier
    /// configuration changed.
    ///
    /// Returns `false` if a pass is already running, in which case the
    /// request is dropped.
    pub fn reconverge(&self) -> bool {
        let accepted = self.state_ch.trigger();
        if !accepted {
            debug!("Convergence pass in progress, dropping trigger");
        }
        accepted
    }

    pub async fn wait_for_convergence_state(&self, cs: ConvergenceState) {
        self.state_ch.wait_for_convergence_state(cs).await
    }

    /// Current NR mode, `None` if the modem reports a code this crate does
    /// not know.
    pub async fn nr_mode(&self, phone_id: PhoneId) -> Result<Option<NrMode>, Error> {
        self.tunnel.send(phone_id, &GetNrMode).await
    }

    /// Set the NR mode unless the modem already reports `mode`.
    ///
    /// Succeeds as soon as the tunnel accepts the request; unlike NV writes
    /// the response body is not checked.
    pub async fn set_nr_mode(&self, phone_id: PhoneId, mode: NrMode) -> Result<(), Error> {
        let current = match self.nr_mode(phone_id).await {
            Ok(current) => current,
            Err(e) => {
                warn!("Reading NR mode of phone {} failed: {:?}", phone_id.0, e);
                None
            }
        };
        debug!("NR mode in modem = {:?}", current);

        if current == Some(mode) {
            debug!(
                "NR mode already {:?}, ignore set for phone {}",
                mode,
                phone_id.0
            );
            return Ok(());
        }

        self.tunnel.send(phone_id, &SetNrMode { mode }).await?;
        info!("NR mode of phone {} set to {:?}", phone_id.0, mode);
        Ok(())
    }

    pub async fn read_nv_item(
        &self,
        phone_id: PhoneId,
        element_id: NvItemId,
        record_number: i32,
    ) -> Result<NvValue, Error> {
        self.tunnel
            .send(phone_id, &GetNvItem::new(element_id, record_number))
            .await
    }

    /// Write an NV item, succeeding only if the modem reports success in the
    /// response header.
    pub async fn write_nv_item(&self, phone_id: PhoneId, value: NvValue) -> Result<(), Error> {
        let header = self.tunnel.send(phone_id, &SetNvItem { value }).await?;
        debug!("NV write result for {}", header.request_id.name());

        match header.error {
            OemHookError::Success => Ok(()),
            e => {
                warn!("NV write on phone {} rejected: {:?}", phone_id.0, e);
                Err(Error::Remote(e))
            }
        }
    }

    /// Dual SIM standby flag, or [`DSS_UNKNOWN`] if it cannot be read.
    pub async fn dss_enabled(&self, phone_id: PhoneId) -> u8 {
        match self.read_nv_item(phone_id, NvItemId::DSS, 0).await {
            Ok(NvValue {
                data: Some(data), ..
            }) => data.as_bytes().first().copied().unwrap_or(DSS_UNKNOWN),
            Ok(_) => DSS_UNKNOWN,
            Err(e) => {
                warn!("Reading DSS of phone {} failed: {:?}", phone_id.0, e);
                DSS_UNKNOWN
            }
        }
    }

    /// Set the dual SIM standby flag unless the modem already holds `enabled`.
    pub async fn set_dss_enabled(&self, phone_id: PhoneId, enabled: u8) -> Result<(), Error> {
        let prev = self.dss_enabled(phone_id).await;
        debug!("Previous DSS mode = {}", prev);

        if prev == enabled {
            debug!("Skip setting DSS as no change.");
            return Ok(());
        }

        self.write_nv_item(
            phone_id,
            NvValue::new(NvItemId::DSS).with_data(NvData::byte(enabled)),
        )
        .await?;
        info!("DSS of phone {} set to {}", phone_id.0, enabled);
        Ok(())
    }
}
