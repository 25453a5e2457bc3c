pub mod connector;
pub mod control;
pub mod runner;
pub mod state;

use embassy_sync::{blocking_mutex::raw::NoopRawMutex, mutex::Mutex};

use crate::command::{OemHookCmd, MAX_RESPONSE_LEN};
use crate::config::EnablerConfig;
use crate::error::Error;
use crate::hex::Hex;
use crate::traits::{OemHookTunnel, Telephony};
use crate::PhoneId;

use control::Control;
use runner::Runner;

pub(crate) struct Tunnel<T: OemHookTunnel> {
    inner: T,
    ingress_buf: [u8; MAX_RESPONSE_LEN],
}

/// Shared access to the tunnel. Exchanges are serialised, so a request and
/// its response are never interleaved with another one.
pub struct TunnelHandle<'d, T: OemHookTunnel>(&'d Mutex<NoopRawMutex, Tunnel<T>>);

impl<T: OemHookTunnel> Clone for TunnelHandle<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: OemHookTunnel> Copy for TunnelHandle<'_, T> {}

impl<'d, T: OemHookTunnel> TunnelHandle<'d, T> {
    pub(crate) async fn send<Cmd: OemHookCmd>(
        &self,
        phone_id: PhoneId,
        cmd: &Cmd,
    ) -> Result<Cmd::Response, Error> {
        let req = cmd.encode()?;

        let mut tunnel = self.0.lock().await;
        let Tunnel { inner, ingress_buf } = &mut *tunnel;
        let resp = ingress_buf
            .get_mut(..Cmd::RESPONSE_LEN)
            .ok_or(Error::Overflow)?;
        resp.fill(0);

        debug!(
            "{} for phone {}: {}",
            Cmd::REQUEST_ID.name(),
            phone_id.0,
            Hex(&req)
        );
        let status = inner.exchange(phone_id, &req, resp).await;
        if status < 0 {
            error!(
                "{} failed for phone {} with status {}",
                Cmd::REQUEST_ID.name(),
                phone_id.0,
                status
            );
            return Err(Error::Channel(status));
        }
        trace!("Response for phone {}: {}", phone_id.0, Hex(resp));

        cmd.parse(resp)
    }
}

pub struct State<T: OemHookTunnel> {
    ch: state::State,
    tunnel: Mutex<NoopRawMutex, Tunnel<T>>,
}

impl<T: OemHookTunnel> State<T> {
    pub fn new(tunnel: T) -> Self {
        Self {
            ch: state::State::new(),
            tunnel: Mutex::new(Tunnel {
                inner: tunnel,
                ingress_buf: [0; MAX_RESPONSE_LEN],
            }),
        }
    }
}

/// Split `state` into the [`Control`] handle used by the host and the
/// [`Runner`] that must be polled in a background task.
pub fn new<'a, T: OemHookTunnel, P: Telephony, C: EnablerConfig>(
    state: &'a mut State<T>,
    telephony: P,
    config: C,
) -> (Control<'a, T>, Runner<'a, T, P, C>) {
    let ch = state::Runner::new(&mut state.ch);
    let tunnel = TunnelHandle(&state.tunnel);

    let control = Control::new(ch.clone(), tunnel);
    let runner = Runner::new(ch.clone(), Control::new(ch, tunnel), telephony, config);

    (control, runner)
}
