use embassy_time::{Duration, Instant};

use crate::traits::{BoundTunnel, OemHookTunnel, TunnelBinder};
use crate::PhoneId;

/// Tunnel status returned while no tunnel is bound.
pub const NOT_CONNECTED: i32 = -1;

/// [`OemHookTunnel`] that binds on demand and rebinds after the remote end
/// dies.
///
/// The first exchange binds the tunnel. Once the bound tunnel stops being
/// alive it is dropped and exchanges fail with [`NOT_CONNECTED`] until the
/// rebind delay has passed.
pub struct Connector<B: TunnelBinder> {
    binder: B,
    tunnel: Option<B::Tunnel>,
    rebind_at: Option<Instant>,
    rebind_delay: Duration,
}

impl<B: TunnelBinder> Connector<B> {
    pub fn new(binder: B) -> Self {
        Self {
            binder,
            tunnel: None,
            rebind_at: None,
            rebind_delay: crate::module_timing::rebind_delay(),
        }
    }

    pub fn with_rebind_delay(mut self, rebind_delay: Duration) -> Self {
        self.rebind_delay = rebind_delay;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.tunnel.as_ref().is_some_and(|t| t.is_alive())
    }

    async fn connect(&mut self) -> Option<&mut B::Tunnel> {
        if self.tunnel.as_ref().is_some_and(|t| !t.is_alive()) {
            warn!(
                "OEM hook tunnel died, rebinding in {} ms",
                self.rebind_delay.as_millis()
            );
            self.tunnel = None;
            self.rebind_at = Some(Instant::now() + self.rebind_delay);
        }

        if self.tunnel.is_none() {
            if self.rebind_at.is_some_and(|at| Instant::now() < at) {
                return None;
            }

            match self.binder.bind().await {
                Some(tunnel) => {
                    info!("OEM hook tunnel bound");
                    self.tunnel = Some(tunnel);
                    self.rebind_at = None;
                }
                None => {
                    error!("Binding OEM hook tunnel failed");
                    self.rebind_at = Some(Instant::now() + self.rebind_delay);
                }
            }
        }

        self.tunnel.as_mut()
    }
}

impl<B: TunnelBinder> OemHookTunnel for Connector<B> {
    async fn exchange(&mut self, phone_id: PhoneId, request: &[u8], response: &mut [u8]) -> i32 {
        match self.connect().await {
            Some(tunnel) => tunnel.exchange(phone_id, request, response).await,
            None => {
                warn!("OEM hook tunnel not connected");
                NOT_CONNECTED
            }
        }
    }
}
