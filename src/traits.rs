//! Collaborators provided by the host.
use heapless::Vec;

use crate::{PhoneId, MAX_PHONES};

/// Request/response exchange with the RIL message tunnel.
pub trait OemHookTunnel {
    /// Send `request` to the modem serving `phone_id`.
    ///
    /// A status `>= 0` means the request was accepted and `response` was
    /// filled, up to its length, with the answer. A negative status means the
    /// exchange failed and `response` holds nothing meaningful.
    async fn exchange(&mut self, phone_id: PhoneId, request: &[u8], response: &mut [u8]) -> i32;
}

/// A bound tunnel that can tell whether its remote end is still alive.
pub trait BoundTunnel: OemHookTunnel {
    fn is_alive(&self) -> bool;
}

/// Binds to the tunnel service.
pub trait TunnelBinder {
    type Tunnel: BoundTunnel;

    async fn bind(&mut self) -> Option<Self::Tunnel>;
}

/// Subscription and modem enumeration.
pub trait Telephony {
    /// Phone ids of the active subscriptions, in a stable order.
    fn active_phone_ids(&mut self) -> Vec<PhoneId, MAX_PHONES>;

    fn active_modem_count(&mut self) -> usize;
}
