use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Context, Poll};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::WakerRegistration;
use serde::{Deserialize, Serialize};

/// Where the convergence loop is.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConvergenceState {
    /// Waiting for a configuration change
    Idle,
    /// A pass is applying the configuration to the active phones
    Running,
    /// The last pass failed, another one is due after the retry delay
    ScheduledRetry,
}

pub struct State {
    shared: Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                convergence_state: ConvergenceState::Idle,
                trigger_pending: false,
                failed_passes: 0,
                state_waker: WakerRegistration::new(),
                trigger_waker: WakerRegistration::new(),
            })),
        }
    }
}

/// State of the convergence loop
pub struct Shared {
    convergence_state: ConvergenceState,
    trigger_pending: bool,
    /// Consecutive failed passes, reset by a successful one
    failed_passes: u32,
    state_waker: WakerRegistration,
    trigger_waker: WakerRegistration,
}

#[derive(Clone)]
pub struct Runner<'d> {
    pub(crate) shared: &'d Mutex<NoopRawMutex, RefCell<Shared>>,
}

impl<'d> Runner<'d> {
    pub fn new(state: &'d mut State) -> Self {
        Self {
            shared: &state.shared,
        }
    }

    pub fn convergence_state(&self, cx: Option<&mut Context>) -> ConvergenceState {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.state_waker.register(cx.waker());
            }
            s.convergence_state
        })
    }

    pub fn failed_passes(&self) -> u32 {
        self.shared.lock(|s| s.borrow().failed_passes)
    }

    /// Ask for a convergence pass.
    ///
    /// Returns `false` when a pass is already running; the trigger is then
    /// dropped, since that pass schedules its own retry if it fails.
    pub fn trigger(&self) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.convergence_state == ConvergenceState::Running {
                return false;
            }
            s.trigger_pending = true;
            s.trigger_waker.wake();
            true
        })
    }

    /// Move to `Running` unless a pass is already in flight.
    pub(crate) fn begin_pass(&self) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if s.convergence_state == ConvergenceState::Running {
                return false;
            }
            s.convergence_state = ConvergenceState::Running;
            s.trigger_pending = false;
            s.state_waker.wake();
            true
        })
    }

    pub(crate) fn end_pass(&self, success: bool) {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if success {
                s.convergence_state = ConvergenceState::Idle;
                s.failed_passes = 0;
            } else {
                s.convergence_state = ConvergenceState::ScheduledRetry;
                s.failed_passes = s.failed_passes.saturating_add(1);
            }
            s.state_waker.wake();
        })
    }

    fn take_trigger(&self, cx: Option<&mut Context>) -> bool {
        self.shared.lock(|s| {
            let s = &mut *s.borrow_mut();
            if let Some(cx) = cx {
                s.trigger_waker.register(cx.waker());
            }
            core::mem::take(&mut s.trigger_pending)
        })
    }

    pub async fn wait_for_trigger(&self) {
        if self.take_trigger(None) {
            return;
        }

        poll_fn(|cx| {
            if self.take_trigger(Some(cx)) {
                return Poll::Ready(());
            }
            Poll::Pending
        })
        .await
    }

    pub async fn wait_for_convergence_state(&self, cs: ConvergenceState) {
        if self.convergence_state(None) == cs {
            return;
        }

        poll_fn(|cx| {
            if self.convergence_state(Some(cx)) == cs {
                return Poll::Ready(());
            }
            Poll::Pending
        })
        .await
    }
}
