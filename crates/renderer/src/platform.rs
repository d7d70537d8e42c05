//! Process-wide windowing backend lifecycle.
//!
//! winit allows one event loop per process, and it must live on the thread
//! that created it. The loop is therefore kept in a per-thread slot:
//!
//! ```text
//!   Uninit ──first acquire──▶ InUse ──Platform dropped──▶ Idle
//!                               ▲                           │
//!                               └──────next acquire─────────┘
//! ```
//!
//! The first window initialises the backend, later windows reuse it, and the
//! loop is torn down once when the owning thread exits. Acquiring while a
//! window still holds the loop fails with [`InitError::BackendBusy`].

use std::cell::RefCell;
use std::thread::LocalKey;

use winit::event_loop::{EventLoop, EventLoopBuilder};

use crate::error::InitError;

enum Slot<T> {
    Uninit,
    Idle(T),
    InUse,
}

impl<T> Slot<T> {
    fn checkout(
        &mut self,
        init: impl FnOnce() -> Result<T, InitError>,
    ) -> Result<T, InitError> {
        match std::mem::replace(self, Slot::InUse) {
            Slot::Idle(value) => Ok(value),
            Slot::InUse => Err(InitError::BackendBusy),
            Slot::Uninit => init().map_err(|err| {
                *self = Slot::Uninit;
                err
            }),
        }
    }

    fn give_back(&mut self, value: T) {
        *self = Slot::Idle(value);
    }
}

thread_local! {
    static EVENT_LOOP: RefCell<Slot<EventLoop<()>>> = const { RefCell::new(Slot::Uninit) };
}

/// Exclusive lease on this thread's event loop, returned to the slot on drop.
pub(crate) struct Platform {
    event_loop: Option<EventLoop<()>>,
}

impl Platform {
    pub(crate) fn acquire(any_thread: bool) -> Result<Self, InitError> {
        let event_loop = EVENT_LOOP
            .with(|slot| slot.borrow_mut().checkout(|| build_event_loop(any_thread)))?;
        tracing::debug!("acquired windowing backend");
        Ok(Self {
            event_loop: Some(event_loop),
        })
    }

    pub(crate) fn event_loop(&self) -> &EventLoop<()> {
        self.event_loop.as_ref().expect("event loop leased")
    }

    pub(crate) fn event_loop_mut(&mut self) -> &mut EventLoop<()> {
        self.event_loop.as_mut().expect("event loop leased")
    }
}

impl Drop for Platform {
    fn drop(&mut self) {
        if let Some(event_loop) = self.event_loop.take() {
            give_back_to(&EVENT_LOOP, event_loop);
        }
    }
}

/// Returns `value` to the slot behind `key`. During thread teardown the slot
/// may already be destroyed, in which case `value` is dropped here.
fn give_back_to<T: 'static>(key: &'static LocalKey<RefCell<Slot<T>>>, value: T) {
    if let Err(err) = key.try_with(move |slot| slot.borrow_mut().give_back(value)) {
        tracing::trace!(%err, "backend slot gone; dropping event loop");
    }
}

fn build_event_loop(any_thread: bool) -> Result<EventLoop<()>, InitError> {
    let mut builder = EventLoopBuilder::new();

    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "ios", target_os = "android"))
    ))]
    if any_thread {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(true);
    }
    #[cfg(windows)]
    if any_thread {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(true);
    }
    #[cfg(any(target_os = "macos", target_os = "ios", target_os = "android"))]
    let _ = any_thread;

    builder
        .build()
        .map_err(|err| InitError::Backend(err.to_string()))
}
