//! Inter-task communication
//!
//! The flush pipeline is the only path from the renderer to the panel; the
//! signals carry its completion and touch points back to the renderer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU32, Ordering};
use strobe_core::flush::{FlushPipeline, DEFAULT_QUEUE_DEPTH};

/// Queue depth compiled into the firmware
pub const QUEUE_DEPTH: usize = DEFAULT_QUEUE_DEPTH;

/// Frame pipeline shared by the renderer and the flush worker
pub type Pipeline = FlushPipeline<'static, CriticalSectionRawMutex, QUEUE_DEPTH>;

/// Last queued frame reached the panel; the renderer may reuse its buffer
pub static FLUSH_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Latest touch point in screen coordinates
pub static TOUCH_POINT: Signal<CriticalSectionRawMutex, (u16, u16)> = Signal::new();

/// Presses seen since boot
static TOUCH_PRESSES: AtomicU32 = AtomicU32::new(0);

pub fn count_press() {
    TOUCH_PRESSES.fetch_add(1, Ordering::Relaxed);
}

pub fn touch_presses() -> u32 {
    TOUCH_PRESSES.load(Ordering::Relaxed)
}
