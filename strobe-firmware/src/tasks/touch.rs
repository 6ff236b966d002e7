//! Touch polling task
//!
//! Samples the controller at a fixed rate and forwards presses to the
//! renderer. A bus error skips the sample; the next poll tries again.

use defmt::*;
use embassy_time::{Duration, Ticker};

use crate::board::TouchBoard;
use crate::channels::{count_press, TOUCH_POINT};

/// Poll interval in milliseconds
pub const POLL_INTERVAL_MS: u64 = 20;

#[embassy_executor::task]
pub async fn touch_task(mut touch: TouchBoard) {
    info!("Touch task started");

    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut was_pressed = false;

    loop {
        ticker.next().await;

        match touch.device.read_point() {
            Ok(Some((x, y))) => {
                if !was_pressed {
                    debug!("touch down at ({}, {})", x, y);
                    count_press();
                }
                was_pressed = true;
                TOUCH_POINT.signal((x, y));
            }
            Ok(None) => {
                if was_pressed {
                    trace!("touch up");
                }
                was_pressed = false;
            }
            Err(e) => warn!("touch read failed: {}", e),
        }
    }
}
