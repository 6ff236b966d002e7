//! Flush worker
//!
//! Sole writer of the panel bus once boot is over.

use defmt::*;
use embassy_time::Delay;

use crate::board::Display;
use crate::channels::{Pipeline, FLUSH_READY};

#[embassy_executor::task]
pub async fn flush_task(pipeline: &'static Pipeline, mut display: Display) {
    info!("Flush task started");

    pipeline
        .run(&mut display, &mut Delay, |_| FLUSH_READY.signal(()))
        .await
}
