//! Strobe - 8080 TFT panel and I2C touch firmware
//!
//! Boot-time probe of the panel and touch controller named in the embedded
//! board file, then three tasks: the flush worker that owns the panel bus,
//! a touch poller, and a test pattern renderer feeding the flush queue.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::{InterruptHandler as PioInterruptHandler, Pio};
use embassy_time::Timer;
use static_cell::StaticCell;
use strobe_core::config::{parse_board_config, BoardConfig};
use strobe_hal_rp2040::pins::PinBank;
use {defmt_rtt as _, panic_probe as _};

use crate::board::TouchPeripherals;
use crate::channels::{touch_presses, Pipeline, QUEUE_DEPTH};

/// Embedded board description (compiled into firmware)
/// Edit board.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../board.toml");

mod board;
mod channels;
mod tasks;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => PioInterruptHandler<PIO0>;
});

static PIPELINE: StaticCell<Pipeline> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Strobe firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();

    if let Err(e) = board::check_pins(&config) {
        error!("Board pin assignment rejected: {}", e);
        halt().await;
    }

    let (mut bank, rest) = PinBank::from_peripherals(p);
    let Pio {
        mut common, sm0, ..
    } = Pio::new(rest.pio0, Irqs);

    let display = match board::bring_up_display(
        &config.display,
        &mut bank,
        &mut common,
        sm0,
        rest.dma_ch0.into(),
    )
    .await
    {
        Ok(display) => display,
        Err(e) => {
            error!("Display probe failed: {}", e);
            halt().await
        }
    };
    let screen = display.resolution();

    let touch = config.touch.as_ref().and_then(|touch_config| {
        let peripherals = TouchPeripherals {
            i2c: rest.i2c1,
            sda: rest.i2c_sda,
            scl: rest.i2c_scl,
        };
        match board::bring_up_touch(touch_config, &mut bank, peripherals, screen) {
            Ok(touch) => Some(touch),
            Err(e) => {
                warn!("Touch probe failed, running without touch: {}", e);
                None
            }
        }
    });

    if config.flush.queue_depth != QUEUE_DEPTH {
        warn!(
            "board asks for queue depth {}, firmware is built with {}",
            config.flush.queue_depth, QUEUE_DEPTH
        );
    }
    let pipeline: &'static Pipeline = PIPELINE.init(Pipeline::new(config.flush.ack_timeout_ms));

    spawner.spawn(tasks::flush_task(pipeline, display)).unwrap();
    spawner.spawn(tasks::pattern_task(pipeline, screen)).unwrap();
    if let Some(touch) = touch {
        spawner.spawn(tasks::touch_task(touch)).unwrap();
    }

    info!("All tasks spawned, firmware running");

    // The PIO program stays loaded while `common` is alive
    loop {
        Timer::after_secs(60).await;
        let stats = pipeline.stats();
        debug!(
            "heartbeat: {} frames flushed, {} dropped, {} touches",
            stats.flushed,
            stats.dropped,
            touch_presses()
        );
    }
}

/// Parse the embedded board file, falling back to the reference board
fn load_config() -> BoardConfig {
    match parse_board_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Board: panel {}, {}-bit {} bus",
                config.display.panel.as_str(),
                config.display.bus_width.bits(),
                config.display.bus
            );
            config
        }
        Err(e) => {
            warn!("board.toml rejected ({}), using reference board", e);
            BoardConfig::default()
        }
    }
}

/// Park the core after a fatal boot error
async fn halt() -> ! {
    loop {
        Timer::after_secs(1).await;
    }
}
