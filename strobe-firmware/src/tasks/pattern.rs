//! Test pattern renderer
//!
//! Stands in for a UI engine: scrolls colour stripes down the panel and
//! drops a marker wherever the panel is touched. Every pixel buffer is a
//! `static`, so it outlives the frames that borrow it.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Ticker};
use strobe_core::flush::VideoFrame;
use strobe_core::Area;

use crate::channels::{Pipeline, FLUSH_READY, TOUCH_POINT};

/// Redraw interval of the stripe pattern
const REDRAW_INTERVAL_MS: u64 = 500;

const STRIPE_ROWS: u16 = 8;
const MAX_COLUMNS: usize = 480;
const STRIPE_PIXELS: usize = MAX_COLUMNS * STRIPE_ROWS as usize;

const MARKER_SIZE: u16 = 8;

/// RGB565 stripe colours
const PALETTE: [u16; 8] = [
    0xF800, // red
    0x07E0, // green
    0x001F, // blue
    0xFFE0, // yellow
    0x07FF, // cyan
    0xF81F, // magenta
    0xFFFF, // white
    0x0000, // black
];

static STRIPES: [[u16; STRIPE_PIXELS]; PALETTE.len()] = [
    [PALETTE[0]; STRIPE_PIXELS],
    [PALETTE[1]; STRIPE_PIXELS],
    [PALETTE[2]; STRIPE_PIXELS],
    [PALETTE[3]; STRIPE_PIXELS],
    [PALETTE[4]; STRIPE_PIXELS],
    [PALETTE[5]; STRIPE_PIXELS],
    [PALETTE[6]; STRIPE_PIXELS],
    [PALETTE[7]; STRIPE_PIXELS],
];

static MARKER: [u16; (MARKER_SIZE * MARKER_SIZE) as usize] = [0xFFFF; (MARKER_SIZE * MARKER_SIZE) as usize];

#[embassy_executor::task]
pub async fn pattern_task(pipeline: &'static Pipeline, screen: (u16, u16)) {
    info!("Pattern task started ({}x{})", screen.0, screen.1);

    let mut ticker = Ticker::every(Duration::from_millis(REDRAW_INTERVAL_MS));
    let mut phase = 0;

    loop {
        match select(ticker.next(), TOUCH_POINT.wait()).await {
            Either::First(()) => {
                draw_stripes(pipeline, screen, phase).await;
                phase = (phase + 1) % PALETTE.len();
            }
            Either::Second((x, y)) => draw_marker(pipeline, screen, x, y).await,
        }
    }
}

async fn enqueue(pipeline: &'static Pipeline, area: Area, pixels: &'static [u16]) {
    match VideoFrame::new(area, pixels) {
        Ok(frame) => pipeline.enqueue(frame).await,
        Err(e) => warn!("frame rejected: {}", e),
    }
}

async fn draw_stripes(pipeline: &'static Pipeline, screen: (u16, u16), phase: usize) {
    let (xres, yres) = screen;
    let columns = xres.min(MAX_COLUMNS as u16);

    FLUSH_READY.reset();

    let mut y = 0;
    let mut index = phase;
    while y < yres {
        let rows = STRIPE_ROWS.min(yres - y);
        let area = Area::new(0, y, columns - 1, y + rows - 1);
        enqueue(pipeline, area, &STRIPES[index % STRIPES.len()]).await;
        y += rows;
        index += 1;
    }

    // A dropped frame never signals
    let timeout = Duration::from_millis(pipeline.ack_timeout_ms() as u64 * pipeline.capacity() as u64);
    if with_timeout(timeout, FLUSH_READY.wait()).await.is_err() {
        warn!("no stripe acknowledged within {} ms", timeout.as_millis());
    }

    let stats = pipeline.stats();
    trace!("flushed {}, dropped {}", stats.flushed, stats.dropped);
}

async fn draw_marker(pipeline: &'static Pipeline, screen: (u16, u16), x: u16, y: u16) {
    let (xres, yres) = screen;
    let xs = x.min(xres.saturating_sub(MARKER_SIZE));
    let ys = y.min(yres.saturating_sub(MARKER_SIZE));
    let xe = (xs + MARKER_SIZE - 1).min(xres - 1);
    let ye = (ys + MARKER_SIZE - 1).min(yres - 1);

    enqueue(pipeline, Area::new(xs, ys, xe, ye), &MARKER).await;
}
