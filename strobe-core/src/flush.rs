//! Frame flush pipeline
//!
//! Decouples the renderer from the bus. The renderer enqueues frames and
//! blocks only when the queue is full; a single worker pushes each frame
//! through the display, waits a bounded time for the completion
//! notification, and only then reports the frame buffer free again.
//!
//! ```text
//! renderer ──enqueue──► [ queue N ] ──► worker ──frame_sync──► display
//!     ▲                                   │  ▲                    │
//!     └────────── on_ready ◄──────────────┘  └──── completion ────┘
//! ```
//!
//! A frame whose completion does not arrive in time is dropped: the
//! renderer is not told it finished, and the worker moves on.

use core::cell::Cell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

use crate::area::Area;
use crate::display::FrameSink;

/// Completion wait before a frame is given up on
pub const DEFAULT_ACK_TIMEOUT_MS: u32 = 100;

/// Queue depth of the reference firmware
pub const DEFAULT_QUEUE_DEPTH: usize = 4;

/// Reasons a frame descriptor is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Start corner lies past the end corner
    InvalidArea,
    /// Fewer pixels than the area covers
    ShortBuffer { needed: usize, got: usize },
}

/// One region of rendered pixels
///
/// Borrows the renderer's buffer; the buffer must not be reused until the
/// renderer is told the frame is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrame<'a> {
    area: Area,
    pixels: &'a [u16],
}

impl<'a> VideoFrame<'a> {
    /// Describe a frame, trimming `pixels` to exactly the area's size
    pub fn new(area: Area, pixels: &'a [u16]) -> Result<Self, FrameError> {
        if !area.is_valid() {
            return Err(FrameError::InvalidArea);
        }
        let needed = area.pixel_count();
        let pixels = pixels.get(..needed).ok_or(FrameError::ShortBuffer {
            needed,
            got: pixels.len(),
        })?;
        Ok(Self { area, pixels })
    }

    pub fn area(&self) -> Area {
        self.area
    }

    pub fn pixels(&self) -> &'a [u16] {
        self.pixels
    }
}

/// Pipeline sizing and timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineConfig {
    pub queue_depth: usize,
    pub ack_timeout_ms: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_depth: DEFAULT_QUEUE_DEPTH,
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        }
    }
}

/// Result of one worker iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlushOutcome {
    /// Completion arrived; the renderer was notified
    Ready,
    /// Completion timed out; the frame was dropped silently
    Dropped,
}

/// Running counters of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlushStats {
    pub flushed: u32,
    pub dropped: u32,
}

/// Bounded frame queue with one consumer and a completion handshake
///
/// `N` is the queue capacity. All methods take `&self` so one pipeline can be
/// shared as a `static` between the renderer and the worker task.
pub struct FlushPipeline<'a, M: RawMutex, const N: usize> {
    queue: Channel<M, VideoFrame<'a>, N>,
    completion: Signal<M, ()>,
    stats: Mutex<M, Cell<FlushStats>>,
    ack_timeout_ms: u32,
}

impl<'a, M: RawMutex, const N: usize> FlushPipeline<'a, M, N> {
    pub const fn new(ack_timeout_ms: u32) -> Self {
        Self {
            queue: Channel::new(),
            completion: Signal::new(),
            stats: Mutex::const_new(
                M::INIT,
                Cell::new(FlushStats {
                    flushed: 0,
                    dropped: 0,
                }),
            ),
            ack_timeout_ms,
        }
    }

    /// Queue a frame, waiting while the queue is full
    pub async fn enqueue(&self, frame: VideoFrame<'a>) {
        self.queue.send(frame).await;
    }

    /// Queue a frame without waiting; a full queue hands the frame back
    pub fn try_enqueue(&self, frame: VideoFrame<'a>) -> Result<(), VideoFrame<'a>> {
        self.queue.try_send(frame).map_err(|err| match err {
            TrySendError::Full(frame) => frame,
        })
    }

    /// Frames waiting for the worker
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn ack_timeout_ms(&self) -> u32 {
        self.ack_timeout_ms
    }

    pub fn stats(&self) -> FlushStats {
        self.stats.lock(|stats| stats.get())
    }

    /// Push a frame to the display and notify completion on success
    async fn sync_and_notify<S: FrameSink>(&self, sink: &mut S, frame: &VideoFrame<'_>) {
        match sink.frame_sync(frame).await {
            Ok(()) => self.completion.signal(()),
            Err(_) => warn!("frame_sync failed, completion withheld"),
        }
    }

    /// Flush a frame inline on the calling task, bypassing the queue
    ///
    /// Used before the worker runs (boot splash) and for frames that must
    /// not wait behind the queue. The worker's completion signal is never
    /// touched; `on_ready` runs once the frame is on the panel.
    pub async fn flush_now<'f, S, F>(
        &self,
        sink: &mut S,
        frame: &VideoFrame<'f>,
        on_ready: F,
    ) -> Result<(), S::Error>
    where
        S: FrameSink,
        F: FnOnce(&VideoFrame<'f>),
    {
        sink.frame_sync(frame).await?;
        on_ready(frame);
        Ok(())
    }

    /// Take one frame from the queue and flush it
    ///
    /// Waits for a frame, runs `frame_sync`, then races the completion
    /// against the timeout. `on_ready` is called only when the completion
    /// arrived in time.
    pub async fn process_one<S, D, F>(
        &self,
        sink: &mut S,
        delay: &mut D,
        on_ready: &mut F,
    ) -> FlushOutcome
    where
        S: FrameSink,
        D: DelayNs,
        F: FnMut(&VideoFrame<'a>),
    {
        let frame = self.queue.receive().await;
        self.completion.reset();
        self.sync_and_notify(sink, &frame).await;

        match select(self.completion.wait(), delay.delay_ms(self.ack_timeout_ms)).await {
            Either::First(()) => {
                self.bump(|stats| stats.flushed = stats.flushed.wrapping_add(1));
                on_ready(&frame);
                FlushOutcome::Ready
            }
            Either::Second(()) => {
                warn!(
                    "flush of {} pixels timed out after {} ms, dropped",
                    frame.pixels().len(),
                    self.ack_timeout_ms
                );
                self.bump(|stats| stats.dropped = stats.dropped.wrapping_add(1));
                FlushOutcome::Dropped
            }
        }
    }

    /// Worker loop, never returns
    pub async fn run<S, D, F>(&self, sink: &mut S, delay: &mut D, mut on_ready: F) -> !
    where
        S: FrameSink,
        D: DelayNs,
        F: FnMut(&VideoFrame<'a>),
    {
        info!(
            "flush worker started (depth {}, timeout {} ms)",
            N, self.ack_timeout_ms
        );
        loop {
            self.process_one(sink, delay, &mut on_ready).await;
        }
    }

    fn bump(&self, update: impl FnOnce(&mut FlushStats)) {
        self.stats.lock(|cell| {
            let mut stats = cell.get();
            update(&mut stats);
            cell.set(stats);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::future::Future;
    use core::pin::pin;
    use core::task::{Context, Waker};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};

    extern crate std;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingSink {
        areas: Vec<Area>,
        fail: bool,
    }

    impl FrameSink for RecordingSink {
        type Error = ();

        async fn frame_sync(&mut self, frame: &VideoFrame<'_>) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.areas.push(frame.area());
            Ok(())
        }
    }

    /// Timeout that has always already elapsed
    struct Elapsed;

    impl DelayNs for Elapsed {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    static PIXELS: [u16; 16] = [0; 16];

    fn frame(row: u16) -> VideoFrame<'static> {
        VideoFrame::new(Area::new(0, row, 3, row), &PIXELS).unwrap()
    }

    #[test]
    fn test_frame_validation() {
        assert_eq!(
            VideoFrame::new(Area::new(4, 0, 3, 0), &PIXELS),
            Err(FrameError::InvalidArea)
        );
        assert_eq!(
            VideoFrame::new(Area::new(0, 0, 4, 3), &PIXELS),
            Err(FrameError::ShortBuffer { needed: 20, got: 16 })
        );
        let frame = VideoFrame::new(Area::new(0, 0, 1, 1), &PIXELS).unwrap();
        assert_eq!(frame.pixels().len(), 4);
    }

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.ack_timeout_ms, 100);
        assert_eq!(config.queue_depth, 4);
    }

    #[test]
    fn test_frames_flushed_in_order() {
        let pipeline: FlushPipeline<'static, NoopRawMutex, 4> = FlushPipeline::new(100);
        let mut sink = RecordingSink::default();
        let mut ready = Vec::new();

        for row in 0..3 {
            pipeline.try_enqueue(frame(row)).unwrap();
        }
        for _ in 0..3 {
            let outcome = block_on(pipeline.process_one(&mut sink, &mut Elapsed, &mut |f| {
                ready.push(f.area().ys)
            }));
            assert_eq!(outcome, FlushOutcome::Ready);
        }

        let rows: Vec<_> = sink.areas.iter().map(|a| a.ys).collect();
        assert_eq!(rows, [0, 1, 2]);
        assert_eq!(ready, [0, 1, 2]);
        assert_eq!(pipeline.stats(), FlushStats { flushed: 3, dropped: 0 });
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_failed_sync_times_out_and_drops() {
        let pipeline: FlushPipeline<'static, NoopRawMutex, 2> = FlushPipeline::new(100);
        let mut sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut notified = 0;

        pipeline.try_enqueue(frame(0)).unwrap();
        let outcome = block_on(pipeline.process_one(&mut sink, &mut Elapsed, &mut |_| {
            notified += 1
        }));

        assert_eq!(outcome, FlushOutcome::Dropped);
        assert_eq!(notified, 0);
        assert_eq!(pipeline.stats(), FlushStats { flushed: 0, dropped: 1 });

        // The worker keeps going with the next frame
        sink.fail = false;
        pipeline.try_enqueue(frame(1)).unwrap();
        let outcome = block_on(pipeline.process_one(&mut sink, &mut Elapsed, &mut |_| {
            notified += 1
        }));
        assert_eq!(outcome, FlushOutcome::Ready);
        assert_eq!(notified, 1);
    }

    #[test]
    fn test_full_queue_applies_backpressure() {
        let pipeline: FlushPipeline<'static, NoopRawMutex, 2> = FlushPipeline::new(100);
        let mut sink = RecordingSink::default();
        assert_eq!(pipeline.capacity(), 2);

        pipeline.try_enqueue(frame(0)).unwrap();
        pipeline.try_enqueue(frame(1)).unwrap();
        assert_eq!(pipeline.try_enqueue(frame(2)), Err(frame(2)));

        let mut cx = Context::from_waker(Waker::noop());
        let mut blocked = pin!(pipeline.enqueue(frame(2)));
        assert!(blocked.as_mut().poll(&mut cx).is_pending());

        block_on(pipeline.process_one(&mut sink, &mut Elapsed, &mut |_| {}));
        assert!(blocked.as_mut().poll(&mut cx).is_ready());
        assert_eq!(pipeline.len(), 2);
    }

    static SHARED: FlushPipeline<'static, CriticalSectionRawMutex, 2> = FlushPipeline::new(100);

    #[test]
    fn test_static_pipeline() {
        SHARED.try_enqueue(frame(7)).unwrap();
        assert_eq!(SHARED.len(), 1);
        assert_eq!(SHARED.ack_timeout_ms(), 100);

        let mut sink = RecordingSink::default();
        let outcome = block_on(SHARED.process_one(&mut sink, &mut Elapsed, &mut |_| {}));
        assert_eq!(outcome, FlushOutcome::Ready);
        assert_eq!(sink.areas, [Area::new(0, 7, 3, 7)]);
    }

    #[test]
    fn test_flush_now_leaves_handshake_clean() {
        let pipeline: FlushPipeline<'static, NoopRawMutex, 2> = FlushPipeline::new(100);
        let mut good = RecordingSink::default();
        let mut bad = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let mut acked = 0;
        block_on(pipeline.flush_now(&mut good, &frame(5), |_| acked += 1)).unwrap();
        assert_eq!(good.areas.len(), 1);
        assert_eq!(acked, 1);
        assert!(!pipeline.completion.signaled());

        // Nothing left behind by flush_now may acknowledge a failed frame
        pipeline.try_enqueue(frame(0)).unwrap();
        let outcome = block_on(pipeline.process_one(&mut bad, &mut Elapsed, &mut |_| {}));
        assert_eq!(outcome, FlushOutcome::Dropped);

        assert!(block_on(pipeline.flush_now(&mut bad, &frame(5), |_| acked += 1)).is_err());
        assert_eq!(acked, 1);
    }
}
