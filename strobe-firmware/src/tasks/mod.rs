//! Embassy async tasks
//!
//! Each task runs independently and communicates via the pipeline and
//! signals in `channels`.

pub mod flush;
pub mod pattern;
pub mod touch;

pub use flush::flush_task;
pub use pattern::pattern_task;
pub use touch::touch_task;
