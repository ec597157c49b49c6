//! Diagnostic logging to stderr
//!
//! The calling framework shows stderr to the agent, so log lines stay short:
//! no timestamps, threads, targets or source locations.

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Level used when `verbose` is set
pub const VERBOSE_LEVEL: LevelFilter = LevelFilter::Debug;

/// Level used otherwise
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Install the stderr logger. Safe to call more than once; later calls are
/// ignored.
pub fn init(verbose: bool) {
    let level = if verbose { VERBOSE_LEVEL } else { DEFAULT_LEVEL };

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    // A logger may already be installed (tests); keep the existing one
    let _ = WriteLogger::init(level, config, std::io::stderr());
}
