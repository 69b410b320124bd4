//! Console logging through `console_log`.

use log::LevelFilter;

/// Install the console logger. Calling it twice only adjusts the level.
pub fn init(level: LevelFilter) {
    if let Some(level) = level.to_level() {
        let _ = console_log::init_with_level(level);
    }
    log::set_max_level(level);
}
