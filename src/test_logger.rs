//! Log records captured per test thread, so tests can check what was logged
//! while the rest of the suite runs in parallel.

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|records| {
            records
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT: Once = Once::new();

/// Installs the capturing logger and forgets anything this thread logged so far.
pub fn setup() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("Couldn't install test logger");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Records logged on this thread since `setup`.
pub fn records() -> Vec<(Level, String)> {
    RECORDS.with(|records| records.borrow().clone())
}
