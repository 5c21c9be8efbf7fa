use std::thread;
use std::time::Duration;

/// Pause applied after each request to the geocoding service.
pub trait Wait {
    fn wait(&self, duration: Duration);
}

/// Blocks the current thread for the whole duration.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Wait for ThreadSleep {
    fn wait(&self, duration: Duration) {
        if !duration.is_zero() {
            thread::sleep(duration);
        }
    }
}

impl<T: Wait + ?Sized> Wait for &T {
    fn wait(&self, duration: Duration) {
        (**self).wait(duration)
    }
}
