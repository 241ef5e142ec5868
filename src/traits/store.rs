/// Persistent string key/value storage for the last viewport.
///
/// Reads and writes are best-effort: a failed write is logged by the
/// implementation and never surfaced.
pub trait ViewportStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

impl<T: ViewportStore + ?Sized> ViewportStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}
