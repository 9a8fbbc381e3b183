use crate::pricing::{LocationMap, ResponseCache};

/// State shared by every change of one run
///
/// Holds the catalog response cache and the locations recorded so far.
/// Create a fresh one per run; nothing in it is invalidated.
#[derive(Debug, Default)]
pub struct RunContext {
    pub cache: ResponseCache,
    pub locations: LocationMap,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}
