mod snapshot;

pub use snapshot::{AppData, LoadingState};
