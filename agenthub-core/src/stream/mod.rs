mod event;
mod frame;

pub use event::{ChunkData, StreamErrorData, StreamEvent, TaskCompletedData};
pub use frame::FrameDecoder;
