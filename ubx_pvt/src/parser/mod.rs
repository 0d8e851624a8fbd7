pub mod checksum;
pub mod sync;

pub use sync::{next_frame, read_frame, FrameSynchronizer, RawFrame};
