pub mod buffer;
pub mod counter;
pub mod prober;
pub mod traits;

pub use buffer::WorkBuffer;
pub use counter::DefaultCounter;
pub use prober::LatencyProber;
