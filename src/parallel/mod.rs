pub mod batch;
pub mod pool;

pub use batch::replay_histories;
pub use pool::WorkerPool;
