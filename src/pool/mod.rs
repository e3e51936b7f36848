//! Object pooling shared by every transient entity kind

pub mod object_pool;
pub mod request_queue;

pub use object_pool::{InstanceTransform, ObjectPool, PoolHandle, Pooled};
pub use request_queue::RequestQueue;
