pub mod backends;
pub mod id_generator;
pub mod snapshot;
pub mod storage;
