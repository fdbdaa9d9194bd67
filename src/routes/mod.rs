pub mod deletes;
pub mod gets;
pub mod posts;
pub mod puts;
