pub mod db;
pub mod feed;
pub mod filters;
pub mod queries;
pub mod routes;
pub mod types;
pub mod utils;
