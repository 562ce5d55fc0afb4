pub mod errors;
pub mod http;
pub mod models;
pub mod schema;
pub mod storage;
