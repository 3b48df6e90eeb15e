pub mod auth;
pub mod core;
pub mod flow;
pub mod http;
pub mod store;
pub mod util;
