pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::Problem;
pub use routes::register_routes;
