pub mod handlers;
pub mod notices;
pub mod routes;
pub mod scheduler;
pub mod settings;

pub use routes::create_router;
