pub mod config;
pub mod dashboard;
pub mod errors;
pub mod models;
pub mod routes;
pub mod state;
pub mod submissions;
pub mod telemetry;
