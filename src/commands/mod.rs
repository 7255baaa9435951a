mod routes;
mod run;

pub use routes::run_routes;
pub use run::run_suite;
