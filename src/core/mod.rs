pub mod commands;
pub mod dispatcher;
pub mod errors;
pub mod history;
pub mod model;
pub mod services;
