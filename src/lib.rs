pub mod auth;
pub mod cli_args;
pub mod common;
pub mod form;
pub mod history;
pub mod settings;
pub mod store;
pub mod utm;
