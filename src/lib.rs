pub mod commands;
pub mod config;
pub mod export;
pub mod model;
pub mod options;
pub mod reminder;
pub mod site;
pub mod store;
pub mod util;
pub mod views;
