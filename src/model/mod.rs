pub mod catalog;
pub mod event;
pub mod filter;
pub mod grid;
