pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod logging;
pub mod model;
pub mod pager;
pub mod render;
pub mod scroll;
pub mod source;
pub mod surface;

#[cfg(test)]
mod tests;
