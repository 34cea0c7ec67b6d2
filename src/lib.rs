pub mod acquire;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod process;
pub mod recognizer;
