pub mod config;
pub mod constraints;
pub mod run;
pub mod verify;
