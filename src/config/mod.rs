// src/config/mod.rs
pub mod honeypot;

pub use honeypot::HoneypotConfig;
