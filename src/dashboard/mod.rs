// src/dashboard/mod.rs
//! Reactive handlers of the dashboard. Each one is a plain function of the
//! session store and the control values, so they run without a display.

pub mod plots;
pub mod styling;
pub mod table;
pub mod upload;
