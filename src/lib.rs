//! Disease risk screening service: per-disease assessment forms, pre-trained
//! ONNX classifiers and a session-scoped prediction history.

pub mod charts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod history;
pub mod models;
pub mod risk;
pub mod session;
