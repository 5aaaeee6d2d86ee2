pub mod config;
pub mod controller;
pub mod debounce;
pub mod fields;
pub mod form;
pub mod http_client;
pub mod panel;
pub mod predict_fetch;
pub mod provider;
pub mod state;
pub mod validation;
