//! Application services

mod form_controller;

pub use form_controller::{adjust_value, FormController};
