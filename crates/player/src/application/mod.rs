pub mod services;

pub use services::{adjust_value, FormController};
