pub mod cafe;
pub mod default;
pub mod employee;
