pub mod ids;
pub mod validation;
