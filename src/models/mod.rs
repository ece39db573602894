pub mod status;
pub mod views;
