pub mod capture_gate;
pub mod currency;
pub mod route_picker;
pub mod route_sampling;
