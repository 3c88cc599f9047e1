pub mod assessment;
pub mod attainment;
pub mod mapping;
pub mod marks;
pub mod obe_config;
