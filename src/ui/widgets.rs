pub mod current;
pub mod forecast;
pub mod sky;
