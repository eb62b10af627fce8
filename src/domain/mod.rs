pub mod daylight;
pub mod scenario;
pub mod weather;
