pub mod extract;
pub mod openweather;
pub mod pipeline;
pub mod report;
