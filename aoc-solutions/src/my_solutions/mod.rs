pub mod year_2021;
pub mod year_2025;
