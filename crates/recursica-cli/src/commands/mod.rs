pub mod audit;
pub mod export;
pub mod name;
pub mod resolve;
pub mod step;
