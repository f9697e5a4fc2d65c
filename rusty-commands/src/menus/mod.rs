pub mod counter;
pub mod pagetest;
