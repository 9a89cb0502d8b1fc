pub mod action;
pub mod contract;
pub mod monster;
pub mod sample;
