#![allow(dead_code)]

pub mod resolver;
pub mod upstream;

pub use resolver::*;
pub use upstream::*;
