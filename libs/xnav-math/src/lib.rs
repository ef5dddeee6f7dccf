#![no_std]

pub mod full_math;
pub mod nav_math;

pub use full_math::*;
pub use nav_math::*;
