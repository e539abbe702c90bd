pub mod accumulator;
pub mod synthetic_image;
