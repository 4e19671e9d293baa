#![allow(non_snake_case)]

pub mod bbsplus;
pub mod bls12381;
pub mod errors;
pub mod keys;
pub mod schemes;
pub mod utils;
