#![allow(dead_code)]

pub mod faulty_store;
