//! Analysis behavior tests

mod expressions;
mod initializers;
mod programs;
