//! Data Transfer Objects for signal (de)serialization.

pub mod todo_dto;

pub use todo_dto::*;
