//! Core engine types

pub mod entity;
