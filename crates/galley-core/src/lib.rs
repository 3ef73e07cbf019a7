//! # galley-core
//!
//! Core types shared across all Galley crates:
//! - Entity structs for the domain tree (projects, analyses, data, jobs, users)
//! - Enums for usage classification, data kinds, job states, and tree tabs
//! - ID prefix constants and formatting helpers

pub mod entities;
pub mod enums;
pub mod ids;
pub mod responses;
