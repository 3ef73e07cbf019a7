//! ID prefix constants shared by the store and tests.
//!
//! IDs have the shape `<prefix>-<8 hex chars>`, e.g. `prj-a3f8b2c1`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_ANALYSIS: &str = "anl";
pub const PREFIX_DATA: &str = "dat";
pub const PREFIX_JOB: &str = "job";

/// Every prefix in use, for exhaustive tests.
pub const ALL_PREFIXES: [&str; 5] = [
    PREFIX_USER,
    PREFIX_PROJECT,
    PREFIX_ANALYSIS,
    PREFIX_DATA,
    PREFIX_JOB,
];
