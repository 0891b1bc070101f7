//! Public library API for ordering, compacting, and validating block-graph scene documents.

/// Block graph model, sanitize passes, link checks, and snapshot files.
pub mod doc;
