/// Link validity and required-link diagnostics command.
pub mod check;
/// Document summary command.
pub mod info;
/// Serialization order preview command.
pub mod order;
/// Whole-document sanitize command.
pub mod sanitize;
/// Single block inspection command.
pub mod show;
/// Shared loading and rendering helpers.
pub(crate) mod util;
