/// JSON projection command.
pub mod json;
/// Text printer for rendered trees.
pub mod print;
/// Tree rendering command.
pub mod tree;
/// Shared input/output helpers.
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
