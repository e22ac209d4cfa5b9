//! Bang data: the built-in table, validation of user-supplied bangs, and the
//! share-code codec used to pass a single bang between users.

#[path = "bangs/builtin.rs"]
pub(crate) mod builtin;
#[path = "bangs/share_code.rs"]
pub(crate) mod share_code;
#[path = "bangs/validate.rs"]
pub(crate) mod validate;

#[cfg(test)]
#[path = "bangs/tests.rs"]
mod tests;
