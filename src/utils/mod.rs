//! The `utils` module collects the pieces shared across `pollsub`: the error
//! types returned by the broker and the HTTP layer, and logging bootstrap.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests;
