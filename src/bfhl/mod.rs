//! The `/bfhl` contract: one key in, one envelope out.

pub mod dispatch;
pub mod envelope;
pub mod request;

pub use dispatch::{BfhlOutput, dispatch};
pub use envelope::{Envelope, EnvelopeResponse};
pub use request::BfhlRequest;
