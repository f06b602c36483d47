//! # math
//!
//! Prime-modulus arithmetic over the negacyclic ring `Z_q[X]/(X^N + 1)`.
//!
//! - [`modulus`]: Montgomery and Barrett (Shoup) precomputations for a prime
//!   `q < 2^61`, plus scalar and vector modular operations.
//! - [`dft`]: the negacyclic number-theoretic transform.
//! - [`poly`]: domain-tagged ring elements ([`poly::Coeff`], [`poly::Eval`],
//!   [`poly::EvalMont`]).
//! - [`ring`]: the ring context tying the above together.
//!
//! Elements move between domains only through explicit calls on
//! [`ring::Ring`]; an operation defined on the evaluation domain cannot be
//! handed a coefficient-domain element.

pub mod dft;
pub mod error;
pub mod modulus;
pub mod poly;
pub mod ring;

pub use error::RingError;
