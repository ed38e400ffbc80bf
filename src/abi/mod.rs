//! Parameter Encoder
//!
//! Canonical, type-tagged binary encoding of heterogeneous argument
//! lists. The on-chain verifier re-encodes the same arguments with the
//! same rules; any byte of divergence invalidates (or worse, forges) an
//! authorization, so encoding is deterministic and lossless by
//! construction.

pub mod types;
pub mod encoder;

pub use types::*;
pub use encoder::*;
