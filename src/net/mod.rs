//! Data exchanged with remote peers and client-side outcome ordering

pub mod gate;
pub mod protocol;

pub use gate::{reconcile, OutcomeGate};
pub use protocol::{ClientMsg, MatchScore, ServerMsg};
