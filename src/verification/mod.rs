/// Verification module - Webhook secret check, routing and Gumroad API lookups
pub mod result;
pub mod secret;
pub mod transport;
pub mod verifier;

pub use result::VerificationResult;
pub use secret::secret_matches;
pub use transport::{HttpTransport, Transport, TransportError};
pub use verifier::{route, verify_event, Lookup, Verifier, VerifierError};
