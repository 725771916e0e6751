//! Gumroad sale and license verification.
//!
//! Confirms that a webhook ping refers to a real, non-refunded sale before a
//! caller grants access to a product:
//! 1. Optional shared-secret check on the ping
//! 2. License key verification for licensed products
//! 3. Sale lookup for everything else
//!
//! ```no_run
//! use gumroad_verify::{Config, Event, Verifier};
//!
//! let config = Config::new("access-token")
//!     .with_webhook_secret("hook-secret")
//!     .with_licensed_products(["pro-pack"]);
//! let verifier = Verifier::new(config)?;
//!
//! let event = Event::from_json(r#"{"sale_id": "abc", "secret": "hook-secret"}"#)?;
//! let (ok, detail) = verifier.verify(&event).into_parts();
//! println!("{ok}: {detail}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod event;
pub mod verification;

pub use config::{load_config, Config, ConfigError};
pub use event::Event;
pub use verification::{
    verify_event, Transport, TransportError, VerificationResult, Verifier, VerifierError,
};
