/// Sale / license verification for a single webhook ping
///
/// Pre-flight checks run first and never touch the network. An event that
/// passes them causes exactly one API call:
/// - licensed product: `POST /licenses/verify`
/// - anything else: `GET /sales/{sale_id}`
use reqwest::Url;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::result::VerificationResult;
use super::secret::secret_matches;
use super::transport::{error_detail, HttpTransport, Transport, TransportError};
use crate::config::{Config, ConfigError};
use crate::event::Event;

pub const INVALID_SECRET: &str = "Invalid webhook secret.";
pub const MISSING_IDENTIFIERS: &str = "Missing both sale_id and product_permalink.";
pub const MISSING_LICENSE_KEY: &str = "Missing license_key for licensed product.";
pub const MISSING_SALE_ID: &str = "Missing sale_id for non-licensed product.";
pub const REFUNDED_OR_CHARGEBACKED: &str = "Sale refunded or chargebacked.";

/// Failure to build a [`Verifier`]
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create HTTP client: {0}")]
    Transport(#[from] TransportError),
}

/// The API call an event resolved to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a> {
    License {
        product_permalink: Cow<'a, str>,
        license_key: Cow<'a, str>,
    },
    Sale {
        sale_id: Cow<'a, str>,
    },
}

impl Lookup<'_> {
    fn error_prefix(&self) -> &'static str {
        match self {
            Lookup::License { .. } => "License API error: ",
            Lookup::Sale { .. } => "Sales API error: ",
        }
    }

    /// Response field holding the purchase record
    fn record_key(&self) -> &'static str {
        match self {
            Lookup::License { .. } => "purchase",
            Lookup::Sale { .. } => "sale",
        }
    }

    fn default_failure(&self) -> &'static str {
        match self {
            Lookup::License { .. } => "License verification failed",
            Lookup::Sale { .. } => "Sale verification failed",
        }
    }

    fn api_error(&self, detail: &str) -> VerificationResult {
        warn!("{}{}", self.error_prefix(), detail);
        VerificationResult::rejected(format!("{}{}", self.error_prefix(), detail))
    }
}

/// Decide which API call an event needs, or why it is rejected outright.
///
/// A licensed permalink always takes the license path, even when a
/// `sale_id` is also present.
pub fn route<'a>(event: &'a Event, config: &Config) -> Result<Lookup<'a>, &'static str> {
    if let Some(expected) = config.effective_webhook_secret() {
        if !secret_matches(expected, event.secret()) {
            return Err(INVALID_SECRET);
        }
    }

    let sale_id = event.sale_id();
    let product_permalink = event.product_permalink();

    if sale_id.is_none() && product_permalink.is_none() {
        return Err(MISSING_IDENTIFIERS);
    }

    if let Some(permalink) = product_permalink.filter(|p| config.is_licensed(p)) {
        let license_key = event.license_key().ok_or(MISSING_LICENSE_KEY)?;
        return Ok(Lookup::License {
            product_permalink: permalink,
            license_key,
        });
    }

    let sale_id = sale_id.ok_or(MISSING_SALE_ID)?;
    Ok(Lookup::Sale { sale_id })
}

/// `{base}/sales/{sale_id}` with the id encoded as one path segment
pub fn sale_url(api_base: &str, sale_id: &str) -> Result<Url, TransportError> {
    let mut url = Url::parse(api_base).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| TransportError::InvalidUrl(api_base.to_string()))?
        .pop_if_empty()
        .push("sales")
        .push(sale_id);
    Ok(url)
}

/// Verifier bound to one configuration and transport
pub struct Verifier<T = HttpTransport> {
    config: Config,
    transport: T,
}

impl Verifier<HttpTransport> {
    /// Verifier backed by a blocking reqwest client using `config.timeout_secs`.
    ///
    /// # Errors
    /// Fails if the config does not validate or the client cannot be built.
    pub fn new(config: Config) -> Result<Self, VerifierError> {
        config.validate()?;
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> Verifier<T> {
    /// Verifier over a caller-supplied transport. The config is used as given.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Verify one event. Never fails; every problem becomes `Rejected`.
    pub fn verify(&self, event: &Event) -> VerificationResult {
        match route(event, &self.config) {
            Ok(lookup) => self.dispatch(lookup),
            Err(reason) => {
                debug!("Event rejected before API call: {}", reason);
                VerificationResult::rejected(reason)
            }
        }
    }

    /// Perform the API call for an already-routed event
    pub fn dispatch(&self, lookup: Lookup<'_>) -> VerificationResult {
        let response = match &lookup {
            Lookup::License {
                product_permalink,
                license_key,
            } => {
                debug!("Verifying license for product {}", product_permalink);
                let url = format!("{}/licenses/verify", self.config.api_base());
                self.transport.post_form(
                    &url,
                    &[
                        ("product_permalink", product_permalink.as_ref()),
                        ("license_key", license_key.as_ref()),
                    ],
                )
            }
            Lookup::Sale { sale_id } => {
                debug!("Looking up sale {}", sale_id);
                sale_url(self.config.api_base(), sale_id).and_then(|url| {
                    self.transport.get_json(
                        url.as_str(),
                        &[("access_token", self.config.access_token.as_str())],
                    )
                })
            }
        };

        match response {
            Ok(body) => evaluate(body, &lookup),
            Err(e) => lookup.api_error(&error_detail(&e)),
        }
    }
}

/// Turn a decoded API body into the final outcome
fn evaluate(mut body: Value, lookup: &Lookup<'_>) -> VerificationResult {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(lookup.default_failure());
        info!("API reported failure: {}", message);
        return VerificationResult::rejected(message);
    }

    let record = match body.get_mut(lookup.record_key()).map(Value::take) {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(record @ Value::Object(_)) => record,
        Some(_) => {
            return lookup.api_error(&format!("malformed {} record", lookup.record_key()));
        }
    };

    if flag(&record, "refunded") || flag(&record, "chargebacked") {
        info!("Sale is refunded or chargebacked");
        return VerificationResult::rejected(REFUNDED_OR_CHARGEBACKED);
    }

    info!("Event verified via {}", lookup.record_key());
    VerificationResult::Verified(record)
}

/// Refund-style flag: only an absent, `null` or `false` value clears it
fn flag(record: &Value, key: &str) -> bool {
    !matches!(record.get(key), None | Some(Value::Null) | Some(Value::Bool(false)))
}

/// Verify one event with a fresh HTTP client.
///
/// # Arguments
/// * `event` - Parsed webhook ping
/// * `access_token` - Gumroad API token, used for sale lookups
/// * `webhook_secret` - Expected `secret` field, if configured
/// * `licensed_products` - Permalinks that require a license key check
pub fn verify_event(
    event: &Event,
    access_token: &str,
    webhook_secret: Option<&str>,
    licensed_products: Option<&HashSet<String>>,
) -> VerificationResult {
    let mut config = Config::new(access_token);
    config.webhook_secret = webhook_secret.map(str::to_string);
    if let Some(products) = licensed_products {
        config.licensed_products = products.clone();
    }

    let lookup = match route(event, &config) {
        Ok(lookup) => lookup,
        Err(reason) => return VerificationResult::rejected(reason),
    };

    match Verifier::new(config) {
        Ok(verifier) => verifier.dispatch(lookup),
        Err(e) => lookup.api_error(&error_detail(&e)),
    }
}
