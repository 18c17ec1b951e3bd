//! # Shared Transaction Arguments
//!
//! Flag groups used by both `payflow sale` and `payflow recurring`, and the
//! dry-run / submit step both subcommands end in.

use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use zeroize::Zeroizing;

use payflow_client::{Environment, GatewayClient, GatewayConfig};
use payflow_core::{MerchantIdentity, RandomNonce, RequestId, TransactionPayload, Verbosity};

const PASSWORD_ENV: &str = "PAYFLOW_PASSWORD";

/// Response detail level requested from the gateway.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum VerbosityArg {
    Low,
    #[default]
    Medium,
    High,
}

impl From<VerbosityArg> for Verbosity {
    fn from(arg: VerbosityArg) -> Self {
        match arg {
            VerbosityArg::Low => Verbosity::Low,
            VerbosityArg::Medium => Verbosity::Medium,
            VerbosityArg::High => Verbosity::High,
        }
    }
}

/// Merchant account credentials.
#[derive(Args, Debug, Clone)]
pub struct MerchantArgs {
    /// Merchant login (VENDOR).
    #[arg(long)]
    pub vendor: String,

    /// Partner ID issued by the reseller.
    #[arg(long, default_value = "PayPal")]
    pub partner: String,

    /// User ID. Defaults to the merchant login.
    #[arg(long)]
    pub user: Option<String>,

    /// Account password. Falls back to the PAYFLOW_PASSWORD environment variable.
    #[arg(long)]
    pub password: Option<String>,

    /// Customer IP address sent as CUSTIP.
    #[arg(long, default_value = "127.0.0.1")]
    pub client_ip: IpAddr,

    #[arg(long, value_enum, default_value_t = VerbosityArg::Medium)]
    pub verbosity: VerbosityArg,
}

impl MerchantArgs {
    pub fn identity(&self) -> Result<MerchantIdentity> {
        let password = match &self.password {
            Some(password) => Zeroizing::new(password.clone()),
            None => Zeroizing::new(
                std::env::var(PASSWORD_ENV)
                    .with_context(|| format!("--password or {PASSWORD_ENV} is required"))?,
            ),
        };
        let user = self.user.as_deref().unwrap_or(&self.vendor);
        Ok(
            MerchantIdentity::new(&self.vendor, &self.partner, user, &password, self.client_ip)
                .with_verbosity(self.verbosity.into()),
        )
    }
}

/// Card details.
#[derive(Args, Debug, Clone, Default)]
pub struct CardArgs {
    /// Card number. Spaces and dashes are stripped.
    #[arg(long)]
    pub card_number: Option<String>,

    /// Expiration date as MMYY (MM/YY is accepted).
    #[arg(long)]
    pub expiration: Option<String>,

    #[arg(long)]
    pub cvv: Option<String>,

    /// Name as printed on the card.
    #[arg(long)]
    pub card_name: Option<String>,
}

impl CardArgs {
    pub fn apply(&self, payload: &mut TransactionPayload) {
        if let Some(v) = &self.card_number {
            payload.set_card_number(v);
        }
        if let Some(v) = &self.expiration {
            payload.set_expiration(v);
        }
        if let Some(v) = &self.cvv {
            payload.set_cvv(v);
        }
        if let Some(v) = &self.card_name {
            payload.set_card_name(v);
        }
    }
}

/// Cardholder billing details.
#[derive(Args, Debug, Clone, Default)]
pub struct BillingArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Two-letter state or province code.
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
}

impl BillingArgs {
    pub fn apply(&self, payload: &mut TransactionPayload) {
        if let Some(v) = &self.first_name {
            payload.set_first_name(v);
        }
        if let Some(v) = &self.last_name {
            payload.set_last_name(v);
        }
        if let Some(v) = &self.street {
            payload.set_street(v);
        }
        if let Some(v) = &self.city {
            payload.set_city(v);
        }
        if let Some(v) = &self.state {
            payload.set_state(v);
        }
        if let Some(v) = &self.zip {
            payload.set_zip(v);
        }
        if let Some(v) = &self.country {
            payload.set_country(v);
        }
        if let Some(v) = &self.phone {
            payload.set_phone(v);
        }
        if let Some(v) = &self.email {
            payload.set_email(v);
        }
    }
}

/// Free-form annotations and raw extension fields.
#[derive(Args, Debug, Clone, Default)]
pub struct AnnotationArgs {
    /// Merchant reference stored with the transaction (COMMENT1).
    #[arg(long)]
    pub comment1: Option<String>,

    #[arg(long)]
    pub comment2: Option<String>,

    /// Extra gateway field, sent without sanitization. Repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,
}

impl AnnotationArgs {
    pub fn apply(&self, payload: &mut TransactionPayload) {
        if let Some(v) = &self.comment1 {
            payload.set_comment1(v);
        }
        if let Some(v) = &self.comment2 {
            payload.set_comment2(v);
        }
        for (key, value) in &self.fields {
            payload.set_custom_field(key, value);
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_ascii_uppercase(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// Gateway selection and submission mode.
#[derive(Args, Debug, Clone, Default)]
pub struct GatewayArgs {
    /// Gateway to target: test or live. Overrides PAYFLOW_ENVIRONMENT.
    #[arg(long)]
    pub environment: Option<Environment>,

    /// Explicit gateway URL. Overrides PAYFLOW_ENDPOINT.
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Skip TLS certificate verification. Refused for the live gateway.
    #[arg(long)]
    pub accept_invalid_certs: bool,

    /// Mix a random nonce into the request ID.
    #[arg(long)]
    pub unique_request_id: bool,

    /// Resend under an earlier X-VPS-Request-ID.
    #[arg(long, conflicts_with = "unique_request_id")]
    pub request_id: Option<RequestId>,

    /// Print the redacted request and exit without sending it.
    #[arg(long)]
    pub dry_run: bool,
}

impl GatewayArgs {
    pub fn config(&self) -> Result<GatewayConfig> {
        let mut config = match self.environment {
            Some(environment) => GatewayConfig::for_environment(environment)?,
            None => GatewayConfig::from_env()?,
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint
                .parse()
                .with_context(|| format!("invalid --endpoint {endpoint:?}"))?;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if self.accept_invalid_certs {
            config.accept_invalid_certs = true;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Dry-run or submit `payload`, printing the result.
///
/// Returns exit code: 0 when approved (or dry-run), 1 otherwise.
pub async fn dispatch(payload: &TransactionPayload, gateway: &GatewayArgs) -> Result<u8> {
    payload.validate()?;

    if gateway.dry_run {
        print!("{}", render_dry_run(payload));
        return Ok(0);
    }

    let config = gateway.config()?;
    tracing::info!(
        environment = %config.environment,
        endpoint = %config.endpoint,
        "submitting transaction"
    );
    let client = GatewayClient::new(config)?;

    let outcome = match &gateway.request_id {
        Some(request_id) => client.resend(payload, request_id.clone()).await?,
        None if gateway.unique_request_id => {
            client
                .with_nonce_source(RandomNonce)
                .execute(payload)
                .await?
        }
        None => client.execute(payload).await?,
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(if outcome.succeeded { 0 } else { 1 })
}

/// Human-readable dump of the redacted request.
pub fn render_dry_run(payload: &TransactionPayload) -> String {
    let mut out = format!(
        "Kind: {}\n\nRequest body (redacted):\n  {}\n\nFields:\n",
        payload.kind(),
        payload.to_redacted_wire()
    );
    for (key, value) in payload.redacted_fields().iter() {
        out.push_str(&format!("  {key:<12} {value}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use payflow_core::TransactionKind;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        merchant: MerchantArgs,
        #[command(flatten)]
        billing: BillingArgs,
        #[command(flatten)]
        annotations: AnnotationArgs,
        #[command(flatten)]
        gateway: GatewayArgs,
    }

    fn parse(args: &[&str]) -> TestCli {
        TestCli::try_parse_from(std::iter::once("test").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn identity_uses_vendor_as_default_user() {
        let cli = parse(&["--vendor", "acme", "--password", "pw"]);
        let identity = cli.merchant.identity().unwrap();
        assert_eq!(identity.user(), "acme");
        assert_eq!(identity.partner(), "PayPal");
        assert_eq!(identity.verbosity(), Verbosity::Medium);
    }

    #[test]
    fn verbosity_and_ip_are_parsed() {
        let cli = parse(&[
            "--vendor", "acme", "--password", "pw", "--client-ip", "198.51.100.4", "--verbosity", "high",
        ]);
        let identity = cli.merchant.identity().unwrap();
        assert_eq!(identity.client_ip().to_string(), "198.51.100.4");
        assert_eq!(identity.verbosity(), Verbosity::High);
    }

    #[test]
    fn billing_and_annotations_are_applied() {
        let cli = parse(&[
            "--vendor", "acme", "--password", "pw",
            "--first-name", "Jane", "--state", "California", "--phone", "(212) 555-0100",
            "--comment1", "order 42", "--field", "invnum=INV-42",
        ]);
        let mut payload = TransactionPayload::new(cli.merchant.identity().unwrap(), TransactionKind::Single);
        cli.billing.apply(&mut payload);
        cli.annotations.apply(&mut payload);
        assert_eq!(payload.get("FIRSTNAME"), Some("Jane"));
        assert_eq!(payload.get("STATE"), Some("Ca"));
        assert_eq!(payload.get("PHONENUM"), Some("2125550100"));
        assert_eq!(payload.get("COMMENT1"), Some("order 42"));
        assert_eq!(payload.get("INVNUM"), Some("INV-42"));
        assert_eq!(payload.get("LASTNAME"), None);
    }

    #[test]
    fn malformed_field_flag_is_rejected() {
        let result = TestCli::try_parse_from(["test", "--vendor", "a", "--field", "novalue"]);
        assert!(result.is_err());
    }

    #[test]
    fn request_id_conflicts_with_unique_flag() {
        let result = TestCli::try_parse_from([
            "test",
            "--vendor",
            "a",
            "--unique-request-id",
            "--request-id",
            "0123456789abcdef0123456789abcdef",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn gateway_flags_override_environment() {
        let cli = parse(&[
            "--vendor", "a",
            "--environment", "test",
            "--endpoint", "http://127.0.0.1:8080",
            "--timeout-secs", "7",
            "--accept-invalid-certs",
        ]);
        let config = cli.gateway.config().unwrap();
        assert_eq!(config.endpoint.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.timeout_secs, 7);
        assert!(config.accept_invalid_certs);
    }

    #[test]
    fn insecure_live_gateway_is_refused() {
        let cli = parse(&["--vendor", "a", "--environment", "live", "--accept-invalid-certs"]);
        assert!(cli.gateway.config().is_err());
    }

    #[test]
    fn dry_run_output_is_redacted() {
        let cli = parse(&["--vendor", "acme", "--password", "topsecret"]);
        let mut payload = TransactionPayload::new(cli.merchant.identity().unwrap(), TransactionKind::Single);
        payload.set_card_number("4111111111111111").set_cvv("999");
        let out = render_dry_run(&payload);
        assert!(out.contains("PWD=****"));
        assert!(out.contains("CVV2=****"));
        assert!(out.contains("************1111"));
        assert!(!out.contains("topsecret"));
        assert!(!out.contains("999"));
    }
}
