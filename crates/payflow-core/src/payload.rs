//! # Transaction Payload
//!
//! [`TransactionPayload`] is a typed builder over an ordered NVP map. Each
//! setter takes caller-friendly input, sanitizes it according to the
//! field's rule, and stores the result under the protocol key. Setters never
//! fail; bad input degrades to an empty or zero value.
//!
//! ## Merchant defaults
//!
//! Construction seeds `VENDOR`, `PARTNER`, `USER`, `PWD`, `CUSTIP` and
//! `VERBOSITY` from the [`MerchantIdentity`]. The client IP is part of the
//! identity and must be supplied by the caller.
//!
//! ## Kind gating
//!
//! Any field may be *set* regardless of [`TransactionKind`], but
//! [`TransactionPayload::validate`] rejects a single payment carrying
//! recurring-profile fields. The orchestrator validates before submitting.

use std::fmt;
use std::net::IpAddr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::PayloadError;
use crate::field::{Currency, Field, PayPeriod, ProfileAction, Tender, TransactionType};
use crate::nvp::NvpMap;
use crate::sanitize::{clean_amount, clean_digits_only, clean_text, truncate};

/// Whether the payload describes a one-off payment or a billing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Single,
    Recurring,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Recurring => f.write_str("recurring"),
        }
    }
}

/// Detail level of the gateway's response (`VERBOSITY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Verbosity {
    Low,
    #[default]
    Medium,
    High,
}

impl Verbosity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Merchant credentials and request context seeded into every payload.
///
/// Values are truncated to the gateway's limits on construction. The
/// password is zeroed on drop, and the custom `Debug` implementation
/// redacts it.
#[derive(Clone)]
pub struct MerchantIdentity {
    vendor: String,
    partner: String,
    user: String,
    password: Zeroizing<String>,
    client_ip: IpAddr,
    verbosity: Verbosity,
}

impl MerchantIdentity {
    pub fn new(
        vendor: &str,
        partner: &str,
        user: &str,
        password: &str,
        client_ip: IpAddr,
    ) -> Self {
        Self {
            vendor: truncate(vendor, 64),
            partner: truncate(partner, 64),
            user: truncate(user, 64),
            password: Zeroizing::new(truncate(password, 32)),
            client_ip,
            verbosity: Verbosity::default(),
        }
    }

    /// Override the default `MEDIUM` verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn partner(&self) -> &str {
        &self.partner
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn client_ip(&self) -> IpAddr {
        self.client_ip
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

impl fmt::Debug for MerchantIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantIdentity")
            .field("vendor", &self.vendor)
            .field("partner", &self.partner)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("client_ip", &self.client_ip)
            .field("verbosity", &self.verbosity)
            .finish()
    }
}

/// An ordered set of sanitized protocol fields for one transaction.
pub struct TransactionPayload {
    kind: TransactionKind,
    fields: NvpMap,
}

impl TransactionPayload {
    /// Create a payload seeded with the merchant defaults.
    pub fn new(identity: MerchantIdentity, kind: TransactionKind) -> Self {
        let mut fields = NvpMap::new();
        fields.insert(Field::Vendor.as_str(), identity.vendor.as_str());
        fields.insert(Field::Partner.as_str(), identity.partner.as_str());
        fields.insert(Field::User.as_str(), identity.user.as_str());
        fields.insert(Field::Password.as_str(), identity.password.as_str());
        fields.insert(Field::CustomerIp.as_str(), identity.client_ip.to_string());
        fields.insert(Field::Verbosity.as_str(), identity.verbosity.as_str());
        Self { kind, fields }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    fn put(&mut self, field: Field, value: impl Into<String>) -> &mut Self {
        self.fields.insert(field.as_str(), value);
        self
    }

    fn put_text(&mut self, field: Field, value: &str) -> &mut Self {
        let max_len = field.max_len().unwrap_or(usize::MAX);
        self.put(field, clean_text(value, max_len))
    }

    // -- Transaction -------------------------------------------------------

    pub fn set_transaction_type(&mut self, trx_type: TransactionType) -> &mut Self {
        self.put(Field::TransactionType, trx_type.as_str())
    }

    pub fn set_tender(&mut self, tender: Tender) -> &mut Self {
        self.put(Field::Tender, tender.as_str())
    }

    pub fn set_currency(&mut self, currency: Currency) -> &mut Self {
        self.put(Field::Currency, currency.as_str())
    }

    /// Set `AMT` from free text such as `"$1,500.00"`.
    ///
    /// With `whole_units` the cents are dropped (`1500`).
    pub fn set_amount(&mut self, amount: &str, whole_units: bool) -> &mut Self {
        self.put(Field::Amount, clean_amount(amount, whole_units).to_string())
    }

    pub fn set_comment1(&mut self, comment: &str) -> &mut Self {
        self.put_text(Field::Comment1, comment)
    }

    pub fn set_comment2(&mut self, comment: &str) -> &mut Self {
        self.put_text(Field::Comment2, comment)
    }

    // -- Recurring profile -------------------------------------------------

    pub fn set_profile_action(&mut self, action: ProfileAction) -> &mut Self {
        self.put(Field::ProfileAction, action.as_str())
    }

    /// Profile names are stored upper-cased.
    pub fn set_profile_name(&mut self, name: &str) -> &mut Self {
        let upper = name.to_uppercase();
        self.put_text(Field::ProfileName, &upper)
    }

    /// Rendered as `MMDDYYYY`.
    pub fn set_profile_start_date(&mut self, start: NaiveDate) -> &mut Self {
        self.put(Field::ProfileStart, start.format("%m%d%Y").to_string())
    }

    pub fn set_pay_period(&mut self, period: PayPeriod) -> &mut Self {
        self.put(Field::PayPeriod, period.as_str())
    }

    /// Number of payments; `0` bills until the profile is cancelled.
    pub fn set_term(&mut self, term: u32) -> &mut Self {
        self.put(Field::Term, term.to_string())
    }

    // -- Card ----------------------------------------------------------------

    /// Separators are stripped: `"4111-1111-1111-1111"` → `4111111111111111`.
    pub fn set_card_number(&mut self, number: &str) -> &mut Self {
        self.put(Field::Account, clean_digits_only(number))
    }

    /// `MMYY`, digits only.
    pub fn set_expiration(&mut self, expiration: &str) -> &mut Self {
        let digits = clean_digits_only(expiration);
        self.put(Field::ExpirationDate, truncate(&digits, 4))
    }

    /// Stored verbatim. Unlike the card number, the security code is not
    /// digit-cleaned.
    pub fn set_cvv(&mut self, cvv: &str) -> &mut Self {
        self.put(Field::Cvv2, cvv)
    }

    pub fn set_card_name(&mut self, name: &str) -> &mut Self {
        self.put_text(Field::CardName, name)
    }

    // -- Billing address -----------------------------------------------------

    pub fn set_first_name(&mut self, first_name: &str) -> &mut Self {
        self.put_text(Field::FirstName, first_name)
    }

    pub fn set_last_name(&mut self, last_name: &str) -> &mut Self {
        self.put_text(Field::LastName, last_name)
    }

    pub fn set_street(&mut self, street: &str) -> &mut Self {
        self.put_text(Field::Street, street)
    }

    pub fn set_city(&mut self, city: &str) -> &mut Self {
        self.put_text(Field::City, city)
    }

    /// Two-character state code.
    pub fn set_state(&mut self, state: &str) -> &mut Self {
        self.put_text(Field::State, state)
    }

    pub fn set_zip(&mut self, zip: &str) -> &mut Self {
        self.put_text(Field::Zip, zip)
    }

    pub fn set_country(&mut self, country: &str) -> &mut Self {
        self.put_text(Field::Country, country)
    }

    /// Digits only, at most 20.
    pub fn set_phone(&mut self, phone: &str) -> &mut Self {
        let digits = clean_digits_only(phone);
        self.put(Field::Phone, truncate(&digits, 20))
    }

    pub fn set_email(&mut self, email: &str) -> &mut Self {
        self.put_text(Field::Email, email)
    }

    // -- Extension -----------------------------------------------------------

    /// Set an arbitrary gateway field.
    ///
    /// Neither the name nor the value is sanitized. A value containing `&`
    /// or `=` will corrupt the request framing.
    pub fn set_custom_field(&mut self, name: &str, value: &str) -> &mut Self {
        self.fields.insert(name, value);
        self
    }

    // -- Introspection -------------------------------------------------------

    /// All fields in insertion order.
    pub fn fields(&self) -> &NvpMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    /// The exact request body that would be sent.
    pub fn to_wire(&self) -> String {
        self.fields.encode()
    }

    /// The request body with `PWD`, `CVV2` and all but the last four digits
    /// of `ACCT` masked. Safe for logs.
    pub fn to_redacted_wire(&self) -> String {
        self.redacted_fields().encode()
    }

    /// A copy of the fields with secrets masked.
    pub fn redacted_fields(&self) -> NvpMap {
        self.fields
            .iter()
            .map(|(key, value)| match Field::from_key(key) {
                Some(Field::Password) | Some(Field::Cvv2) => (key, "****".to_string()),
                Some(Field::Account) => (key, mask_account(value)),
                _ => (key, value.to_string()),
            })
            .collect()
    }

    /// Check that every set field applies to this payload's kind.
    pub fn validate(&self) -> Result<(), PayloadError> {
        if self.kind == TransactionKind::Recurring {
            return Ok(());
        }
        match Field::RECURRING_ONLY
            .iter()
            .find(|field| self.fields.contains_key(field.as_str()))
        {
            Some(&field) => Err(PayloadError::NotApplicable {
                field,
                kind: self.kind,
            }),
            None => Ok(()),
        }
    }
}

fn mask_account(account: &str) -> String {
    let visible = account.len().saturating_sub(4);
    account
        .char_indices()
        .map(|(i, c)| if i < visible { '*' } else { c })
        .collect()
}

impl Drop for TransactionPayload {
    fn drop(&mut self) {
        self.fields.zeroize_values();
    }
}

impl fmt::Debug for TransactionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionPayload")
            .field("kind", &self.kind)
            .field("fields", &self.redacted_fields())
            .finish()
    }
}
