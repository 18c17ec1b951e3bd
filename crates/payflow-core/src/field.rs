//! # Protocol Field Model
//!
//! Names every NVP key the client knows how to set, with the maximum length
//! the gateway accepts for free-text fields, plus closed enums for the
//! single-letter and four-letter protocol codes.
//!
//! Codes parse case-insensitively from either their wire form (`"S"`,
//! `"MONT"`) or their descriptive name (`"sale"`, `"monthly"`), so the CLI
//! can accept both.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownCodeError;

/// A protocol field the typed payload setters write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Vendor,
    Partner,
    User,
    Password,
    CustomerIp,
    Verbosity,
    TransactionType,
    Tender,
    Currency,
    ProfileAction,
    ProfileName,
    ProfileStart,
    PayPeriod,
    Term,
    Amount,
    Account,
    ExpirationDate,
    Cvv2,
    CardName,
    FirstName,
    LastName,
    Street,
    City,
    State,
    Zip,
    Country,
    Phone,
    Email,
    Comment1,
    Comment2,
}

impl Field {
    /// Fields that only mean something on a recurring-billing profile.
    pub const RECURRING_ONLY: [Field; 5] = [
        Field::ProfileAction,
        Field::ProfileName,
        Field::ProfileStart,
        Field::PayPeriod,
        Field::Term,
    ];

    /// The wire key for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vendor => "VENDOR",
            Self::Partner => "PARTNER",
            Self::User => "USER",
            Self::Password => "PWD",
            Self::CustomerIp => "CUSTIP",
            Self::Verbosity => "VERBOSITY",
            Self::TransactionType => "TRXTYPE",
            Self::Tender => "TENDER",
            Self::Currency => "CURRENCY",
            Self::ProfileAction => "ACTION",
            Self::ProfileName => "PROFILENAME",
            Self::ProfileStart => "START",
            Self::PayPeriod => "PAYPERIOD",
            Self::Term => "TERM",
            Self::Amount => "AMT",
            Self::Account => "ACCT",
            Self::ExpirationDate => "EXPDATE",
            Self::Cvv2 => "CVV2",
            Self::CardName => "NAME",
            Self::FirstName => "FIRSTNAME",
            Self::LastName => "LASTNAME",
            Self::Street => "STREET",
            Self::City => "CITY",
            Self::State => "STATE",
            Self::Zip => "ZIP",
            Self::Country => "COUNTRY",
            Self::Phone => "PHONENUM",
            Self::Email => "EMAIL",
            Self::Comment1 => "COMMENT1",
            Self::Comment2 => "COMMENT2",
        }
    }

    /// Maximum accepted length, for fields the gateway bounds.
    pub fn max_len(&self) -> Option<usize> {
        match self {
            Self::Vendor | Self::Partner | Self::User => Some(64),
            Self::Password => Some(32),
            Self::ProfileName => Some(128),
            Self::ExpirationDate => Some(4),
            Self::CardName => Some(50),
            Self::FirstName | Self::LastName | Self::Street => Some(30),
            Self::City | Self::Phone => Some(20),
            Self::State => Some(2),
            Self::Zip => Some(9),
            Self::Country => Some(4),
            Self::Email => Some(60),
            Self::Comment1 | Self::Comment2 => Some(128),
            _ => None,
        }
    }

    pub fn is_recurring_only(&self) -> bool {
        Self::RECURRING_ONLY.contains(self)
    }

    /// Look up a field by its wire key (exact match).
    pub fn from_key(key: &str) -> Option<Self> {
        ALL_FIELDS.iter().copied().find(|f| f.as_str() == key)
    }
}

const ALL_FIELDS: [Field; 30] = [
    Field::Vendor,
    Field::Partner,
    Field::User,
    Field::Password,
    Field::CustomerIp,
    Field::Verbosity,
    Field::TransactionType,
    Field::Tender,
    Field::Currency,
    Field::ProfileAction,
    Field::ProfileName,
    Field::ProfileStart,
    Field::PayPeriod,
    Field::Term,
    Field::Amount,
    Field::Account,
    Field::ExpirationDate,
    Field::Cvv2,
    Field::CardName,
    Field::FirstName,
    Field::LastName,
    Field::Street,
    Field::City,
    Field::State,
    Field::Zip,
    Field::Country,
    Field::Phone,
    Field::Email,
    Field::Comment1,
    Field::Comment2,
];

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Protocol code enums -----------------------------------------------------

/// Generates `as_str`, `Display` and `FromStr` for a wire-code enum.
///
/// Each variant lists its wire code followed by descriptive aliases.
macro_rules! wire_code {
    ($ty:ident, $kind:literal, { $($variant:ident => $code:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $ty {
            /// The wire code for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownCodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_uppercase();
                $(
                    if needle == $code $(|| needle == $alias)* {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownCodeError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

/// Transaction type (`TRXTYPE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Sale,
    Recurring,
    Credit,
    Authorization,
    DelayedCapture,
    Void,
    VoiceAuthorization,
    Inquiry,
    DuplicateTransaction,
}

wire_code!(TransactionType, "transaction type", {
    Sale => "S" | "SALE",
    Recurring => "R" | "RECURRING",
    Credit => "C" | "CREDIT",
    Authorization => "A" | "AUTHORIZATION" | "AUTH",
    DelayedCapture => "D" | "DELAYED_CAPTURE" | "CAPTURE",
    Void => "V" | "VOID",
    VoiceAuthorization => "F" | "VOICE_AUTHORIZATION",
    Inquiry => "I" | "INQUIRY",
    DuplicateTransaction => "N" | "DUPLICATE",
});

/// Payment method (`TENDER`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tender {
    /// Automated clearinghouse.
    Ach,
    Card,
    PinlessDebit,
    Telecheck,
    PayPal,
}

wire_code!(Tender, "tender", {
    Ach => "A" | "ACH",
    Card => "C" | "CARD",
    PinlessDebit => "D" | "PINLESS_DEBIT",
    Telecheck => "K" | "TELECHECK",
    PayPal => "P" | "PAYPAL",
});

/// Transaction currency (`CURRENCY`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Jpy,
    Aud,
}

wire_code!(Currency, "currency", {
    Usd => "USD",
    Eur => "EUR",
    Gbp => "GBP",
    Cad => "CAD",
    Jpy => "JPY",
    Aud => "AUD",
});

/// Recurring profile action (`ACTION`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileAction {
    Add,
    Modify,
    Reactivate,
    Cancel,
    Inquiry,
    Payment,
}

wire_code!(ProfileAction, "profile action", {
    Add => "A" | "ADD",
    Modify => "M" | "MODIFY",
    Reactivate => "R" | "REACTIVATE",
    Cancel => "C" | "CANCEL",
    Inquiry => "I" | "INQUIRY",
    Payment => "P" | "PAYMENT",
});

/// Recurring billing frequency (`PAYPERIOD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayPeriod {
    /// Every week on the weekday of the first payment.
    Weekly,
    /// Every other week.
    Biweekly,
    /// The 1st and 15th of the month.
    SemiMonthly,
    /// Every 28 days.
    EveryFourWeeks,
    Monthly,
    Quarterly,
    /// Every six months.
    SemiYearly,
    Yearly,
}

wire_code!(PayPeriod, "pay period", {
    Weekly => "WEEK" | "WEEKLY",
    Biweekly => "BIWK" | "BIWEEKLY",
    SemiMonthly => "SMMO" | "SEMI_MONTHLY",
    EveryFourWeeks => "FRWK" | "EVERY_FOUR_WEEKS",
    Monthly => "MONT" | "MONTHLY",
    Quarterly => "QTER" | "QUARTERLY",
    SemiYearly => "SMYR" | "SEMI_YEARLY",
    Yearly => "YEAR" | "YEARLY",
});
