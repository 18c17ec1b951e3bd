//! # Recurring Subcommand
//!
//! Builds a recurring billing profile request (`TRXTYPE=R`). By default it
//! adds a monthly profile that starts tomorrow and bills until cancelled.
//!
//! ```bash
//! payflow recurring --vendor acme --profile-name 'Gold Plan' --amount 19.99 \
//!     --card-number 4111111111111111 --expiration 0528 --pay-period WEEK --term 12
//! ```

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use payflow_core::{
    default_profile_start, Clock, Currency, PayPeriod, ProfileAction, SystemClock, Tender,
    TransactionKind, TransactionPayload, TransactionType,
};

use crate::transaction::{
    dispatch, AnnotationArgs, BillingArgs, CardArgs, GatewayArgs, MerchantArgs,
};

/// Arguments for the `payflow recurring` subcommand.
#[derive(Args, Debug)]
pub struct RecurringArgs {
    #[command(flatten)]
    pub merchant: MerchantArgs,

    /// Profile name; stored upper-cased.
    #[arg(long)]
    pub profile_name: String,

    /// Amount billed each period.
    #[arg(long)]
    pub amount: String,

    #[arg(long)]
    pub whole_units: bool,

    /// Profile action, as a code (A, M, R, C, I, P) or name (add, cancel...).
    #[arg(long, default_value = "A")]
    pub action: ProfileAction,

    /// First billing date (YYYY-MM-DD). Defaults to tomorrow.
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Billing frequency (WEEK, BIWK, SMMO, FRWK, MONT, QTER, SMYR, YEAR).
    #[arg(long, default_value = "MONT")]
    pub pay_period: PayPeriod,

    /// Number of payments. 0 bills until the profile is cancelled.
    #[arg(long, default_value_t = 0)]
    pub term: u32,

    #[arg(long, default_value = "C")]
    pub tender: Tender,

    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    #[command(flatten)]
    pub card: CardArgs,

    #[command(flatten)]
    pub billing: BillingArgs,

    #[command(flatten)]
    pub annotations: AnnotationArgs,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}

/// Assemble the profile request described by `args`.
///
/// `clock` supplies "tomorrow" when `--start` is omitted.
pub fn build_recurring(args: &RecurringArgs, clock: &impl Clock) -> Result<TransactionPayload> {
    let start = args.start.unwrap_or_else(|| default_profile_start(clock));

    let mut payload =
        TransactionPayload::new(args.merchant.identity()?, TransactionKind::Recurring);
    payload
        .set_transaction_type(TransactionType::Recurring)
        .set_tender(args.tender)
        .set_currency(args.currency)
        .set_profile_action(args.action)
        .set_profile_name(&args.profile_name)
        .set_profile_start_date(start)
        .set_pay_period(args.pay_period)
        .set_term(args.term)
        .set_amount(&args.amount, args.whole_units);
    args.card.apply(&mut payload);
    args.billing.apply(&mut payload);
    args.annotations.apply(&mut payload);
    Ok(payload)
}

/// Execute the recurring subcommand.
///
/// Returns exit code: 0 when approved or on a dry run, 1 otherwise.
pub async fn run_recurring(args: &RecurringArgs) -> Result<u8> {
    let payload = build_recurring(args, &SystemClock)?;
    dispatch(&payload, &args.gateway).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use clap::Parser;
    use payflow_core::FixedClock;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: RecurringArgs,
    }

    fn parse(args: &[&str]) -> RecurringArgs {
        TestCli::try_parse_from(std::iter::once("payflow").chain(args.iter().copied()))
            .unwrap()
            .args
    }

    fn clock() -> FixedClock {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        FixedClock::new(offset.with_ymd_and_hms(2026, 12, 31, 22, 0, 0).unwrap())
    }

    #[test]
    fn defaults_add_monthly_profile_starting_tomorrow() {
        let args = parse(&[
            "--vendor", "acme", "--password", "pw",
            "--profile-name", "Gold Plan", "--amount", "$19.99",
        ]);
        let payload = build_recurring(&args, &clock()).unwrap();
        assert_eq!(payload.get("TRXTYPE"), Some("R"));
        assert_eq!(payload.get("ACTION"), Some("A"));
        assert_eq!(payload.get("PROFILENAME"), Some("GOLD PLAN"));
        assert_eq!(payload.get("START"), Some("01012027"));
        assert_eq!(payload.get("PAYPERIOD"), Some("MONT"));
        assert_eq!(payload.get("TERM"), Some("0"));
        assert_eq!(payload.get("AMT"), Some("19.99"));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn explicit_schedule_overrides_defaults() {
        let args = parse(&[
            "--vendor", "acme", "--password", "pw",
            "--profile-name", "weekly box", "--amount", "5",
            "--start", "2027-02-14", "--pay-period", "weekly", "--term", "12",
            "--action", "modify",
        ]);
        let payload = build_recurring(&args, &clock()).unwrap();
        assert_eq!(payload.get("START"), Some("02142027"));
        assert_eq!(payload.get("PAYPERIOD"), Some("WEEK"));
        assert_eq!(payload.get("TERM"), Some("12"));
        assert_eq!(payload.get("ACTION"), Some("M"));
    }

    #[test]
    fn profile_name_is_required() {
        let result = TestCli::try_parse_from(["payflow", "--vendor", "a", "--amount", "1"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dry_run_exits_zero_without_network() {
        let args = parse(&[
            "--vendor", "acme", "--password", "pw",
            "--profile-name", "p", "--amount", "1", "--dry-run",
        ]);
        assert_eq!(run_recurring(&args).await.unwrap(), 0);
    }
}
