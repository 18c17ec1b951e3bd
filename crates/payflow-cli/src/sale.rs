//! # Sale Subcommand
//!
//! Builds a single (one-off) transaction. The defaults describe a card sale
//! in US dollars; `--trxtype` selects authorizations, credits and the other
//! single-shot types.
//!
//! ```bash
//! payflow sale --vendor acme --amount '$25.00' \
//!     --card-number 4111-1111-1111-1111 --expiration 05/28 --cvv 123 --dry-run
//! ```

use anyhow::Result;
use clap::Args;

use payflow_core::{Currency, Tender, TransactionKind, TransactionPayload, TransactionType};

use crate::transaction::{
    dispatch, AnnotationArgs, BillingArgs, CardArgs, GatewayArgs, MerchantArgs,
};

/// Arguments for the `payflow sale` subcommand.
#[derive(Args, Debug)]
pub struct SaleArgs {
    #[command(flatten)]
    pub merchant: MerchantArgs,

    /// Amount; currency symbols and separators are ignored.
    #[arg(long)]
    pub amount: String,

    /// Send the amount without cents (fraction is dropped, not rounded).
    #[arg(long)]
    pub whole_units: bool,

    /// Transaction type, as a code (S, A, C...) or name (sale, auth, credit...).
    #[arg(long = "trxtype", default_value = "S")]
    pub transaction_type: TransactionType,

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

/// Assemble the payload described by `args`.
pub fn build_sale(args: &SaleArgs) -> Result<TransactionPayload> {
    let mut payload = TransactionPayload::new(args.merchant.identity()?, TransactionKind::Single);
    payload
        .set_transaction_type(args.transaction_type)
        .set_tender(args.tender)
        .set_currency(args.currency)
        .set_amount(&args.amount, args.whole_units);
    args.card.apply(&mut payload);
    args.billing.apply(&mut payload);
    args.annotations.apply(&mut payload);
    Ok(payload)
}

/// Execute the sale subcommand.
///
/// Returns exit code: 0 when approved or on a dry run, 1 otherwise.
pub async fn run_sale(args: &SaleArgs) -> Result<u8> {
    let payload = build_sale(args)?;
    dispatch(&payload, &args.gateway).await
}
