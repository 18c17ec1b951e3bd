//! # payflow-cli -- Command-line front end for the Payflow NVP client
//!
//! Provides the `payflow` binary.
//!
//! ## Subcommands
//!
//! - `payflow sale`: one-off card transaction (sale, authorization, credit...).
//! - `payflow recurring`: add or change a recurring billing profile.
//! - `payflow parse`: decode a saved raw gateway response.
//!
//! `sale` and `recurring` accept `--dry-run` to print the redacted request
//! without sending it. Without it they submit once and print the outcome as
//! JSON.
//!
//! ```bash
//! export PAYFLOW_PASSWORD=...
//! payflow sale --vendor acme --amount 25 --card-number 4111111111111111 --expiration 0528
//! payflow parse saved-response.txt
//! ```
//!
//! ## Exit Codes
//!
//! 0 when the gateway approved the transaction (or on a dry run, or a parsed
//! response with `RESULT=0`), 1 on decline, transport failure, or any error.

pub mod parse;
pub mod recurring;
pub mod sale;
pub mod transaction;
