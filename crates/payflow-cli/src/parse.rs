//! # Parse Subcommand
//!
//! Decodes a saved raw gateway response (from a file or stdin) and prints
//! the fields and success flag as JSON. Accepts captures that still carry
//! the HTTP status line and headers.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use payflow_core::{GatewayResponse, NvpMap};

/// Arguments for the `payflow parse` subcommand.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// File holding the raw response. Reads stdin when omitted or `-`.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

#[derive(Serialize)]
struct ParseReport<'a> {
    succeeded: bool,
    result: Option<i32>,
    message: Option<&'a str>,
    pnref: Option<&'a str>,
    fields: &'a NvpMap,
}

/// Execute the parse subcommand.
///
/// Returns exit code: 0 if the response reports success, 1 otherwise.
pub fn run_parse(args: &ParseArgs) -> Result<u8> {
    let raw = read_input(args.path.as_deref())?;
    let response = GatewayResponse::parse(&raw);
    println!("{}", render_report(&response)?);
    Ok(if response.succeeded() { 0 } else { 1 })
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read(path)
            .with_context(|| format!("failed to read response from {}", path.display())),
        _ => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read response from stdin")?;
            Ok(buf)
        }
    }
}

fn render_report(response: &GatewayResponse) -> Result<String> {
    let report = ParseReport {
        succeeded: response.succeeded(),
        result: response.result_code(),
        message: response.message(),
        pnref: response.pnref(),
        fields: response.fields(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_for_approved_capture() {
        let response =
            GatewayResponse::parse(b"HTTP/1.1 200 OK\r\n\r\nRESULT=0&RESPMSG=Approved&PNREF=ABC123");
        let json: serde_json::Value = serde_json::from_str(&render_report(&response).unwrap()).unwrap();
        assert_eq!(json["succeeded"], true);
        assert_eq!(json["result"], 0);
        assert_eq!(json["pnref"], "ABC123");
        assert_eq!(json["fields"]["RESPMSG"], "Approved");
    }

    #[test]
    fn report_for_missing_result() {
        let response = GatewayResponse::parse(b"");
        let json: serde_json::Value = serde_json::from_str(&render_report(&response).unwrap()).unwrap();
        assert_eq!(json["succeeded"], false);
        assert!(json["result"].is_null());
        assert_eq!(json["fields"], serde_json::json!({}));
    }

    #[test]
    fn run_parse_reads_file_and_sets_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let approved = dir.path().join("approved.txt");
        let declined = dir.path().join("declined.txt");
        std::fs::write(&approved, b"RESULT=0&PNREF=A1").unwrap();
        std::fs::write(&declined, b"RESULT=12&RESPMSG=Declined").unwrap();

        let code = run_parse(&ParseArgs { path: Some(approved) }).unwrap();
        assert_eq!(code, 0);
        let code = run_parse(&ParseArgs { path: Some(declined) }).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_parse(&ParseArgs {
            path: Some(dir.path().join("absent.txt")),
        });
        assert!(result.is_err());
    }
}
