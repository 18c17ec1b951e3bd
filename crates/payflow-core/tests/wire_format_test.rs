//! # Wire Format Vectors
//!
//! Pins the exact bytes the client puts on the wire and the request
//! identities it derives. A failure here means requests built by this crate
//! no longer match what the gateway (and earlier releases) expect.

use std::net::{IpAddr, Ipv4Addr};

use chrono::{TimeZone, Utc};
use payflow_core::{
    Currency, GatewayResponse, MerchantIdentity, PayPeriod, ProfileAction, RequestId, Tender,
    TransactionKind, TransactionPayload, TransactionType, Verbosity,
};

fn identity() -> MerchantIdentity {
    MerchantIdentity::new(
        "acme",
        "PayPal",
        "acme",
        "pw",
        IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)),
    )
}

#[test]
fn single_sale_wire_body() {
    let mut payload = TransactionPayload::new(identity(), TransactionKind::Single);
    payload
        .set_transaction_type(TransactionType::Sale)
        .set_tender(Tender::Card)
        .set_currency(Currency::Usd)
        .set_amount("$1,500.00", false)
        .set_card_number("4111-1111-1111-1111")
        .set_expiration("05/28")
        .set_cvv("123")
        .set_first_name("Jane")
        .set_last_name("Doe")
        .set_email("jane@example.com");

    assert_eq!(
        payload.to_wire(),
        "VENDOR=acme&PARTNER=PayPal&USER=acme&PWD=pw&CUSTIP=192.0.2.10&VERBOSITY=MEDIUM\
         &TRXTYPE=S&TENDER=C&CURRENCY=USD&AMT=1500.00&ACCT=4111111111111111&EXPDATE=0528\
         &CVV2=123&FIRSTNAME=Jane&LASTNAME=Doe&EMAIL=jane@example.com"
    );
    assert_eq!(
        payload.to_redacted_wire(),
        "VENDOR=acme&PARTNER=PayPal&USER=acme&PWD=****&CUSTIP=192.0.2.10&VERBOSITY=MEDIUM\
         &TRXTYPE=S&TENDER=C&CURRENCY=USD&AMT=1500.00&ACCT=************1111&EXPDATE=0528\
         &CVV2=****&FIRSTNAME=Jane&LASTNAME=Doe&EMAIL=jane@example.com"
    );
}

#[test]
fn recurring_profile_wire_body() {
    let mut payload = TransactionPayload::new(
        identity().with_verbosity(Verbosity::High),
        TransactionKind::Recurring,
    );
    payload
        .set_transaction_type(TransactionType::Recurring)
        .set_profile_action(ProfileAction::Add)
        .set_profile_name("Gold & Silver")
        .set_profile_start_date(chrono::NaiveDate::from_ymd_opt(2027, 1, 2).unwrap())
        .set_pay_period(PayPeriod::Monthly)
        .set_term(0)
        .set_amount("19.99", false);

    assert!(payload.validate().is_ok());
    assert_eq!(
        payload.to_wire(),
        "VENDOR=acme&PARTNER=PayPal&USER=acme&PWD=pw&CUSTIP=192.0.2.10&VERBOSITY=HIGH\
         &TRXTYPE=R&ACTION=A&PROFILENAME=GOLD  SILVER&START=01022027&PAYPERIOD=MONT\
         &TERM=0&AMT=19.99"
    );
}

#[test]
fn card_request_id_vector() {
    let mut payload = TransactionPayload::new(identity(), TransactionKind::Single);
    payload
        .set_card_number("4111111111111111")
        .set_amount("10", false);
    let at = Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0).unwrap();

    let id = RequestId::derive(&payload, at, None);
    assert_eq!(id.as_str(), "1686b1e80533eb46ada2b466377c7f12");
}

#[test]
fn cardless_request_id_vector() {
    let payload = TransactionPayload::new(identity(), TransactionKind::Recurring);
    let at = Utc.with_ymd_and_hms(2026, 5, 4, 9, 15, 0).unwrap();

    let id = RequestId::derive(&payload, at, None);
    assert_eq!(id.as_str(), "66c17658570266eb6e4859c9d7d3a3c2");
}

#[test]
fn response_round_trip_through_public_api() {
    let raw = b"HTTP/1.1 200 OK\r\nContent-Type: text/namevalue\r\n\r\n\
                RESULT=0&PNREF=V19A2E1B2C3D&RESPMSG=Approved&AUTHCODE=010101&AVSADDR=Y&AVSZIP=Y";
    let response = GatewayResponse::parse(raw);
    assert!(response.succeeded());
    assert_eq!(
        response.iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["RESULT", "PNREF", "RESPMSG", "AUTHCODE", "AVSADDR", "AVSZIP"]
    );
}
