//! End-to-end tests over literal quote texts: parse, price, decode, validate.
//!
//! Uses a MockDirectory with a fixed airport table so validation results do
//! not depend on the bundled directory.

use chrono::NaiveDate;
use pnrquote_core::error::QuoteError;
use pnrquote_core::itinerary::{decode_segments, validate_quote, AirportDirectory, AirportLookup};
use pnrquote_core::model::FareCategory;
use pnrquote_core::policy::builtin::load_preset;
use pnrquote_core::pricing::RavSource;
use pnrquote_core::trace::RuleKind;
use pnrquote_core::{parse_email_to_options, parse_pnr, quote_document, trace_document, validate_document};
use rust_decimal_macros::dec;

struct MockDirectory {
    airports: Vec<&'static str>,
}

impl AirportDirectory for MockDirectory {
    fn resolve_airport(&self, code: &str) -> AirportLookup {
        let found = self.airports.iter().any(|a| *a == code);
        AirportLookup {
            iata_code: code.to_string(),
            description: format!("Airport {code}"),
            found,
            error: (!found).then(|| format!("{code} unknown to mock")),
        }
    }

    fn airline_name(&self, code: &str) -> Option<String> {
        Some(format!("Airline {code}"))
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

fn mock_directory() -> MockDirectory {
    MockDirectory {
        airports: vec!["GRU", "DXB", "HKG", "PVG", "AMS", "CDG", "DOH", "FCO", "LIN", "VCE", "MXP"],
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const THREE_OPTIONS: &str = "EK  262   08JAN GRUDXB   0130   2235
EK  382   09JAN DXBHKG   0330   1445
EK  303   23JAN PVGDXB   2300  #0510
EK  261   27JAN DXBGRU   0905   1735

Executiva

Tarifa USD 6500,00 + taxas USD 2539,30

Bagagem 2 peça de 32kgs

Net/Net

pagto 9x

Multa de alteração USD 200,00

Reembolso usd 400.00

==

KL  792   08JAN GRUAMS HS1  2059  #1220
KL  887   11JAN AMSHKG HS1  2125  #1620
AF  111   27JAN PVGCDG HS1  2215  #0600
AF  460   28JAN CDGGRU HS1  1030   1825

Executiva

Tarifa USD 7729,00 + taxas USD 266,30 + Fee USD 50,00

Bagagem 2 peça de 32kgs

Net/Net

pagto 4x

Multa de alteração USD 200,00

Reembolso usd 400.00

Assentos pagos

==

QR  780   08JAN GRUDOH HS2  2025  #1555
QR  816   11JAN DOHHKG HS2  0855   2140
QR  871   27JAN PVGDOH HS2  2335  #0510
QR  773   28JAN DOHGRU HS2  0745   1655

Executiva

Tarifa USD 5875,00 + taxas USD 1320,30

Bagagem 2 peça de 32kgs

in 3%

pagto 5x

Multa de alteração USD 200,00

Reembolso usd 400.00

Assentos pagos na ida";

const TWO_OPTIONS_COMMISSION: &str = "
AZ  679   25NOV GRUFCO HS2  2040  #1200
AZ 2038   26NOV FCOLIN HS2  1400   1510
AZ 1462   06DEC VCEFCO HS2  1515   1625
AZ  674   06DEC FCOGRU HS2  2220  #0625

tarifa usd 2529.00 + txs usd 66.00

pagto 6x - net net

2pc 32kg
Assentos pagos
Fee usd 50.00

==

LA 8072   25NOV GRUMXP HK2  1800  #0915
AZ 1460   06DEC VCEFCO HK2  0615   0725
LA 8121   06DEC FCOGRU HK2  1200   2010

tarifa usd 2996.00 + txs usd 272.00

pagto 4x - comissão 7%

2pc 23kg
Assentos pagos na AZ
Fee usd 50.00
";

// ---------------------------------------------------------------------------
// Three-option e-mail
// ---------------------------------------------------------------------------
#[test]
fn three_option_email_parses_each_block() {
    let email = parse_email_to_options(THREE_OPTIONS);
    assert_eq!(email.options.len(), 3);

    let o1 = &email.options[0];
    assert_eq!(o1.label, "Opção 1");
    assert_eq!(o1.segments.len(), 4);
    assert!(o1.segments.iter().all(|s| s.status.is_none()));
    assert_eq!(o1.fares.len(), 1);
    assert_eq!(o1.fares[0].tarifa, dec!(6500));
    assert_eq!(o1.fares[0].taxas, dec!(2539.30));
    assert_eq!(o1.fares[0].category, FareCategory::Exe);
    assert_eq!(o1.num_parcelas, Some(9));
    assert_eq!(o1.change_penalty.as_deref(), Some("USD 200.00"));
    assert_eq!(o1.refundable.as_deref(), Some("USD 400.00"));
    assert_eq!(o1.baggage_hint.as_deref(), Some("2 peça de 32kgs"));
    assert!(o1.net_fare);
    assert_eq!(o1.notes, None);

    let o2 = &email.options[1];
    assert_eq!(o2.label, "Opção 2");
    assert_eq!(o2.fares[0].tarifa, dec!(7729));
    assert_eq!(o2.fares[0].taxas, dec!(266.30));
    assert_eq!(o2.fee_usd, Some(dec!(50)));
    assert_eq!(o2.num_parcelas, Some(4));
    assert_eq!(o2.notes.as_deref(), Some("Assentos pagos"));

    let o3 = &email.options[2];
    assert_eq!(o3.label, "Opção 3");
    assert_eq!(o3.fares[0].tarifa, dec!(5875));
    assert_eq!(o3.fares[0].taxas, dec!(1320.30));
    assert_eq!(o3.incentivo_percent, Some(dec!(3)));
    assert_eq!(o3.num_parcelas, Some(5));
    assert!(o3.warnings.is_empty());
}

#[test]
fn three_option_email_prices_with_default_policy() {
    let policy = load_preset("padrao").unwrap();
    let quote = quote_document(THREE_OPTIONS, &policy, None).unwrap();
    assert!(quote.is_multi);
    assert_eq!(quote.options.len(), 3);

    let o1 = &quote.options[0].aggregate;
    assert_eq!(o1.rav, dec!(650));
    assert_eq!(o1.total, dec!(9689.30));

    let o2 = &quote.options[1].aggregate;
    assert_eq!(o2.comissao, dec!(822.90));
    assert_eq!(o2.total, dec!(8818.20));

    let o3 = &quote.options[2].aggregate;
    assert_eq!(o3.incentivo, dec!(176.25));
    assert_eq!(o3.comissao, dec!(763.75));
    assert_eq!(o3.total, dec!(7959.05));

    // Declared penalty wins over the policy text
    assert_eq!(o1.change_penalty.as_deref(), Some("USD 200.00"));
}

// ---------------------------------------------------------------------------
// Commission declared on the payment line
// ---------------------------------------------------------------------------
#[test]
fn merged_view_keeps_per_option_quotations() {
    let pnr = parse_pnr(TWO_OPTIONS_COMMISSION).unwrap();
    assert!(pnr.is_multi);
    assert_eq!(pnr.quotations.len(), 2);
    assert_eq!(pnr.segments.len(), 7);
    assert_eq!(pnr.fares.len(), 2);
    assert_eq!(pnr.num_parcelas, Some(6));
    assert_eq!(pnr.baggage_hint.as_deref(), Some("2pc 32kg"));

    let o1 = &pnr.quotations[0];
    assert_eq!(o1.fares[0].tarifa, dec!(2529.00));
    assert_eq!(o1.fee_usd, Some(dec!(50)));
    assert_eq!(o1.rav_percent, None);
    assert!(o1.net_fare);

    let o2 = &pnr.quotations[1];
    assert_eq!(o2.fares[0].tarifa, dec!(2996.00));
    assert_eq!(o2.fee_usd, Some(dec!(50)));
    assert_eq!(o2.rav_percent, Some(dec!(7)));
    assert_eq!(
        o2.payment_terms.as_deref(),
        Some("Em até 4x no cartão de crédito. Taxas à vista.")
    );
}

#[test]
fn declared_commission_overrides_policy() {
    let policy = load_preset("padrao").unwrap();
    let quote = quote_document(TWO_OPTIONS_COMMISSION, &policy, None).unwrap();

    assert_eq!(quote.options[0].rav_source, RavSource::Policy);
    assert_eq!(quote.options[0].aggregate.comissao, dec!(302.90));
    assert_eq!(quote.options[0].aggregate.total, dec!(2897.90));

    assert_eq!(quote.options[1].rav_source, RavSource::Quote);
    assert_eq!(quote.options[1].aggregate.comissao, dec!(259.72));
    assert_eq!(quote.options[1].aggregate.total, dec!(3527.72));

    let overridden = quote_document(TWO_OPTIONS_COMMISSION, &policy, Some(dec!(0))).unwrap();
    assert!(overridden.options.iter().all(|o| o.rav_source == RavSource::Override));
    assert_eq!(overridden.options[1].aggregate.total, dec!(3318.00));
}

// ---------------------------------------------------------------------------
// Header lines, idempotence, empty input
// ---------------------------------------------------------------------------
#[test]
fn header_lines_do_not_change_the_result() {
    let with_header = "LOC123 ABC XYZ 01JAN
SOBRENOME/NOME
EK  262   08JAN GRUDXB   0130   2235
USD6500.00 + txs USD2539.30 * Exe
==
LOC456 DEF UVW 02JAN
SOBRENOME2/NOME2
KL  792   08JAN GRUAMS   2059   1220
USD4500.00 + txs USD2000.00 * Eco";
    let without_header = "EK  262   08JAN GRUDXB   0130   2235
USD6500.00 + txs USD2539.30 * Exe
==
KL  792   08JAN GRUAMS   2059   1220
USD4500.00 + txs USD2000.00 * Eco";

    assert_eq!(parse_pnr(with_header), parse_pnr(without_header));

    let trace = trace_document(with_header);
    assert!(trace.blocks.iter().all(|b| b.hits(RuleKind::HeaderLine) == 2));
    assert!(trace.blocks.iter().all(|b| b.hits(RuleKind::Note) == 0));
}

#[test]
fn parsing_is_idempotent() {
    assert_eq!(parse_pnr(THREE_OPTIONS), parse_pnr(THREE_OPTIONS));
    assert_eq!(parse_email_to_options(TWO_OPTIONS_COMMISSION), parse_email_to_options(TWO_OPTIONS_COMMISSION));
    assert_eq!(trace_document(THREE_OPTIONS), trace_document(THREE_OPTIONS));
}

#[test]
fn empty_document_is_rejected_by_the_pipelines() {
    let policy = load_preset("padrao").unwrap();
    assert!(parse_pnr(" \n ").is_none());
    assert!(quote_document("", &policy, None).is_err());
    assert!(validate_document("\n", date(2025, 10, 1), &mock_directory()).is_err());
}

// ---------------------------------------------------------------------------
// Itinerary validation
// ---------------------------------------------------------------------------
#[test]
fn three_option_itineraries_validate() {
    let results = validate_document(THREE_OPTIONS, date(2025, 12, 1), &mock_directory()).unwrap();
    assert_eq!(results.len(), 3);
    for option in &results {
        assert!(option.result.is_valid, "{}: {:?}", option.label, option.result.errors);
    }
}

#[test]
fn overnight_valid_and_same_day_reversal_invalid() {
    let pnr = parse_pnr(
        "AZ  674   06DEC FCOGRU HS2  2200  #0600
AZ  675   07DEC GRUFCO HS2  1800   1000",
    )
    .unwrap();
    let flights = decode_segments(&pnr.segments, date(2025, 11, 1), &mock_directory());
    assert_eq!(flights.len(), 2);

    assert!(validate_quote(&flights[..1]).is_valid);

    let result = validate_quote(&flights);
    assert!(!result.is_valid);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("Flight 2:"));
    assert!(result.errors[0].contains("landing time"));
}

#[test]
fn unknown_airport_is_a_validation_error() {
    let results = validate_document(
        "AZ  679   25NOV GRUJFK HS2  2040  #1200",
        date(2025, 10, 1),
        &mock_directory(),
    )
    .unwrap();
    assert!(!results[0].result.is_valid);
    assert!(results[0].result.errors[0].contains("JFK"));
}

#[test]
fn oversized_fare_is_a_pricing_error() {
    let policy = load_preset("padrao").unwrap();
    let text = "USD70000000000000000000000000000 + txs USD1 * Exe";

    let options = parse_email_to_options(text).options;
    assert_eq!(options[0].fares.len(), 1);

    let err = quote_document(text, &policy, None).unwrap_err();
    assert!(matches!(err, QuoteError::InvalidPricing(_)), "{err}");
}

#[test]
fn reversed_arrival_date_fails_validation() {
    let text = "AA 950 12FEB GRUJFK SS2 2235 0615 11FEB";
    let results = validate_document(text, date(2026, 1, 10), &mock_directory()).unwrap();
    assert!(!results[0].result.is_valid);
    assert!(results[0].result.errors[0].contains("before departure date"));
}
