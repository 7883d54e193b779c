use pnrquote_core::itinerary::{DecodedFlight, OptionValidation};
use pnrquote_core::model::{FareLine, FlightSegment, QuoteOption, SinglePnr};
use pnrquote_core::parsing::terms::{default_allowance_for, parse_allowances, BaggageAllowance};
use pnrquote_core::pricing::format::{format_currency, format_percent};
use pnrquote_core::pricing::{OptionPricing, PricingResult, QuotePricing, RavSource};
use pnrquote_core::trace::{TraceBundle, TraceSeverity};
use std::fmt::Write;

pub fn format_options(options: &[QuoteOption]) -> String {
    let mut out = String::new();
    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "=== {} ({}) ===\n", option.label, option.currency);
        write_segments(&mut out, &option.segments);
        write_fares(
            &mut out,
            &option.currency,
            &option.fares,
            option.baggage_hint.as_deref(),
        );
        write_terms(
            &mut out,
            &Terms {
                num_parcelas: option.num_parcelas,
                rav_percent: option.rav_percent.map(format_percent),
                incentivo_percent: option.incentivo_percent.map(format_percent),
                fee: option.fee_usd.map(|f| format_currency(&option.currency, f)),
                change_penalty: option.change_penalty.as_deref(),
                refundable: option.refundable.as_deref(),
                baggage: option.baggage_hint.as_deref(),
                payment: option.payment_terms.as_deref(),
                net_fare: option.net_fare,
                notes: option.notes.as_deref(),
            },
        );
        for w in &option.warnings {
            let _ = writeln!(out, "  warning: {}", w.message);
        }
    }
    out
}

pub fn format_pnr(pnr: &SinglePnr) -> String {
    let mut out = String::new();
    let kind = if pnr.is_multi {
        format!("{} options", pnr.quotations.len())
    } else {
        "single option".to_string()
    };
    let _ = writeln!(out, "=== PNR ({}, {}) ===\n", pnr.currency, kind);
    write_segments(&mut out, &pnr.segments);
    write_fares(&mut out, &pnr.currency, &pnr.fares, pnr.baggage_hint.as_deref());
    write_terms(
        &mut out,
        &Terms {
            num_parcelas: pnr.num_parcelas,
            rav_percent: pnr.rav_percent.map(format_percent),
            incentivo_percent: pnr.incentivo_percent.map(format_percent),
            fee: pnr.fee_usd.map(|f| format_currency(&pnr.currency, f)),
            change_penalty: pnr.change_penalty.as_deref(),
            refundable: pnr.refundable.as_deref(),
            baggage: pnr.baggage_hint.as_deref(),
            payment: pnr.payment_terms.as_deref(),
            net_fare: pnr.net_fare,
            notes: pnr.notes.as_deref(),
        },
    );
    out
}

struct Terms<'a> {
    num_parcelas: Option<u32>,
    rav_percent: Option<String>,
    incentivo_percent: Option<String>,
    fee: Option<String>,
    change_penalty: Option<&'a str>,
    refundable: Option<&'a str>,
    baggage: Option<&'a str>,
    payment: Option<&'a str>,
    net_fare: bool,
    notes: Option<&'a str>,
}

fn write_segments(out: &mut String, segments: &[FlightSegment]) {
    if segments.is_empty() {
        let _ = writeln!(out, "  (no flight segments)\n");
        return;
    }
    let _ = writeln!(out, "  Flights:");
    for s in segments {
        let arrival = match (&s.arrival_date, s.arrival_next_day) {
            (Some(date), _) => format!("{} {}", s.arrival_time, date),
            (None, true) => format!("{} +1", s.arrival_time),
            (None, false) => s.arrival_time.clone(),
        };
        let _ = writeln!(
            out,
            "    {:<3} {:<5} {:<6} {:<8} {} -> {}",
            s.carrier,
            s.flight_number,
            s.date,
            s.route(),
            s.departure_time,
            arrival
        );
    }
    out.push('\n');
}

fn write_fares(out: &mut String, currency: &str, fares: &[FareLine], baggage: Option<&str>) {
    if fares.is_empty() {
        let _ = writeln!(out, "  (no fares)\n");
        return;
    }
    let declared = baggage.map(parse_allowances).unwrap_or_default();
    let _ = writeln!(out, "  Fares:");
    for f in fares {
        let allowance = allowance_for(&declared, f);
        let notes = f
            .notes
            .as_deref()
            .map(|n| format!("  ({n})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "    {:<8} {}  tarifa {:>14}  taxas {:>12}  bag {}x{}kg{}",
            f.category.to_string(),
            f.pax_type,
            format_currency(currency, f.tarifa),
            format_currency(currency, f.taxas),
            allowance.pieces,
            allowance.piece_kg,
            notes
        );
    }
    out.push('\n');
}

/// Declared allowance for the fare's class, else the only class-less one,
/// else the cabin default.
fn allowance_for(declared: &[BaggageAllowance], fare: &FareLine) -> BaggageAllowance {
    let class = fare.category.to_string().to_uppercase();
    declared
        .iter()
        .find(|a| {
            a.fare_class
                .as_deref()
                .is_some_and(|c| class.starts_with(c) || c.starts_with(&class))
        })
        .or_else(|| match declared {
            [single] if single.fare_class.is_none() => Some(single),
            _ => None,
        })
        .cloned()
        .unwrap_or_else(|| default_allowance_for(&fare.category))
}

fn write_terms(out: &mut String, terms: &Terms<'_>) {
    let mut rows: Vec<(&str, String)> = Vec::new();
    if let Some(n) = terms.num_parcelas {
        rows.push(("Parcelas", format!("{n}x")));
    }
    if let Some(ref rav) = terms.rav_percent {
        rows.push(("Comissão", rav.clone()));
    }
    if let Some(ref inc) = terms.incentivo_percent {
        rows.push(("Incentivo", inc.clone()));
    }
    if let Some(ref fee) = terms.fee {
        rows.push(("Fee", fee.clone()));
    }
    if let Some(p) = terms.change_penalty {
        rows.push(("Multa", p.to_string()));
    }
    if let Some(r) = terms.refundable {
        rows.push(("Reembolso", r.to_string()));
    }
    if let Some(b) = terms.baggage {
        rows.push(("Bagagem", b.to_string()));
    }
    if let Some(p) = terms.payment {
        rows.push(("Pagamento", p.to_string()));
    }
    if terms.net_fare {
        rows.push(("Tarifa", "net".to_string()));
    }
    if let Some(n) = terms.notes {
        rows.push(("Obs.", n.to_string()));
    }

    for (label, value) in &rows {
        let _ = writeln!(out, "  {:<10} {}", label, value);
    }
}

pub fn print_quote(quote: &QuotePricing) {
    for (i, option) in quote.options.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_option_pricing(option);
    }
}

fn print_option_pricing(option: &OptionPricing) {
    let source = match option.rav_source {
        RavSource::Override => "override",
        RavSource::Quote => "quote",
        RavSource::Policy => "policy",
    };
    println!("=== {} ({}) ===\n", option.label, option.currency);
    println!(
        "  RAV {} ({}), fee {}, incentivo {}  [policy: {}]\n",
        format_percent(option.rav_percent),
        source,
        format_currency(&option.currency, option.fee),
        format_percent(option.incentivo_percent),
        option.policy_name
    );

    println!(
        "  {:<14} {:>14} {:>14} {:>14} {:>14}",
        "Fare", "Tarifa", "Taxas", "Comissão", "Total"
    );
    println!("  {}", "-".repeat(74));
    for fp in &option.fares {
        let label = format!("{} {}", fp.category, fp.pax_type);
        print_pricing_row(&label, &option.currency, fp.params.tarifa, &fp.result);
    }
    if option.fares.len() > 1 {
        println!("  {}", "-".repeat(74));
        let tarifa = option.fares.iter().map(|f| f.params.tarifa).sum();
        print_pricing_row("Total", &option.currency, tarifa, &option.aggregate);
    }
    println!();

    if let Some(ref penalty) = option.aggregate.change_penalty {
        println!("  Multa:      {}", penalty);
    }
    if let Some(ref terms) = option.payment_terms {
        println!("  Pagamento:  {}", terms);
    }
}

fn print_pricing_row(
    label: &str,
    currency: &str,
    tarifa: rust_decimal::Decimal,
    result: &PricingResult,
) {
    println!(
        "  {:<14} {:>14} {:>14} {:>14} {:>14}",
        label,
        format_currency(currency, tarifa),
        format_currency(currency, result.taxas_exibidas),
        format_currency(currency, result.comissao),
        format_currency(currency, result.total),
    );
}

pub fn print_validation(results: &[OptionValidation]) {
    for (i, option) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        let status = if option.result.is_valid {
            "valid"
        } else {
            "INVALID"
        };
        println!("=== {} === {}", option.label, status);
        for e in &option.result.errors {
            println!("  error:   {}", e);
        }
        for w in &option.result.warnings {
            println!("  warning: {}", w);
        }
    }
}

pub fn print_flights(label: &str, flights: &[DecodedFlight]) {
    println!("\n--- {} flights ---", label);
    for f in flights {
        println!(
            "  {} {:<5} {} {} {} -> {} {} {}{}",
            f.company.iata_code,
            f.flight,
            f.departure_date.format("%d/%m/%Y"),
            f.departure_time.format("%H:%M"),
            f.departure_airport.iata_code,
            f.landing_airport.iata_code,
            f.landing_date.format("%d/%m/%Y"),
            f.landing_time.format("%H:%M"),
            if f.overnight { " (+1)" } else { "" }
        );
        println!(
            "      {}: {} -> {}",
            f.company.description, f.departure_airport.description, f.landing_airport.description
        );
    }
}

pub fn print_trace(bundle: &TraceBundle, text: &str) {
    println!(
        "Trace (schema v{}, {} line(s), {} block(s), {} warning(s))\n",
        bundle.trace_schema_version,
        text.lines().count(),
        bundle.blocks.len(),
        bundle.warnings().count()
    );

    for block in &bundle.blocks {
        println!("=== {} ===", block.label);
        for step in &block.steps {
            println!(
                "  {:>4}  {:<15} {}",
                step.line_index + 1,
                format!("{:?}", step.rule),
                step.text.trim()
            );
        }
        for w in &block.warnings {
            let marker = match w.severity {
                TraceSeverity::Important => "!",
                TraceSeverity::Info => "i",
            };
            println!(
                "  [{}] line {}: {}",
                marker,
                w.line_index + 1,
                w.message
            );
        }
        println!();
    }
}
