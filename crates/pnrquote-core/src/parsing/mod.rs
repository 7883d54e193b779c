pub mod blocks;
pub mod fare;
pub mod normalize;
pub mod segment;
pub mod terms;
pub mod values;

use crate::model::{
    FareCategory, FareLine, ParsedEmail, QuoteOption, SinglePnr, DEFAULT_CURRENCY,
};
use crate::trace::{BlockTrace, ParseWarning, RuleKind, TraceBundle, TraceStep, TRACE_SCHEMA_VERSION};
use blocks::{header_end, is_multi, split_blocks};
use fare::{match_fare_label, match_fare_line, match_taxes_label};
use normalize::{cabin_hint, normalize_category};
use rust_decimal::Decimal;
use segment::try_parse_segment;
use tracing::{debug, warn};

/// Parse a reservation dump into the merged single-PNR view.
///
/// Returns None only for empty or whitespace-only input. Multi-option
/// documents (`==` delimited) keep their per-block options in `quotations`.
pub fn parse_pnr(text: &str) -> Option<SinglePnr> {
    if text.trim().is_empty() {
        return None;
    }

    let options = parse_blocks(text).into_iter().map(|(o, _)| o).collect();
    Some(SinglePnr::merge(options, is_multi(text)))
}

/// Parse a quote e-mail into one option per `==` block, labelled `Opção N`.
pub fn parse_email_to_options(text: &str) -> ParsedEmail {
    ParsedEmail {
        options: parse_blocks(text).into_iter().map(|(o, _)| o).collect(),
    }
}

/// Per-line rule hits and warnings for every block of the document.
pub fn trace_document(text: &str) -> TraceBundle {
    TraceBundle {
        trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
        is_multi: is_multi(text),
        blocks: parse_blocks(text).into_iter().map(|(_, t)| t).collect(),
    }
}

fn parse_blocks(text: &str) -> Vec<(QuoteOption, BlockTrace)> {
    split_blocks(text)
        .iter()
        .enumerate()
        .map(|(index, lines)| parse_block(lines, index))
        .collect()
}

/// Fare from the two-line `FARE:` / `TAXES:` form, waiting for its taxes.
struct PendingFare {
    class_token: Option<String>,
    tarifa: Decimal,
    line_index: usize,
    text: String,
}

struct BlockParser<'a> {
    option: QuoteOption,
    trace: BlockTrace,
    cabin: Option<FareCategory>,
    pending: Option<PendingFare>,
    payment_line: Option<&'a str>,
    baggage: Vec<String>,
    notes: Vec<&'a str>,
}

impl<'a> BlockParser<'a> {
    fn hit(&mut self, line_index: usize, rule: RuleKind, text: &str) {
        debug!(block = %self.option.label, line = line_index, ?rule, "rule matched");
        self.trace.steps.push(TraceStep {
            line_index,
            rule,
            text: text.to_string(),
        });
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!(block = %self.option.label, line = warning.line_index, "{}", warning.message);
        self.option.warnings.push(warning.clone());
        self.trace.warnings.push(warning);
    }

    fn category(&mut self, token: Option<&str>, line_index: usize, text: &str) -> FareCategory {
        match token {
            Some(token) => {
                let category = normalize_category(token);
                if !category.is_known() {
                    self.warn(ParseWarning::unknown_category(line_index, text, token));
                }
                category
            }
            None => self
                .cabin
                .clone()
                .unwrap_or_else(|| FareCategory::Other("Tarifa".to_string())),
        }
    }

    fn flush_pending(&mut self, taxas: Decimal) {
        if let Some(p) = self.pending.take() {
            let category = self.category(p.class_token.as_deref(), p.line_index, &p.text);
            self.option.fares.push(FareLine {
                category,
                pax_type: Default::default(),
                tarifa: p.tarifa,
                taxas,
                notes: None,
            });
        }
    }

    /// Structural rules: at most one of these claims a line.
    fn structural(&mut self, i: usize, line: &'a str) -> bool {
        if let Some(f) = match_fare_line(line) {
            if let Some(ref tail) = f.trailing {
                debug!(line = i, currency = %f.currency, tail = %tail, "fare line without class suffix");
            }
            self.flush_pending(Decimal::ZERO);
            let category = self.category(f.class_token.as_deref(), i, line);
            self.option.fares.push(FareLine {
                category,
                pax_type: f.pax_type,
                tarifa: f.tarifa,
                taxas: f.taxas,
                notes: f.notes,
            });
            self.hit(i, RuleKind::Fare, line);
            return true;
        }

        if let Some((class_token, tarifa)) = match_fare_label(line) {
            self.flush_pending(Decimal::ZERO);
            self.pending = Some(PendingFare {
                class_token,
                tarifa,
                line_index: i,
                text: line.to_string(),
            });
            self.hit(i, RuleKind::Fare, line);
            return true;
        }

        if self.pending.is_some() {
            if let Some(taxas) = match_taxes_label(line) {
                self.flush_pending(taxas);
                self.hit(i, RuleKind::Fare, line);
                return true;
            }
        }

        if cabin_hint(line).is_some() {
            self.hit(i, RuleKind::CabinHint, line);
            return true;
        }

        if let Some(penalty) = terms::match_change_penalty(line, &self.option.currency) {
            self.option.change_penalty.get_or_insert(penalty);
            self.hit(i, RuleKind::ChangePenalty, line);
            return true;
        }

        if let Some(refund) = terms::match_refund(line, &self.option.currency) {
            self.option.refundable.get_or_insert(refund);
            self.hit(i, RuleKind::Refund, line);
            return true;
        }

        false
    }

    /// Scalar rules: any number of these may fire on the same line.
    fn scalars(&mut self, i: usize, line: &'a str) -> bool {
        let mut claimed = false;

        if let Some(n) = terms::find_installments(line) {
            self.option.num_parcelas.get_or_insert(n);
            self.hit(i, RuleKind::Installments, line);
            claimed = true;
        }

        if let Some((percent, whole_line)) = terms::find_incentive(line) {
            self.option.incentivo_percent.get_or_insert(percent);
            if !whole_line {
                self.warn(ParseWarning::incentive_in_prose(i, line));
            }
            self.hit(i, RuleKind::Incentive, line);
            claimed = true;
        }

        if let Some(fee) = terms::find_fee(line) {
            self.option.fee_usd.get_or_insert(fee);
            self.hit(i, RuleKind::Fee, line);
            claimed = true;
        }

        if let Some(percent) = terms::find_commission(line) {
            self.option.rav_percent.get_or_insert(percent);
            self.hit(i, RuleKind::Commission, line);
            claimed = true;
        }

        if let Some(hint) = terms::find_baggage(line) {
            self.baggage.push(hint);
            self.hit(i, RuleKind::Baggage, line);
            claimed = true;
        }

        if terms::is_payment_line(line) {
            self.payment_line.get_or_insert(line);
            self.hit(i, RuleKind::Payment, line);
            claimed = true;
        }

        if terms::has_net_marker(line) {
            self.option.net_fare = true;
            self.hit(i, RuleKind::NetFare, line);
            claimed = true;
        }

        claimed
    }

    fn finish(mut self) -> (QuoteOption, BlockTrace) {
        self.flush_pending(Decimal::ZERO);

        let num_parcelas = self.option.num_parcelas;
        self.option.payment_terms = self
            .payment_line
            .map(|l| terms::sanitize_payment_terms(l, num_parcelas));
        if !self.baggage.is_empty() {
            self.option.baggage_hint = Some(self.baggage.join(", "));
        }
        if !self.notes.is_empty() {
            self.option.notes = Some(self.notes.join("; "));
        }

        debug!(
            block = %self.option.label,
            segments = self.option.segments.len(),
            fares = self.option.fares.len(),
            "block parsed"
        );
        (self.option, self.trace)
    }
}

/// Parse one block. Every rule runs independently against each body line;
/// segment lines are not offered to the other rules.
fn parse_block<'a>(lines: &[&'a str], index: usize) -> (QuoteOption, BlockTrace) {
    let label = format!("Opção {}", index + 1);
    let start = header_end(lines);
    let body = &lines[start..];

    let mut option = QuoteOption::empty(label.clone());
    option.currency = terms::find_currency(&body.join("\n"))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let mut parser = BlockParser {
        option,
        trace: BlockTrace {
            label,
            steps: Vec::new(),
            warnings: Vec::new(),
        },
        cabin: body.iter().find_map(|l| cabin_hint(l)),
        pending: None,
        payment_line: None,
        baggage: Vec::new(),
        notes: Vec::new(),
    };

    for (i, raw) in lines[..start].iter().enumerate() {
        if !raw.trim().is_empty() {
            parser.hit(i, RuleKind::HeaderLine, raw.trim());
        }
    }

    for (offset, &raw) in body.iter().enumerate() {
        let i = start + offset;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(segment) = try_parse_segment(line) {
            parser.option.segments.push(segment);
            parser.hit(i, RuleKind::Segment, line);
            continue;
        }

        let structural = parser.structural(i, line);
        let scalar = parser.scalars(i, line);
        if !structural && !scalar {
            parser.notes.push(line);
            parser.hit(i, RuleKind::Note, line);
        }
    }

    parser.finish()
}
