use crate::error::QuoteError;
use crate::model::QuoteOption;
use crate::policy::schema::PricingPolicy;
use crate::pricing::outcome::{FarePricing, OptionPricing, PricingParams, PricingResult, RavSource};
use rust_decimal::Decimal;
use tracing::debug;

/// Compute commission-adjusted totals for one fare.
///
/// ```text
/// rav            = tarifa * rav% / 100
/// incentivo      = tarifa * incentivo% / 100
/// comissao       = rav + fee + incentivo
/// taxas_exibidas = taxas_base + comissao
/// total          = tarifa + taxas_exibidas
/// ```
///
/// No rounding is applied; the change penalty is carried through untouched.
/// Panics if an amount overflows `Decimal`; [`checked_totals`] does not.
pub fn compute_totals(params: &PricingParams) -> PricingResult {
    let rav = params.tarifa * params.rav_percent / Decimal::ONE_HUNDRED;
    let incentivo = params.tarifa * params.incentivo_percent / Decimal::ONE_HUNDRED;
    let comissao = rav + params.fee + incentivo;
    let taxas_exibidas = params.taxas_base + comissao;
    let total = params.tarifa + taxas_exibidas;

    PricingResult {
        rav,
        incentivo,
        comissao,
        taxas_exibidas,
        total,
        change_penalty: params.change_penalty.clone(),
    }
}

/// [`compute_totals`] with overflow checks. Returns None when any step
/// exceeds the `Decimal` range.
pub fn checked_totals(params: &PricingParams) -> Option<PricingResult> {
    let percent_of = |pct: Decimal| {
        params
            .tarifa
            .checked_mul(pct)?
            .checked_div(Decimal::ONE_HUNDRED)
    };
    let rav = percent_of(params.rav_percent)?;
    let incentivo = percent_of(params.incentivo_percent)?;
    let comissao = rav.checked_add(params.fee)?.checked_add(incentivo)?;
    let taxas_exibidas = params.taxas_base.checked_add(comissao)?;
    let total = params.tarifa.checked_add(taxas_exibidas)?;

    Some(PricingResult {
        rav,
        incentivo,
        comissao,
        taxas_exibidas,
        total,
        change_penalty: params.change_penalty.clone(),
    })
}

fn checked_sum(values: impl Iterator<Item = Decimal>) -> Option<Decimal> {
    values.fold(Some(Decimal::ZERO), |acc, v| acc?.checked_add(v))
}

/// Check pricing inputs. Returns one message per violated constraint.
pub fn validate_params(params: &PricingParams) -> Vec<String> {
    let mut errors = Vec::new();

    if params.tarifa < Decimal::ZERO {
        errors.push(format!("tarifa must be zero or greater (got {})", params.tarifa));
    }
    if params.taxas_base < Decimal::ZERO {
        errors.push(format!("taxas_base must be zero or greater (got {})", params.taxas_base));
    }
    if params.rav_percent < Decimal::ZERO || params.rav_percent > Decimal::ONE_HUNDRED {
        errors.push(format!("RAV must be between 0% and 100% (got {}%)", params.rav_percent));
    }
    if params.fee < Decimal::ZERO {
        errors.push(format!("fee must be zero or greater (got {})", params.fee));
    }
    if params.incentivo_percent < Decimal::ZERO {
        errors.push(format!(
            "incentivo must be zero or greater (got {}%)",
            params.incentivo_percent
        ));
    }

    errors
}

/// Price every fare of an option and their sum.
///
/// RAV precedence: `rav_override`, then the commission declared in the quote,
/// then the policy default. Fee and change penalty fall back to the policy
/// when the quote has none. The fee is charged on each fare and once on the
/// aggregate.
pub fn price_option(
    option: &QuoteOption,
    policy: &PricingPolicy,
    rav_override: Option<Decimal>,
) -> Result<OptionPricing, QuoteError> {
    let (rav_percent, rav_source) = match (rav_override, option.rav_percent) {
        (Some(rav), _) => (rav, RavSource::Override),
        (None, Some(rav)) => (rav, RavSource::Quote),
        (None, None) => (policy.rav_percent, RavSource::Policy),
    };
    let fee = option.fee_usd.unwrap_or(policy.default_fee);
    let incentivo_percent = option.incentivo_percent.unwrap_or_default();
    let change_penalty = option
        .change_penalty
        .clone()
        .or_else(|| policy.default_change_penalty.clone());

    let base = PricingParams {
        tarifa: Decimal::ZERO,
        taxas_base: Decimal::ZERO,
        rav_percent,
        fee,
        incentivo_percent,
        change_penalty,
    };

    let mut errors = Vec::new();
    if rav_percent > policy.max_rav_percent {
        errors.push(format!(
            "RAV {}% exceeds the policy maximum of {}%",
            rav_percent, policy.max_rav_percent
        ));
    }

    let overflow = |what: &str| format!("{what} is too large to price");

    let mut fares = Vec::with_capacity(option.fares.len());
    for fare in &option.fares {
        let params = PricingParams {
            tarifa: fare.tarifa,
            taxas_base: fare.taxas,
            ..base.clone()
        };
        for e in validate_params(&params) {
            if !errors.contains(&e) {
                errors.push(e);
            }
        }
        match checked_totals(&params) {
            Some(result) => fares.push(FarePricing {
                category: fare.category.clone(),
                pax_type: fare.pax_type,
                params,
                result,
            }),
            None => errors.push(overflow(&format!("fare {} {}", fare.category, fare.tarifa))),
        }
    }

    let (Some(tarifa), Some(taxas_base)) = (
        checked_sum(option.fares.iter().map(|f| f.tarifa)),
        checked_sum(option.fares.iter().map(|f| f.taxas)),
    ) else {
        errors.push(overflow("option total"));
        return Err(QuoteError::InvalidPricing(errors));
    };

    let aggregate_params = PricingParams {
        tarifa,
        taxas_base,
        ..base
    };
    for e in validate_params(&aggregate_params) {
        if !errors.contains(&e) {
            errors.push(e);
        }
    }

    let Some(aggregate) = checked_totals(&aggregate_params) else {
        errors.push(overflow("option total"));
        return Err(QuoteError::InvalidPricing(errors));
    };
    if !errors.is_empty() {
        return Err(QuoteError::InvalidPricing(errors));
    }

    debug!(
        option = %option.label,
        rav = %rav_percent,
        ?rav_source,
        total = %aggregate.total,
        "option priced"
    );

    Ok(OptionPricing {
        label: option.label.clone(),
        currency: option.currency.clone(),
        rav_percent,
        rav_source,
        fee,
        incentivo_percent,
        policy_name: policy.name.clone(),
        fares,
        aggregate,
        num_parcelas: option.num_parcelas,
        payment_terms: option.payment_terms.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FareCategory, FareLine, PaxType};
    use crate::policy::builtin::load_preset;
    use rust_decimal_macros::dec;

    fn params(tarifa: Decimal, taxas: Decimal, rav: Decimal, fee: Decimal, inc: Decimal) -> PricingParams {
        PricingParams {
            tarifa,
            taxas_base: taxas,
            rav_percent: rav,
            fee,
            incentivo_percent: inc,
            change_penalty: None,
        }
    }

    fn fare(tarifa: Decimal, taxas: Decimal) -> FareLine {
        FareLine {
            category: FareCategory::Exe,
            pax_type: PaxType::Adt,
            tarifa,
            taxas,
            notes: None,
        }
    }

    #[test]
    fn test_single_fare_scenario() {
        let r = compute_totals(&params(dec!(6500), dec!(2539.30), dec!(10), dec!(0), dec!(0)));
        assert_eq!(r.rav, dec!(650));
        assert_eq!(r.comissao, dec!(650));
        assert_eq!(r.taxas_exibidas, dec!(3189.30));
        assert_eq!(r.total, dec!(9689.30));
    }

    #[test]
    fn test_rav_fee_incentive_scenario() {
        let r = compute_totals(&params(dec!(10000), dec!(500), dec!(10), dec!(100), dec!(5)));
        assert_eq!(r.rav, dec!(1000));
        assert_eq!(r.incentivo, dec!(500));
        assert_eq!(r.comissao, dec!(1600));
        assert_eq!(r.taxas_exibidas, dec!(2100));
        assert_eq!(r.total, dec!(12100));
    }

    #[test]
    fn test_zero_input() {
        let r = compute_totals(&PricingParams::default());
        assert_eq!(r, PricingResult::default());
        assert!(r.total.is_zero());
    }

    #[test]
    fn test_additivity() {
        let cases = [
            (dec!(7729), dec!(266.30), dec!(10), dec!(50), dec!(0)),
            (dec!(5875), dec!(1320.30), dec!(10), dec!(0), dec!(3)),
            (dec!(0.01), dec!(0), dec!(33.33), dec!(0.5), dec!(1.25)),
        ];
        for (t, x, rav, fee, inc) in cases {
            let r = compute_totals(&params(t, x, rav, fee, inc));
            assert_eq!(r.total, t + x + r.rav + fee + r.incentivo);
        }
    }

    #[test]
    fn test_change_penalty_carried_through() {
        let mut p = params(dec!(100), dec!(10), dec!(10), dec!(0), dec!(0));
        p.change_penalty = Some("USD 200.00".into());
        let r = compute_totals(&p);
        assert_eq!(r.change_penalty.as_deref(), Some("USD 200.00"));
        assert_eq!(r.total, dec!(120));
    }

    #[test]
    fn test_validate_params() {
        assert!(validate_params(&PricingParams::default()).is_empty());
        let errors = validate_params(&params(dec!(-1), dec!(0), dec!(101), dec!(-5), dec!(0)));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_price_option_uses_policy_default() {
        let policy = load_preset("padrao").unwrap();
        let mut option = QuoteOption::empty("Opção 1".into());
        option.fares.push(fare(dec!(6500), dec!(2539.30)));

        let priced = price_option(&option, &policy, None).unwrap();
        assert_eq!(priced.rav_source, RavSource::Policy);
        assert_eq!(priced.rav_percent, dec!(10));
        assert_eq!(priced.aggregate.total, dec!(9689.30));
        assert_eq!(
            priced.aggregate.change_penalty.as_deref(),
            Some("USD 500 + diferença tarifária")
        );
    }

    #[test]
    fn test_price_option_precedence() {
        let policy = load_preset("padrao").unwrap();
        let mut option = QuoteOption::empty("Opção 2".into());
        option.fares.push(fare(dec!(2996), dec!(272)));
        option.rav_percent = Some(dec!(7));

        let quoted = price_option(&option, &policy, None).unwrap();
        assert_eq!(quoted.rav_source, RavSource::Quote);
        assert_eq!(quoted.aggregate.rav, dec!(209.72));

        let overridden = price_option(&option, &policy, Some(dec!(0))).unwrap();
        assert_eq!(overridden.rav_source, RavSource::Override);
        assert_eq!(overridden.aggregate.total, dec!(3268));
    }

    #[test]
    fn test_price_option_fee_once_in_aggregate() {
        let policy = load_preset("net").unwrap();
        let mut option = QuoteOption::empty("Opção 1".into());
        option.fares.push(fare(dec!(1000), dec!(100)));
        option.fares.push(fare(dec!(800), dec!(100)));
        option.fee_usd = Some(dec!(50));

        let priced = price_option(&option, &policy, None).unwrap();
        assert_eq!(priced.fares.len(), 2);
        assert_eq!(priced.fares[0].result.total, dec!(1150));
        assert_eq!(priced.fares[1].result.total, dec!(950));
        assert_eq!(priced.aggregate.total, dec!(2050));
    }

    #[test]
    fn test_price_option_rejects_rav_over_policy_cap() {
        let mut policy = load_preset("padrao").unwrap();
        policy.max_rav_percent = dec!(12);
        let mut option = QuoteOption::empty("Opção 1".into());
        option.fares.push(fare(dec!(100), dec!(10)));

        let err = price_option(&option, &policy, Some(dec!(15))).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidPricing(ref e) if e.len() == 1));
    }

    #[test]
    fn test_checked_totals_matches_and_detects_overflow() {
        let p = params(dec!(10000), dec!(500), dec!(10), dec!(100), dec!(5));
        assert_eq!(checked_totals(&p), Some(compute_totals(&p)));

        let huge = params(Decimal::MAX, dec!(1), dec!(10), dec!(0), dec!(0));
        assert_eq!(checked_totals(&huge), None);
    }

    #[test]
    fn test_price_option_oversized_fare_is_an_error() {
        let policy = load_preset("padrao").unwrap();
        let mut option = QuoteOption::empty("Opção 1".into());
        option.fares.push(fare(Decimal::MAX / dec!(2), dec!(1)));

        let err = price_option(&option, &policy, None).unwrap_err();
        match err {
            QuoteError::InvalidPricing(errors) => {
                assert!(errors.iter().any(|e| e.contains("too large to price")));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_price_option_overflowing_sum_is_an_error() {
        let policy = load_preset("net").unwrap();
        let mut option = QuoteOption::empty("Opção 1".into());
        option.fares.push(fare(Decimal::MAX, dec!(0)));
        option.fares.push(fare(Decimal::MAX, dec!(0)));

        assert!(matches!(
            price_option(&option, &policy, None),
            Err(QuoteError::InvalidPricing(_))
        ));
    }
}
