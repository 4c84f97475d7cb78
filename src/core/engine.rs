use super::fund::FundModel;
use super::types::{
    ComparisonData, InvestorRates, OzProjection, Scenario, WealthOutcome, Year1CashFlow,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonusDepreciation {
    pub deduction: f64,
    pub tax_savings: f64,
}

pub fn calculate_oz_projection(
    fund: &FundModel,
    investment_amount: f64,
    scenario: Scenario,
    hold_period: u32,
    rates: InvestorRates,
) -> OzProjection {
    let investment = fund.clamp_investment(investment_amount);

    let ownership = investment / fund.lp_equity_required;
    let projected_value = fund.total_lp_value_at_exit * ownership;
    let tax_free_gains = projected_value - investment;

    // OZ treatment is federally defined, so deferral and exit savings use the
    // statutory rates rather than the investor's own bracket.
    let deferred_tax = investment * fund.federal_ltcg_rate;
    let appreciation_tax_saved = tax_free_gains * (fund.federal_ltcg_rate + fund.state_ltcg_rate);

    let depreciation = calculate_bonus_depreciation(fund, investment, rates.ordinary_income);
    let year1 = year1_cash_flow_benefit(fund, investment, scenario, depreciation.deduction);

    OzProjection {
        investment_amount: investment,
        scenario,
        hold_period,
        projected_value,
        tax_free_gains,
        total_tax_savings: deferred_tax + appreciation_tax_saved,
        deferred_tax,
        appreciation_tax_saved,
        bonus_depreciation_deduction: depreciation.deduction,
        depreciation_tax_savings: depreciation.tax_savings,
        total_stacked_benefits: deferred_tax + appreciation_tax_saved + depreciation.tax_savings,
        year1_cash_flow_tax_free: year1.effectively_tax_free,
        year1,
    }
}

/// Pro-rata share of the fund's qualifying assets, valued at the investor's
/// ordinary-income rate.
pub fn calculate_bonus_depreciation(
    fund: &FundModel,
    investment: f64,
    ordinary_income_rate: f64,
) -> BonusDepreciation {
    let share = investment / fund.total_cost;
    let deduction = fund.qualifying_assets * fund.depreciation_rate * share;
    BonusDepreciation {
        deduction,
        tax_savings: deduction * ordinary_income_rate,
    }
}

pub fn year1_cash_flow_benefit(
    fund: &FundModel,
    investment: f64,
    scenario: Scenario,
    depreciation_deduction: f64,
) -> Year1CashFlow {
    let assumptions = fund.scenario(scenario);
    let noi_share = assumptions.year1_noi;
    Year1CashFlow {
        cash_flow: investment * assumptions.year1_cash_flow,
        noi_share,
        effectively_tax_free: depreciation_deduction >= noi_share,
        sheltered_amount: depreciation_deduction.min(noi_share),
        excess_depreciation: (depreciation_deduction - noi_share).max(0.0),
    }
}

/// Contrasts paying tax now and reinvesting elsewhere against deferring
/// through the fund, for the tranche the projection placed in the fund.
pub fn calculate_comparison(
    fund: &FundModel,
    projection: &OzProjection,
    current_tax_rate: f64,
    original_gain_amount: f64,
) -> ComparisonData {
    let tranche = projection.investment_amount;
    let rate = current_tax_rate.clamp(0.0, 1.0);

    let taxes_paid_now = tranche * rate;
    let available = tranche - taxes_paid_now;
    let growth = (1.0 + fund.alternative_return).powi(projection.hold_period as i32);
    let end_value = available * growth;
    let taxes_on_appreciation = (end_value - available) * rate;
    let without_fund = WealthOutcome {
        initial_investment: available,
        taxes_paid_now,
        end_value,
        taxes_on_appreciation,
        net_wealth: end_value - taxes_on_appreciation,
    };

    // Only the federal LTCG portion is deferred; NIIT and state are still due.
    let with_fund = WealthOutcome {
        initial_investment: tranche,
        taxes_paid_now: tranche * (rate - fund.federal_ltcg_rate).max(0.0),
        end_value: projection.projected_value,
        taxes_on_appreciation: 0.0,
        net_wealth: projection.projected_value + projection.depreciation_tax_savings,
    };

    ComparisonData {
        net_wealth_difference: with_fund.net_wealth - without_fund.net_wealth,
        without_fund,
        with_fund,
        gain_outside_fund: (original_gain_amount - tranche).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn rates(combined: f64, ordinary_income: f64) -> InvestorRates {
        InvestorRates {
            combined,
            ordinary_income,
        }
    }

    #[test]
    fn oracle_projection_for_half_million() {
        let fund = FundModel::hazen_road();
        let p = calculate_oz_projection(
            &fund,
            500_000.0,
            Scenario::Moderate,
            10,
            rates(0.263, 0.433),
        );

        let share = 500_000.0 / 19_323_884.0;
        let projected = 53_505_866.0 * share;
        assert_approx(p.investment_amount, 500_000.0);
        assert_approx(p.projected_value, projected);
        assert_approx(p.tax_free_gains, projected - 500_000.0);
        assert_approx(p.deferred_tax, 100_000.0);
        assert_approx(p.appreciation_tax_saved, (projected - 500_000.0) * 0.225);

        let deduction = 12_560_626.16 * 500_000.0 / 57_587_425.0;
        assert_approx(p.bonus_depreciation_deduction, deduction);
        assert_approx(p.depreciation_tax_savings, deduction * 0.433);
        assert!(p.year1_cash_flow_tax_free);
        assert_approx(p.year1.cash_flow, 17_500.0);
        assert_approx(p.year1.sheltered_amount, 103_525.0);
        assert_approx(p.year1.excess_depreciation, deduction - 103_525.0);
    }

    #[test]
    fn investment_is_clamped_to_fund_range() {
        let fund = FundModel::hazen_road();
        let r = rates(0.3, 0.4);
        let low = calculate_oz_projection(&fund, 1_000.0, Scenario::Conservative, 10, r);
        assert_approx(low.investment_amount, fund.min_investment);

        let high = calculate_oz_projection(&fund, 50_000_000.0, Scenario::Conservative, 10, r);
        assert_approx(high.investment_amount, fund.max_investment);
        assert_approx(high.projected_value, fund.total_lp_value_at_exit);
    }

    #[test]
    fn max_investment_takes_whole_fund_depreciation() {
        let fund = FundModel::hazen_road();
        let p = calculate_oz_projection(&fund, fund.max_investment, Scenario::Optimistic, 10, rates(0.3, 0.4));
        let expected =
            fund.qualifying_assets * fund.lp_equity_required / fund.total_cost;
        assert_approx(p.bonus_depreciation_deduction, expected);
    }

    #[test]
    fn small_investment_is_not_year1_tax_free() {
        let fund = FundModel::hazen_road();
        let p = calculate_oz_projection(&fund, 250_000.0, Scenario::Conservative, 10, rates(0.2, 0.3));
        // 250k buys ~54.5k of deduction, short of the 103.5k NOI share.
        assert!(!p.year1_cash_flow_tax_free);
        assert_approx(p.year1.excess_depreciation, 0.0);
    }

    #[test]
    fn hold_period_and_scenario_do_not_move_exit_value() {
        let fund = FundModel::hazen_road();
        let r = rates(0.3, 0.4);
        let a = calculate_oz_projection(&fund, 750_000.0, Scenario::Conservative, 10, r);
        let b = calculate_oz_projection(&fund, 750_000.0, Scenario::Optimistic, 15, r);
        assert_eq!(a.projected_value, b.projected_value);
        assert_eq!(a.total_stacked_benefits, b.total_stacked_benefits);
        assert_eq!(b.hold_period, 15);
    }

    #[test]
    fn oracle_comparison_ten_year_hold() {
        let fund = FundModel::hazen_road();
        let p = calculate_oz_projection(&fund, 500_000.0, Scenario::Moderate, 10, rates(0.263, 0.433));
        let c = calculate_comparison(&fund, &p, 0.263, 800_000.0);

        let available = 500_000.0 * (1.0 - 0.263);
        let end = available * 1.08_f64.powi(10);
        assert_approx(c.without_fund.taxes_paid_now, 500_000.0 * 0.263);
        assert_approx(c.without_fund.initial_investment, available);
        assert_approx(c.without_fund.end_value, end);
        assert_approx(c.without_fund.taxes_on_appreciation, (end - available) * 0.263);
        assert_approx(c.without_fund.net_wealth, end - (end - available) * 0.263);

        assert_approx(c.with_fund.taxes_paid_now, 500_000.0 * 0.063);
        assert_approx(c.with_fund.net_wealth, p.projected_value + p.depreciation_tax_savings);
        assert_approx(
            c.net_wealth_difference,
            c.with_fund.net_wealth - c.without_fund.net_wealth,
        );
        assert_approx(c.gain_outside_fund, 300_000.0);
    }

    #[test]
    fn comparison_serializes_with_path_keys() {
        let fund = FundModel::hazen_road();
        let p = calculate_oz_projection(&fund, 500_000.0, Scenario::Moderate, 10, rates(0.263, 0.433));
        let c = calculate_comparison(&fund, &p, 0.263, 500_000.0);
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("withoutOZ").is_some());
        assert!(json.get("withOZ").is_some());
        assert!(json.get("netWealthDifference").is_some());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_stacked_benefits_is_exact_sum(
            amount in 0.0f64..40_000_000.0,
            ordinary in 0.0f64..0.6,
            scenario_idx in 0usize..3,
        ) {
            let fund = FundModel::hazen_road();
            let p = calculate_oz_projection(&fund, amount, Scenario::ALL[scenario_idx], 10, rates(0.3, ordinary));
            prop_assert_eq!(
                p.total_stacked_benefits,
                p.deferred_tax + p.appreciation_tax_saved + p.depreciation_tax_savings
            );
            prop_assert!(p.investment_amount >= fund.min_investment);
            prop_assert!(p.investment_amount <= fund.max_investment);
        }

        #[test]
        fn prop_pro_rata_fields_are_monotone_in_investment(
            a in 0.0f64..25_000_000.0,
            b in 0.0f64..25_000_000.0,
            ordinary in 0.0f64..0.6,
        ) {
            let fund = FundModel::hazen_road();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let r = rates(0.3, ordinary);
            let pl = calculate_oz_projection(&fund, lo, Scenario::Moderate, 10, r);
            let ph = calculate_oz_projection(&fund, hi, Scenario::Moderate, 10, r);
            // Allow for rounding when two amounts are a few ulps apart.
            let tol = 1e-6;
            prop_assert!(pl.projected_value <= ph.projected_value + tol);
            prop_assert!(pl.tax_free_gains <= ph.tax_free_gains + tol);
            prop_assert!(pl.deferred_tax <= ph.deferred_tax + tol);
            prop_assert!(pl.appreciation_tax_saved <= ph.appreciation_tax_saved + tol);
            prop_assert!(pl.bonus_depreciation_deduction <= ph.bonus_depreciation_deduction + tol);
            prop_assert!(pl.depreciation_tax_savings <= ph.depreciation_tax_savings + tol);
            prop_assert!(pl.total_stacked_benefits <= ph.total_stacked_benefits + tol);
        }

        #[test]
        fn prop_fund_path_never_loses_to_paying_tax_now(
            amount in 250_000.0f64..19_323_884.0,
            combined in 0.15f64..0.55,
            ordinary in 0.10f64..0.55,
            hold_idx in 0usize..3,
            gain in 1_000.0f64..100_000_000.0,
        ) {
            let fund = FundModel::hazen_road();
            let hold = fund.hold_periods[hold_idx].years;
            let p = calculate_oz_projection(&fund, amount, Scenario::Moderate, hold, rates(combined, ordinary));
            let c = calculate_comparison(&fund, &p, combined, gain);
            prop_assert!(
                c.with_fund.net_wealth >= c.without_fund.net_wealth,
                "with {} < without {}", c.with_fund.net_wealth, c.without_fund.net_wealth
            );
            prop_assert!(c.net_wealth_difference >= 0.0);
        }
    }
}
