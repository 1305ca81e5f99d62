//! Cross-module scenarios for the arithmetic layer: ranges, quotes and fees
//! composed the way a pool would use them.

mod common;

use alloy::primitives::U256;
use common::*;
use izi_math::fee::amount_plus_fee;
use izi_math::quote::quote_from_desired_y_q96;
use izi_math::{ExactDecimal, FeeTier, MathConfig, MathError, Range, Rounding, SqrtPriceQ96};

#[test]
fn single_point_ranges_at_exact_prices() {
    let grid = default_grid();

    // price(0) = 1, price(2) = 1.0001^2 with exact root 1.0001
    for rounding in [Rounding::Up, Rounding::Down] {
        assert_eq!(grid.token_y_in_range(&dec("1000"), 0, 1, rounding).unwrap(), dec("1000"));
        assert_eq!(grid.token_x_in_range(&dec("10001"), 2, 3, rounding).unwrap(), dec("10000"));
        assert_eq!(grid.token_y_in_range(&dec("10000"), 2, 3, rounding).unwrap(), dec("10001"));
    }
}

#[test]
fn negative_even_points_give_whole_amounts() {
    let grid = default_grid();
    for rounding in [Rounding::Up, Rounding::Down] {
        assert_eq!(grid.token_x_in_range(&dec("10000"), -2, -1, rounding).unwrap(), dec("10001"));
        assert_eq!(grid.token_y_in_range(&dec("10001"), -2, -1, rounding).unwrap(), dec("10000"));
    }
    let quote = grid.quote_from_desired_y(-2, &dec("10000")).unwrap();
    assert_eq!(quote.acquired_x, dec("10002"));
    assert_eq!(quote.cost_y, dec("10000"));
}

#[test]
fn splitting_a_range_brackets_the_whole() {
    let grid = default_grid();
    let liquidity = dec("123456789012345");

    for (pl, mid, pr) in [(-30, -7, 11), (0, 1, 2), (95, 100, 140)] {
        let whole_down = grid.token_y_in_range(&liquidity, pl, pr, Rounding::Down).unwrap();
        let whole_up = grid.token_y_in_range(&liquidity, pl, pr, Rounding::Up).unwrap();
        let parts_down = &grid.token_y_in_range(&liquidity, pl, mid, Rounding::Down).unwrap()
            + &grid.token_y_in_range(&liquidity, mid, pr, Rounding::Down).unwrap();
        let parts_up = &grid.token_y_in_range(&liquidity, pl, mid, Rounding::Up).unwrap()
            + &grid.token_y_in_range(&liquidity, mid, pr, Rounding::Up).unwrap();
        assert!(parts_down <= whole_down, "y down [{pl}, {pr})");
        assert!(parts_up >= whole_up, "y up [{pl}, {pr})");

        let whole_x = grid.token_x_in_range(&liquidity, pl, pr, Rounding::Down).unwrap();
        let parts_x = &grid.token_x_in_range(&liquidity, pl, mid, Rounding::Down).unwrap()
            + &grid.token_x_in_range(&liquidity, mid, pr, Rounding::Down).unwrap();
        assert!(parts_x <= whole_x, "x down [{pl}, {pr})");
    }
}

#[test]
fn custom_rate_gives_exact_amounts() {
    let config = MathConfig {
        rate: dec("4"),
        precision: 10,
    };
    let grid = config.grid().unwrap();

    // √price is 1 then 2
    let liquidity = dec("10");
    assert_eq!(grid.token_y_in_range(&liquidity, 0, 2, Rounding::Down).unwrap(), dec("30"));
    assert_eq!(grid.token_x_in_range(&liquidity, 0, 2, Rounding::Up).unwrap(), dec("15"));
    assert_eq!(grid.token_x_in_range(&liquidity, -1, 0, Rounding::Down).unwrap(), dec("20"));
}

#[test]
fn non_positive_rate_is_rejected() {
    let config = MathConfig {
        rate: dec("0"),
        precision: 10,
    };
    assert!(matches!(config.grid(), Err(MathError::InvalidRate(_))));
}

#[test]
fn batch_reports_bad_range_in_place() {
    let grid = default_grid();
    let ranges = vec![
        Range::new(dec("1000"), 0, 1),
        Range::new(dec("1000"), 5, 4),
        Range::new(dec("1000"), 7, 7),
    ];

    let results: Vec<_> = grid.batch_token_y_in_ranges(&ranges, Rounding::Down).collect();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(dec("1000")));
    assert_eq!(results[1], Err(MathError::InvalidRange { pl: 5, pr: 4 }));
    assert_eq!(results[2], Ok(ExactDecimal::zero()));
}

#[test]
fn quote_cost_grossed_up_by_fee() {
    let grid = default_grid();

    let quote = grid.quote_from_desired_y(2, &dec("1000000")).unwrap();
    assert_eq!(quote.acquired_x, dec("999800"));
    assert_eq!(quote.cost_y, dec("1000000"));

    // ceil(1000000 * 3000 / 997000) = 3010
    let total = amount_plus_fee(&quote.cost_y, FeeTier::new(3000).unwrap()).unwrap();
    assert_eq!(total, dec("1003010"));
}

#[test]
fn q96_quote_agrees_with_grid_at_origin() {
    let grid = default_grid();
    let unit = SqrtPriceQ96::new(U256::from(1u64) << 96);

    for desired in ["0", "1", "999", "1000000", "340282366920938463463374607431768211455"] {
        let from_grid = grid.quote_from_desired_y(0, &dec(desired)).unwrap();
        let from_q96 = quote_from_desired_y_q96(unit, &dec(desired)).unwrap();
        assert_eq!(from_grid, from_q96, "desired {desired}");
    }
}

#[test]
fn quote_never_buys_more_x_than_budget_allows() {
    let grid = default_grid();
    let desired = dec("5000000000000");

    for point in [-800, -3, 1, 64, 799] {
        let quote = grid.quote_from_desired_y(point, &desired).unwrap();
        let price = grid.price_at(point);
        // acquired_x * price <= desired_y, with price taken as the exact rational
        let lhs = &quote.acquired_x * &ExactDecimal::from(price.numerator().clone());
        let rhs = &desired * &ExactDecimal::from(price.denominator().clone());
        assert!(lhs <= rhs, "point {point}");
        assert_eq!(grid.reprice_cost_y(point, &quote.acquired_x).unwrap(), quote.cost_y);
    }
}
