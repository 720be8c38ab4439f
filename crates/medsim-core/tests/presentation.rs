use medsim_core::models::session::Stage;
use medsim_core::presentation::{
    Correctness, PointsStyle, PointsTier, appropriateness_label, format_cost, points_badge,
    points_style, points_tier, stage_label,
};

#[test]
fn badge_style_follows_sign() {
    assert_eq!(points_style(Some(5)), PointsStyle::Positive);
    assert_eq!(points_style(Some(-3)), PointsStyle::Negative);
    assert_eq!(points_style(Some(0)), PointsStyle::Neutral);
    assert_eq!(points_style(None), PointsStyle::Neutral);
}

#[test]
fn badge_label_keeps_explicit_zero() {
    assert_eq!(points_badge(Some(5)).as_deref(), Some("+5 pts"));
    assert_eq!(points_badge(Some(-3)).as_deref(), Some("-3 pts"));
    assert_eq!(points_badge(Some(0)).as_deref(), Some("0 pts"));
    assert_eq!(points_badge(None), None);
}

#[test]
fn total_tiers() {
    assert_eq!(points_tier(120), PointsTier::Highest);
    assert_eq!(points_tier(101), PointsTier::Highest);
    assert_eq!(points_tier(100), PointsTier::High);
    assert_eq!(points_tier(60), PointsTier::High);
    assert_eq!(points_tier(50), PointsTier::Positive);
    assert_eq!(points_tier(10), PointsTier::Positive);
    assert_eq!(points_tier(0), PointsTier::Neutral);
    assert_eq!(points_tier(-10), PointsTier::Negative);
}

#[test]
fn tier_style_agrees_with_badge_style() {
    for total in [-40, -1, 0, 1, 51, 200] {
        assert_eq!(points_tier(total).style(), points_style(Some(total)));
    }
}

#[test]
fn correctness_labels() {
    assert_eq!(Correctness::from_flag(Some(true)).label(), Some("✓ Correct"));
    assert_eq!(Correctness::from_flag(Some(false)).label(), Some("✗ Incorrect"));
    assert_eq!(Correctness::from_flag(None), Correctness::Unknown);
    assert_eq!(Correctness::Unknown.label(), None);
}

#[test]
fn labels_and_costs() {
    assert_eq!(appropriateness_label(true), "✓ Appropriate Test");
    assert_eq!(appropriateness_label(false), "⚠ Questionable Choice");
    assert_eq!(format_cost(150.0), "$150");
    assert_eq!(format_cost(0.0), "$0");
    assert_eq!(format_cost(1234.5), "$1234.50");
    assert_eq!(stage_label(Stage::Active), "In Progress");
    assert_eq!(stage_label(Stage::Completed), "Completed");
}
