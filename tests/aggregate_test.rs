mod common;

use common::{record, table};
use dashpage::aggregate::{Metrics, sales_by_hour, sales_by_product};
use dashpage::dashboard::DashboardView;
use dashpage::filter::FilterSelection;
use dashpage::format::metric_cards;

#[test]
fn test_product_totals_ascending_by_value() {
    let records = vec![
        record("太原", "会员", "女性", "A", 10.0, 6.0, 11),
        record("太原", "会员", "女性", "B", 30.0, 8.0, 10),
        record("太原", "会员", "女性", "A", 5.0, 7.0, 10),
    ];

    let groups = sales_by_product(&records);

    let pairs: Vec<(&str, f64)> = groups.iter().map(|g| (g.key.as_str(), g.total)).collect();
    assert_eq!(pairs, vec![("A", 15.0), ("B", 30.0)]);
    assert_eq!(Metrics::compute(&records).total_sales, 45.0);
    println!("✓ A = 15, B = 30, ascending");
}

#[test]
fn test_equal_product_totals_keep_key_order() {
    let records = vec![
        record("太原", "会员", "女性", "乙", 10.0, 8.0, 10),
        record("太原", "会员", "女性", "甲", 10.0, 8.0, 10),
        record("太原", "会员", "女性", "丙", 5.0, 8.0, 10),
    ];

    let keys: Vec<String> = sales_by_product(&records).into_iter().map(|g| g.key).collect();

    let mut tied = vec!["乙".to_string(), "甲".to_string()];
    tied.sort();
    assert_eq!(keys, vec!["丙".to_string(), tied[0].clone(), tied[1].clone()]);
    println!("✓ Ties broken by key");
}

#[test]
fn test_hour_totals_ascending_by_hour_without_gaps_filled() {
    let records = vec![
        record("太原", "会员", "女性", "A", 10.0, 8.0, 19),
        record("太原", "会员", "女性", "A", 5.0, 6.0, 10),
        record("太原", "会员", "女性", "B", 2.5, 7.0, 19),
    ];

    let groups = sales_by_hour(&records);

    let pairs: Vec<(u8, f64)> = groups.iter().map(|g| (g.key, g.total)).collect();
    assert_eq!(pairs, vec![(10, 5.0), (19, 12.5)]);
    println!("✓ Only observed hours appear");
}

#[test]
fn test_group_totals_match_overall_total() {
    let records = vec![
        record("太原", "会员", "女性", "A", 10.5, 8.0, 10),
        record("大同", "普通", "男性", "B", 20.25, 6.0, 11),
        record("临汾", "会员", "女性", "C", 4.25, 7.0, 13),
    ];

    let metrics = Metrics::compute(&records);
    let by_product: f64 = sales_by_product(&records).iter().map(|g| g.total).sum();
    let by_hour: f64 = sales_by_hour(&records).iter().map(|g| g.total).sum();

    assert_eq!(metrics.total_sales, 35.0);
    assert_eq!(by_product, metrics.total_sales);
    assert_eq!(by_hour, metrics.total_sales);
    println!("✓ Both groupings sum to the overall total");
}

#[test]
fn test_metrics_for_two_rows() {
    let records = vec![
        record("太原", "会员", "女性", "A", 15.0, 8.0, 10),
        record("太原", "会员", "女性", "B", 30.0, 7.0, 11),
    ];

    let metrics = Metrics::compute(&records);

    assert_eq!(metrics.transactions, 2);
    assert_eq!(metrics.total_sales, 45.0);
    assert_eq!(metrics.average_rating, Some(7.5));
    assert_eq!(metrics.average_sale, Some(22.5));
    assert_eq!(metrics.star_count(), 8);

    let cards = metric_cards(&metrics);
    assert_eq!(cards[0].value, "¥ 45");
    assert_eq!(cards[1].value, "7.5 ⭐⭐⭐⭐⭐⭐⭐⭐");
    assert_eq!(cards[2].value, "¥ 22.5");
    println!("✓ Metric cards formatted");
}

#[test]
fn test_total_is_truncated_for_display() {
    let records = vec![record("太原", "会员", "女性", "A", 1234.99, 6.5, 10)];

    let metrics = Metrics::compute(&records);

    assert_eq!(metrics.total_sales_whole(), 1234);
    assert_eq!(metrics.star_count(), 6);
    assert_eq!(metric_cards(&metrics)[0].value, "¥ 1,234");
    println!("✓ ¥ 1,234 with 6 stars for 6.5");
}

#[test]
fn test_dashboard_view_with_empty_selection() {
    let table = table(vec![
        record("太原", "会员", "女性", "A", 15.0, 8.0, 10),
        record("大同", "普通", "男性", "B", 30.0, 7.0, 11),
    ]);
    let selection = FilterSelection::new(Vec::<String>::new(), ["会员"], ["女性"]);

    let view = DashboardView::build(&table, Some(&selection));

    assert!(view.filtered.is_empty());
    assert!(view.product_sales.is_empty());
    assert!(view.hourly_sales.is_empty());
    assert_eq!(view.metrics.total_sales, 0.0);
    assert_eq!(view.metrics.average_rating, None);
    assert_eq!(view.controls[0].options.len(), 2);
    println!("✓ Empty selection gives an empty dashboard");
}

#[test]
fn test_dashboard_view_defaults_to_everything() {
    let table = table(vec![
        record("太原", "会员", "女性", "A", 15.0, 8.0, 10),
        record("大同", "普通", "男性", "B", 30.0, 7.0, 11),
    ]);

    let view = DashboardView::build(&table, None);
    let summary = view.summary();

    assert_eq!(summary.rows, 2);
    assert_eq!(summary.metrics.total_sales, 45.0);
    assert_eq!(summary.selection, FilterSelection::all_observed(&table));
    println!("✓ No stored selection means all observed values");
}
