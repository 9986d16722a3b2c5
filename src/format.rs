//! Display formatting for the metric cards.

use crate::aggregate::Metrics;
use serde::Serialize;

/// Shown in place of an average when there are no rows to average.
pub const NOT_AVAILABLE: &str = "N/A";

/// Groups the digits of a whole number in thousands: `1234567` -> `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        grouped.insert(0, '-');
    }
    grouped
}

/// Shortest decimal text for `value`, always with a fractional part (`45` -> `45.0`).
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Format a whole amount as yuan with grouped digits
///
/// # Arguments
/// * `value` - Amount already truncated to whole yuan
///
/// # Returns
/// * `String` - e.g. `¥ 1,234`
pub fn format_currency(value: i64) -> String {
    format!("¥ {}", group_thousands(value))
}

/// One star character per point of the rounded rating.
pub fn stars(count: usize) -> String {
    "⭐".repeat(count)
}

/// Label, value and caption for one metric card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub caption: &'static str,
}

/// The three metric cards, in display order.
pub fn metric_cards(metrics: &Metrics) -> Vec<MetricCard> {
    let rating = match metrics.average_rating {
        Some(rating) => format!("{} {}", format_decimal(rating), stars(metrics.star_count())),
        None => NOT_AVAILABLE.to_string(),
    };
    let per_sale = match metrics.average_sale {
        Some(average) => format!("¥ {}", format_decimal(average)),
        None => NOT_AVAILABLE.to_string(),
    };

    vec![
        MetricCard {
            label: "总销售额",
            value: format_currency(metrics.total_sales_whole()),
            caption: "本月累计",
        },
        MetricCard {
            label: "平均评分",
            value: rating.trim_end().to_string(),
            caption: "顾客满意度",
        },
        MetricCard {
            label: "单笔平均销售额",
            value: per_sale,
            caption: "交易均值",
        },
    ]
}
