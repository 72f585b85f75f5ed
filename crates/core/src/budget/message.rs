//! User-facing coaching and alert text.
//!
//! Message selection is keyed off the status band, with sub-thresholds
//! inside the `good` band (below/above 50% used) and a distinct message
//! when an over-limit week has actually gone negative.

use rust_decimal::Decimal;

use super::types::{CrossedThreshold, SpendStatus};

/// Picks the coaching message for a category week.
#[must_use]
pub fn coaching_message(status: SpendStatus, percentage_used: Decimal, remaining: Decimal) -> String {
    match status {
        SpendStatus::Over => {
            if remaining < Decimal::ZERO {
                format!(
                    "You went {} over this week. Next week's limit will adjust to help you get back on track.",
                    -remaining
                )
            } else {
                "You've hit this week's limit. Let's pause spending here until Monday.".to_string()
            }
        }
        SpendStatus::Critical => format!(
            "Almost there - only {remaining} left for the week. A small buffer still counts."
        ),
        SpendStatus::Warning => format!(
            "Heads up: you've used {percentage_used}% of this week's budget. Slowing down now keeps the week on track."
        ),
        SpendStatus::Good => {
            if percentage_used < Decimal::from(50) {
                "You're doing great - plenty of room left this week.".to_string()
            } else {
                "Past the halfway mark, but still comfortably on track.".to_string()
            }
        }
    }
}

/// Builds the alert text for a crossed threshold.
#[must_use]
pub fn alert_message(
    category_name: &str,
    threshold: CrossedThreshold,
    percentage_used: Decimal,
) -> String {
    match threshold {
        CrossedThreshold::Hundred => {
            format!("You've reached your weekly {category_name} budget.")
        }
        CrossedThreshold::Ninety => format!(
            "You've used {percentage_used}% of your weekly {category_name} budget - nearly there."
        ),
        CrossedThreshold::Eighty => format!(
            "You've used {percentage_used}% of your weekly {category_name} budget."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn over_with_negative_remaining_names_the_overage() {
        let msg = coaching_message(SpendStatus::Over, dec!(115.00), dec!(-30.00));
        assert!(msg.contains("30.00 over"));
    }

    #[test]
    fn over_with_zero_remaining_does_not_report_an_overage() {
        let msg = coaching_message(SpendStatus::Over, dec!(100.00), dec!(0.00));
        assert!(!msg.contains("over this week"));
    }

    #[test]
    fn good_band_splits_at_fifty_percent() {
        let low = coaching_message(SpendStatus::Good, dec!(20.00), dec!(80.00));
        let high = coaching_message(SpendStatus::Good, dec!(60.00), dec!(40.00));
        assert_ne!(low, high);
    }

    #[test]
    fn alert_messages_name_the_category() {
        for threshold in [
            CrossedThreshold::Eighty,
            CrossedThreshold::Ninety,
            CrossedThreshold::Hundred,
        ] {
            let msg = alert_message("Food & Dining", threshold, dec!(95.00));
            assert!(msg.contains("Food & Dining"));
        }
    }
}
