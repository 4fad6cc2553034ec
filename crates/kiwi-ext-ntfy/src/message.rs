//! Notification text.

use kiwi_traits::ChangeNotice;
use rust_decimal::Decimal;

/// Formats a notice as `(title, markdown body)`.
///
/// ```text
/// BNZ: 2 rates changed
///
/// - Standard 1 year: 4.49% -> 4.29%
/// - TotalMoney Variable: 5.84% (new)
/// ```
#[must_use]
pub fn format_notification(notice: &ChangeNotice) -> (String, String) {
    let count = notice.changes.len();
    let title = format!(
        "{}: {count} rate{} changed",
        notice.bank.display_name(),
        if count == 1 { "" } else { "s" }
    );

    let body = notice
        .changes
        .iter()
        .map(|change| match change.old_rate {
            Some(old) => format!(
                "- {} {}: {}% -> {}%",
                change.product_name,
                change.term,
                percent(old),
                percent(change.new_rate)
            ),
            None => format!(
                "- {} {}: {}% (new)",
                change.product_name,
                change.term,
                percent(change.new_rate)
            ),
        })
        .collect::<Vec<_>>()
        .join("\n");

    (title, body)
}

fn percent(rate: Decimal) -> String {
    rate.normalize().to_string()
}
