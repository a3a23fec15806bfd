use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Cookie `expires` format: `Thu, 01-Jan-1970 00:00:01 GMT`.
const COOKIE_DATE: &[BorrowedFormatItem<'static>] = format_description!(
    "[weekday repr:short], [day]-[month repr:short]-[year] [hour]:[minute]:[second] GMT"
);

/// Renders a Unix second count in the fixed cookie date format, UTC.
///
/// `None` when the timestamp falls outside the formatter's representable
/// range.
pub(crate) fn format_cookie_date(unix_secs: i64) -> Option<String> {
    let moment = OffsetDateTime::from_unix_timestamp(unix_secs).ok()?;
    moment.format(COOKIE_DATE).ok()
}
