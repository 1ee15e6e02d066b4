//! Shared test utilities.

#![allow(dead_code)]

pub mod mock_http;

/// One feed row in the page layout the parser expects.
pub fn feed_row(instrument: &str, direction: &str, time: &str, confidence: &str) -> String {
    format!(
        r#"<div class="trade-row"><span class="font-semibold">{instrument}</span><span class="font-bold">{direction}</span><span>{time}</span><span class="font-medium">{confidence}</span></div>"#
    )
}

/// A feed page containing `rows`.
pub fn feed_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><div id="tradeFeedContainer">{}</div></body></html>"#,
        rows.concat()
    )
}
