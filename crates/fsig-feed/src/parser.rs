//! Feed page parsing.
//!
//! The feed page lists trades as repeated `.trade-row` blocks inside
//! `#tradeFeedContainer`. Fields are located by structural role:
//! - instrument: first `span.font-semibold`
//! - direction: first `span.font-bold`
//! - time: third `span` of the row
//! - confidence: first `span.font-medium`

use crate::error::{FeedError, FeedResult};
use scraper::{ElementRef, Html, Selector};

const CONTAINER: &str = "#tradeFeedContainer";
const ROW: &str = "#tradeFeedContainer .trade-row";
const INSTRUMENT: &str = "span.font-semibold";
const DIRECTION: &str = "span.font-bold";
const ANY_SPAN: &str = "span";
const CONFIDENCE: &str = "span.font-medium";

/// Position of the time field among a row's spans.
const TIME_SPAN_INDEX: usize = 2;

/// One trade row as found in the page, fields trimmed.
///
/// A field is `None` when the element is structurally absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFeedRow {
    pub instrument: Option<String>,
    pub direction: Option<String>,
    pub time: Option<String>,
    pub confidence: Option<String>,
}

impl RawFeedRow {
    /// True when every field required to build a candidate is present.
    pub fn is_complete(&self) -> bool {
        self.instrument.is_some()
            && self.direction.is_some()
            && self.time.is_some()
            && self.confidence.is_some()
    }
}

fn selector(css: &str) -> FeedResult<Selector> {
    Selector::parse(css).map_err(|e| FeedError::Parse(format!("bad selector '{css}': {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a feed page into raw rows, in document order.
///
/// Fails when the page has no feed container at all; a container with no
/// rows is an empty feed, not an error.
pub fn parse_feed(html: &str) -> FeedResult<Vec<RawFeedRow>> {
    let document = Html::parse_document(html);

    let container = selector(CONTAINER)?;
    if document.select(&container).next().is_none() {
        return Err(FeedError::Parse(format!("{CONTAINER} not found in page")));
    }

    let row_sel = selector(ROW)?;
    let instrument_sel = selector(INSTRUMENT)?;
    let direction_sel = selector(DIRECTION)?;
    let span_sel = selector(ANY_SPAN)?;
    let confidence_sel = selector(CONFIDENCE)?;

    let rows = document
        .select(&row_sel)
        .map(|row| RawFeedRow {
            instrument: row.select(&instrument_sel).next().map(element_text),
            direction: row.select(&direction_sel).next().map(element_text),
            time: row.select(&span_sel).nth(TIME_SPAN_INDEX).map(element_text),
            confidence: row.select(&confidence_sel).next().map(element_text),
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_html(pair: &str, action: &str, time: &str, confidence: &str) -> String {
        format!(
            r#"<div class="trade-row">
                 <span class="font-semibold">{pair}</span>
                 <span class="font-bold">{action}</span>
                 <span>{time}</span>
                 <span class="font-medium">{confidence}</span>
               </div>"#
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body><div id="tradeFeedContainer">{}</div></body></html>"#,
            rows.join("\n")
        )
    }

    #[test]
    fn test_parse_rows_in_document_order() {
        let html = page(&[
            row_html("EURUSD_otc", "call", "12:00", "99.5%"),
            row_html("BTC-OTC", "PUT", " 13:05 ", "98%"),
        ]);
        let rows = parse_feed(&html).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            RawFeedRow {
                instrument: Some("EURUSD_otc".to_string()),
                direction: Some("call".to_string()),
                time: Some("12:00".to_string()),
                confidence: Some("99.5%".to_string()),
            }
        );
        assert_eq!(rows[1].time.as_deref(), Some("13:05"));
        assert!(rows.iter().all(RawFeedRow::is_complete));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let html = page(&[r#"<div class="trade-row">
                 <span class="font-semibold">BTC-OTC</span>
                 <span class="font-bold">CALL</span>
               </div>"#
            .to_string()]);
        let rows = parse_feed(&html).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].time.is_none());
        assert!(rows[0].confidence.is_none());
        assert!(!rows[0].is_complete());
    }

    #[test]
    fn test_rows_outside_container_are_ignored() {
        let html = format!(
            r#"<div id="tradeFeedContainer"></div>{}"#,
            row_html("BTC-OTC", "CALL", "10:00", "99%")
        );
        assert!(parse_feed(&html).unwrap().is_empty());
    }

    #[test]
    fn test_missing_container_is_parse_error() {
        let err = parse_feed("<html><body><p>maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[test]
    fn test_nested_text_is_flattened() {
        let html = page(&[r#"<div class="trade-row">
                 <span class="font-semibold"><b>XAU</b>USD_otc</span>
                 <span class="font-bold">put</span>
                 <span>09:30</span>
                 <span class="font-medium">99.1<small>%</small></span>
               </div>"#
            .to_string()]);
        let rows = parse_feed(&html).unwrap();
        assert_eq!(rows[0].instrument.as_deref(), Some("XAUUSD_otc"));
        assert_eq!(rows[0].confidence.as_deref(), Some("99.1%"));
    }
}
