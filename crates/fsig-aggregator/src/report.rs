//! Report rendering.
//!
//! A report is built once and never mutated. Its text is:
//! header (with the generation date) + one line per signal + footer.

use crate::error::GenerationFault;
use chrono::NaiveDate;
use fsig_core::AdjustedSignal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Date format used in the report header.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

const SEPARATOR: &str = "✧═════════❂═════════✧";

/// Branding and fixed notices around the signal lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    #[serde(default = "default_headline")]
    pub headline: String,
    #[serde(default = "default_utc_label")]
    pub utc_label: String,
    #[serde(default = "default_martingale_notice")]
    pub martingale_notice: String,
    #[serde(default = "default_expiry_notice")]
    pub expiry_notice: String,
    #[serde(default = "default_avoid_notice")]
    pub avoid_notice: String,
    #[serde(default = "default_broker")]
    pub broker: String,
    #[serde(default = "default_support")]
    pub support: String,
}

fn default_headline() -> String {
    "🌟✧══❂✦ FUTURE SIGNALS BY KHALED DZ TRADER ✦❂══✧🌟".to_string()
}

fn default_utc_label() -> String {
    "UTC -3:00".to_string()
}

fn default_martingale_notice() -> String {
    "1 MTG IF LOSS".to_string()
}

fn default_expiry_notice() -> String {
    "Expiry: 1 Minute".to_string()
}

fn default_avoid_notice() -> String {
    "Doji , Round 00 , Momentum .".to_string()
}

fn default_broker() -> String {
    "Quotex Broker".to_string()
}

fn default_support() -> String {
    "@KhaLedDzTraderSupport".to_string()
}

impl Default for ReportTemplate {
    fn default() -> Self {
        Self {
            headline: default_headline(),
            utc_label: default_utc_label(),
            martingale_notice: default_martingale_notice(),
            expiry_notice: default_expiry_notice(),
            avoid_notice: default_avoid_notice(),
            broker: default_broker(),
            support: default_support(),
        }
    }
}

impl ReportTemplate {
    /// Header block, ending with the opening separator and a newline.
    pub fn header(&self, date: NaiveDate) -> String {
        format!(
            "{headline}\n\n\
             📆 Date {date}\n\
             ⏰ {utc}\n\
             🚧 {mtg}\n\
             ⏳ {expiry}\n\n\
             \u{26a0}\u{fe0f}Avoid:\n\
             {avoid}\n\n\
             Generated Signals:\n\n\
             {SEPARATOR}\n",
            headline = self.headline,
            date = date.format(DATE_FORMAT),
            utc = self.utc_label,
            mtg = self.martingale_notice,
            expiry = self.expiry_notice,
            avoid = self.avoid_notice,
        )
    }

    /// Footer block, no trailing newline.
    pub fn footer(&self) -> String {
        format!(
            "{SEPARATOR}\n\n🔮{broker}🔮\n\n🌟═ {support} ═🌟",
            broker = self.broker,
            support = self.support,
        )
    }
}

/// What a report carries.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportBody {
    /// Sorted, de-duplicated signals collected on `date`.
    Signals {
        date: NaiveDate,
        signals: Vec<AdjustedSignal>,
    },
    /// Generation failed; the text explains why.
    Fault { message: String },
}

/// Final report: body plus its rendered text.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReport {
    body: ReportBody,
    text: String,
}

impl SignalReport {
    /// Render a signal report. `signals` must already be sorted.
    pub fn render(date: NaiveDate, signals: Vec<AdjustedSignal>, template: &ReportTemplate) -> Self {
        let lines: Vec<String> = signals.iter().map(AdjustedSignal::line).collect();
        let text = format!(
            "{}{}\n{}",
            template.header(date),
            lines.join("\n"),
            template.footer()
        );
        Self {
            body: ReportBody::Signals { date, signals },
            text,
        }
    }

    /// Error report in place of signal lines.
    pub fn fault(fault: &GenerationFault) -> Self {
        let message = fault.to_string();
        Self {
            text: format!("❌ Error while fetching signals:\n{message}"),
            body: ReportBody::Fault { message },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn body(&self) -> &ReportBody {
        &self.body
    }

    /// Signals in report order (empty for a fault report).
    pub fn signals(&self) -> &[AdjustedSignal] {
        match &self.body {
            ReportBody::Signals { signals, .. } => signals,
            ReportBody::Fault { .. } => &[],
        }
    }

    /// Rendered signal lines (`"  M1;..."`) in report order.
    pub fn signal_lines(&self) -> Vec<String> {
        self.signals().iter().map(AdjustedSignal::line).collect()
    }

    pub fn is_fault(&self) -> bool {
        matches!(self.body, ReportBody::Fault { .. })
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for SignalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsig_core::{Action, CoreError, SignalTime};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()
    }

    fn signal(pair: &str, time: &str, action: Action) -> AdjustedSignal {
        AdjustedSignal {
            pair: pair.to_string(),
            time: SignalTime::parse(time).unwrap(),
            action,
            confidence: 99.0,
        }
    }

    const EXPECTED_HEADER: &str = "🌟✧══❂✦ FUTURE SIGNALS BY KHALED DZ TRADER ✦❂══✧🌟

📆 Date 07/03/2025
⏰ UTC -3:00
🚧 1 MTG IF LOSS
⏳ Expiry: 1 Minute

\u{26a0}\u{fe0f}Avoid:
Doji , Round 00 , Momentum .

Generated Signals:

✧═════════❂═════════✧
";

    const EXPECTED_FOOTER: &str = "✧═════════❂═════════✧

🔮Quotex Broker🔮

🌟═ @KhaLedDzTraderSupport ═🌟";

    #[test]
    fn test_header_and_footer_text() {
        let template = ReportTemplate::default();
        assert_eq!(template.header(date()), EXPECTED_HEADER);
        assert_eq!(template.footer(), EXPECTED_FOOTER);
    }

    #[test]
    fn test_render_with_signals() {
        let report = SignalReport::render(
            date(),
            vec![
                signal("EURUSD-OTC", "03:00", Action::Call),
                signal("BTC-OTC", "06:30", Action::Put),
            ],
            &ReportTemplate::default(),
        );
        let expected = format!(
            "{EXPECTED_HEADER}  M1;EURUSD-OTC;03:00;CALL\n  M1;BTC-OTC;06:30;PUT\n{EXPECTED_FOOTER}"
        );
        assert_eq!(report.text(), expected);
        assert_eq!(report.signals().len(), 2);
        assert!(!report.is_fault());
    }

    #[test]
    fn test_render_empty_keeps_header_and_footer() {
        let report = SignalReport::render(date(), Vec::new(), &ReportTemplate::default());
        assert_eq!(report.text(), format!("{EXPECTED_HEADER}\n{EXPECTED_FOOTER}"));
        assert!(report.signal_lines().is_empty());
    }

    #[test]
    fn test_fault_report() {
        let fault = GenerationFault::InvalidSignal(CoreError::InvalidTime("25:99".to_string()));
        let report = SignalReport::fault(&fault);
        assert!(report.is_fault());
        assert!(report.signals().is_empty());
        assert!(report.text().starts_with("❌ Error while fetching signals:\n"));
        assert!(report.text().contains("25:99"));
    }

    #[test]
    fn test_custom_branding() {
        let template = ReportTemplate {
            broker: "Demo Broker".to_string(),
            utc_label: "UTC +0:00".to_string(),
            ..Default::default()
        };
        let report = SignalReport::render(date(), Vec::new(), &template);
        assert!(report.text().contains("🔮Demo Broker🔮"));
        assert!(report.text().contains("⏰ UTC +0:00\n"));
    }
}
