//! Terminal rendering of scan results: the lesion table, the receipt and the
//! scan progress bar.

use chrono::{DateTime, Local};
use colored::Colorize;
use rand::Rng;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use vibeopsy_engine::Prediction;
use vibeopsy_taxonomy::TaxonomyRegistry;
use vibeopsy_types::Distribution;

const TABLE_HEADER: &str = r"A:\SCAN\LESIONS";
const NO_RESULT: &str = "---";
const PRIMARY_MARKER: &str = "\u{25BA}";

const TXN_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TXN_LEN: usize = 8;
const BAR_WIDTH: usize = 30;
const PROGRESS_WIDTH: usize = 20;

/// Table row for lesion display
#[derive(Debug, Tabled)]
struct LesionRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "LESION NAME")]
    name: String,
    #[tabled(rename = "CODE")]
    code: String,
    #[tabled(rename = "CANCEROUS")]
    cancerous: &'static str,
    #[tabled(rename = "RESULT")]
    result: String,
}

/// Format a probability as a one-decimal percentage.
pub fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

/// Every category of `registry` with its result, highlighting the primary row.
///
/// Without a distribution every result reads `---`.
pub fn lesion_table(registry: &TaxonomyRegistry, distribution: Option<&Distribution>) -> String {
    let primary = distribution.filter(|d| !d.is_empty()).map(|d| d.primary_index());

    let rows: Vec<LesionRow> = registry
        .iter()
        .enumerate()
        .map(|(index, category)| LesionRow {
            marker: if primary == Some(index) { PRIMARY_MARKER } else { "" },
            name: category.name.clone(),
            code: category.code.clone(),
            cancerous: if category.malignant { "YES" } else { "NO" },
            result: distribution
                .and_then(|d| d.probability_of(&category.code))
                .map(percent)
                .unwrap_or_else(|| NO_RESULT.to_string()),
        })
        .collect();
    let table = Table::new(rows).with(Style::modern()).to_string();

    let mut out = format!(
        "{}  ({} categories)\n",
        TABLE_HEADER.bold(),
        registry.len()
    );
    for line in table.lines() {
        if line.contains(PRIMARY_MARKER) {
            out.push_str(&line.bold().yellow().to_string());
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Printed summary of the headline diagnosis.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub issued_at: DateTime<Local>,
    pub diagnosis: String,
    pub is_cancer: bool,
    pub confidence: f64,
}

impl Receipt {
    pub fn new<R: Rng>(prediction: &Prediction, rng: &mut R) -> Self {
        Self {
            transaction_id: transaction_id(rng),
            issued_at: Local::now(),
            diagnosis: prediction.diagnosis.clone(),
            is_cancer: prediction.is_cancer,
            confidence: prediction.confidence,
        }
    }

    /// Whole-percent confidence as printed.
    pub fn confidence_label(&self) -> String {
        format!("{:.0}%", self.confidence)
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(BAR_WIDTH + 2);
        let lines = [
            centered("VIBE-OPSY").bold().to_string(),
            centered("Skin Lesion Analysis"),
            rule.clone(),
            format!("DATE:   {}", self.issued_at.format("%m/%d/%Y")),
            format!("TIME:   {}", self.issued_at.format("%I:%M:%S %p")),
            format!("TXN ID: {}", self.transaction_id),
            rule.clone(),
            centered("ANALYSIS RESULT"),
            centered(&self.diagnosis.to_uppercase()).bold().to_string(),
            banner_line(self.is_cancer),
            format!("Confidence: {}", self.confidence_label()),
            confidence_bar(self.confidence),
            rule,
            centered("* FOR REFERENCE ONLY *"),
            centered("CONSULT A HEALTHCARE PROFESSIONAL"),
            centered("FOR ACCURATE DIAGNOSIS"),
            centered("THANK YOU FOR USING VIBE-OPSY"),
        ];
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Malignancy banner, centred on the plain text before colouring.
fn banner_line(is_cancer: bool) -> String {
    if is_cancer {
        centered("!! MALIGNANT DETECTED !!").red().bold().to_string()
    } else {
        centered("BENIGN").green().bold().to_string()
    }
}

/// Random uppercase base-36 transaction identifier.
pub fn transaction_id<R: Rng>(rng: &mut R) -> String {
    (0..TXN_LEN)
        .map(|_| TXN_ALPHABET[rng.gen_range(0..TXN_ALPHABET.len())] as char)
        .collect()
}

/// `[####....]` bar for a 0-100 confidence.
pub fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled)
    )
}

/// Kiosk-style scan progress line for a 0-100 value.
pub fn progress_line(progress: u8) -> String {
    let blocks = (usize::from(progress.min(100)) / 5).min(PROGRESS_WIDTH);
    format!(
        "SCANNING [{}{}] {:>3}%",
        "|".repeat(blocks),
        ".".repeat(PROGRESS_WIDTH - blocks),
        progress.min(100)
    )
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = BAR_WIDTH + 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vibeopsy_engine::Synthesizer;

    fn hashed() -> (TaxonomyRegistry, Distribution) {
        let synth = Synthesizer::with_defaults();
        let d = synth.synthesize_deterministic("sample.jpg").unwrap();
        (synth.registry().clone(), d)
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(0.83), "83.0%");
        assert_eq!(percent(0.0123), "1.2%");
        assert_eq!(percent(0.0), "0.0%");
    }

    #[test]
    fn empty_table_shows_placeholders() {
        let registry = TaxonomyRegistry::skin_lesions();
        let table = lesion_table(&registry, None);
        assert!(table.contains(TABLE_HEADER));
        assert!(table.contains("7 categories"));
        assert_eq!(table.matches(NO_RESULT).count(), 7);
        assert!(!table.contains(PRIMARY_MARKER));
    }

    #[test]
    fn table_marks_the_primary_row() {
        let (registry, d) = hashed();
        let table = lesion_table(&registry, Some(&d));
        let marked: Vec<_> = table.lines().filter(|l| l.contains(PRIMARY_MARKER)).collect();
        assert_eq!(marked.len(), 1);
        assert!(marked[0].contains("AKIEC"));
        assert!(marked[0].contains("83.0%"));
        assert!(!table.contains(NO_RESULT));
        assert_eq!(table.matches("YES").count(), 3);
    }

    #[test]
    fn transaction_ids_are_base36() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let id = transaction_id(&mut rng);
            assert_eq!(id.len(), 8);
            assert!(id.bytes().all(|b| TXN_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn confidence_bar_is_thirty_wide() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", ".".repeat(30)));
        assert_eq!(confidence_bar(100.0), format!("[{}]", "#".repeat(30)));
        assert_eq!(confidence_bar(50.0).matches('#').count(), 15);
        assert_eq!(confidence_bar(250.0).len(), 32);
    }

    #[test]
    fn progress_line_fills_in_steps_of_five() {
        assert!(progress_line(0).contains(&".".repeat(20)));
        assert!(progress_line(50).contains(&"|".repeat(10)));
        assert!(progress_line(100).ends_with("100%"));
    }

    fn strip_ansi(text: &str) -> String {
        let mut out = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn coloured_banner_is_centred_on_visible_text() {
        colored::control::set_override(true);
        let malignant = banner_line(true);
        let benign = banner_line(false);
        colored::control::unset_override();

        assert!(malignant.contains('\u{1b}'));
        assert_eq!(strip_ansi(&malignant), centered("!! MALIGNANT DETECTED !!"));
        assert_eq!(strip_ansi(&benign), centered("BENIGN"));
        assert_eq!(strip_ansi(&benign).chars().count(), BAR_WIDTH + 2);
    }

    #[test]
    fn receipt_shows_headline() {
        let (registry, d) = hashed();
        let prediction = Prediction::from_distribution(&registry, &d).unwrap();
        let receipt = Receipt::new(&prediction, &mut StdRng::seed_from_u64(1));
        let text = receipt.render();
        assert!(text.contains("VIBE-OPSY"));
        assert!(text.contains("ACTINIC KERATOSES"));
        assert!(text.contains("MALIGNANT DETECTED"));
        assert!(text.contains("Confidence: 83%"));
        assert!(text.contains(&receipt.transaction_id));
        assert!(text.contains("CONSULT A HEALTHCARE PROFESSIONAL"));
    }
}
