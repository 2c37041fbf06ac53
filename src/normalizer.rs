// 🔍 Identifier Normalizer - canonical receipt and invoice numbers
// Extraction never fails: a reference that doesn't match yields None and the
// row routes to an exception bucket downstream.

use once_cell::sync::Lazy;
use regex::Regex;

/// "REC" (case-sensitive), optional whitespace/hyphen, then the digit run.
/// Matches "REC-1002", "REC - 1002", "REC1002".
static RECEIPT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"REC\s*-?\s*(\d+)").expect("receipt pattern is valid"));

/// Invoice numbers live at a fixed offset inside the Factura column.
/// This is a positional-format assumption, not a semantic parse.
const INVOICE_SLICE_START: usize = 2;
const INVOICE_SLICE_END: usize = 22;

/// Extract the canonical receipt number from a free-text reference.
///
/// Returns the captured digit run, or None when the pattern does not match.
pub fn extract_receipt_number(reference: &str) -> Option<String> {
    RECEIPT_PATTERN
        .captures(reference)
        .map(|caps| caps[1].to_string())
}

/// Slice the invoice number out of the Factura column (chars 2..22).
///
/// Shorter input truncates silently; operating on chars keeps this safe for
/// any byte content.
pub fn extract_invoice_number(factura: &str) -> String {
    factura
        .chars()
        .skip(INVOICE_SLICE_START)
        .take(INVOICE_SLICE_END - INVOICE_SLICE_START)
        .collect()
}
