// 🔧 Preprocessor - normalization pass over the raw tables
// Applies the identifier normalizer to each source and coerces the Asiento
// join key to one canonical string form. Every join downstream assumes this
// pass already ran; a numeric/text key mismatch would silently match nothing.

use chrono::NaiveDate;

use crate::normalizer::{extract_invoice_number, extract_receipt_number};
use crate::records::{
    DebtorLink, DetailRecord, InvoiceLink, LedgerEntry, RawDebtorRow, RawDetailRow, RawInvoiceRow,
    RawLedgerRow, RawReceiptRow, Receipt,
};

/// What to do with receipts whose reference never matched the REC pattern.
///
/// The legacy trees disagreed: the basic pipeline dropped them, the extended
/// one kept them as null and let the joins fail naturally. The unified
/// pipeline takes the policy explicitly; `Keep` is the default so nothing
/// disappears without showing up in an exception bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullReceiptPolicy {
    /// Drop rows with an unparseable reference before matching
    Drop,
    /// Keep them; they surface in "facturas no encontradas"
    #[default]
    Keep,
}

/// Canonical string form of an accounting-entry id.
///
/// The key arrives as text in some exports and as a number in others; a
/// float round-trip leaves a trailing ".0" that must not break the join.
pub fn canonical_entry_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let trimmed = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    Some(trimmed.to_string())
}

/// Parse a source date cell. Exports carry either ISO or día/mes/año.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

/// Normalize "cobranza por recibo": extract the receipt number from Recibo.
pub fn normalize_receipts(rows: &[RawReceiptRow], policy: NullReceiptPolicy) -> Vec<Receipt> {
    rows.iter()
        .map(|row| Receipt {
            internal_id: row.interno,
            customer_name: row.nombre.clone(),
            receipt_id: extract_receipt_number(&row.recibo),
            payment_amount: row.pago,
            raw_reference: row.recibo.clone(),
        })
        .filter(|receipt| policy == NullReceiptPolicy::Keep || receipt.receipt_id.is_some())
        .collect()
}

/// Normalize "cobranza por factura": receipt number from Comprobante, invoice
/// number sliced from Factura, invoice date parsed.
pub fn normalize_invoice_links(rows: &[RawInvoiceRow]) -> Vec<InvoiceLink> {
    rows.iter()
        .map(|row| InvoiceLink {
            receipt_id: extract_receipt_number(&row.comprobante),
            invoice_id: extract_invoice_number(&row.factura),
            invoice_date: parse_date(&row.fecha_factura),
        })
        .collect()
}

/// Normalize "deudores por ventas", projected to the two join columns.
pub fn normalize_debtor_links(rows: &[RawDebtorRow]) -> Vec<DebtorLink> {
    rows.iter()
        .filter_map(|row| {
            canonical_entry_id(&row.asiento).map(|entry_id| DebtorLink {
                receipt_id: extract_receipt_number(&row.comprobante_relacionado),
                accounting_entry_id: entry_id,
            })
        })
        .collect()
}

/// Normalize the general ledger ("mayor de PPIs").
pub fn normalize_ledger(rows: &[RawLedgerRow]) -> Vec<LedgerEntry> {
    rows.iter()
        .map(|row| {
            let reference = row.referencia.trim();
            LedgerEntry {
                accounting_entry_id: canonical_entry_id(&row.asiento),
                account_name: row.cuenta.clone(),
                reference_id: (!reference.is_empty()).then(|| reference.to_string()),
                realized_date: parse_date(&row.fecha),
                credit_amount: row.haber,
                debit_amount: row.debe,
            }
        })
        .collect()
}

/// Normalize the detail-receipt registry (extended pipeline only).
pub fn normalize_detail(rows: &[RawDetailRow]) -> Vec<DetailRecord> {
    rows.iter()
        .map(|row| DetailRecord {
            internal_receipt_id: row.recibo,
            customer_name: row.nombre.clone(),
            payment_amount: row.pago,
            posting_date: parse_date(&row.fecha_comprobante),
            value_date: parse_date(&row.fecha_del_valor),
            invoice_id: extract_invoice_number(&row.factura),
        })
        .collect()
}
