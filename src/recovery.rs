// 🔁 Secondary Recovery Matcher - second pass through the detail registry
// Re-attempts both exception buckets against "detalle de recibos". The
// invoice bucket joins by the internal numeric receipt id; the entries
// bucket joins by invoice number and borrows the registry's value date and
// payment as credit-side fields.

use std::collections::HashMap;

use crate::records::{DetailRecord, InvoiceLink, ReconciledRow};

/// Second-tier result for one exception bucket
#[derive(Debug, Clone, Default)]
pub struct RecoveryMatch {
    pub recovered: Vec<ReconciledRow>,
    pub still_unmatched: Vec<ReconciledRow>,
}

/// Recover "facturas no encontradas" through the registry's internal id.
///
/// Attaches posting date, value date and the registry's invoice number, then
/// confirms the invoice against the billing table (attaching the invoice
/// date when billing knows it). Rows still lacking an invoice after both
/// joins are the final unrecoverable exception. The credit side stays
/// empty on this path: recovered rows join the detail, not the aging sums.
pub fn recover_unmatched_invoices(
    bucket: Vec<ReconciledRow>,
    registry: &[DetailRecord],
    invoice_links: &[InvoiceLink],
) -> RecoveryMatch {
    let mut registry_by_interno: HashMap<i64, Vec<&DetailRecord>> = HashMap::new();
    for record in registry {
        registry_by_interno
            .entry(record.internal_receipt_id)
            .or_default()
            .push(record);
    }

    // Billing confirmation: invoice number → invoice date (first link wins)
    let mut billing_dates: HashMap<&str, Option<chrono::NaiveDate>> = HashMap::new();
    for link in invoice_links {
        billing_dates
            .entry(link.invoice_id.as_str())
            .or_insert(link.invoice_date);
    }

    let mut out = RecoveryMatch::default();
    for row in bucket {
        match registry_by_interno.get(&row.internal_id) {
            Some(records) => {
                for record in records {
                    let mut joined = row.clone();
                    joined.posting_date = record.posting_date;
                    joined.value_date = record.value_date;
                    joined.invoice_id =
                        (!record.invoice_id.is_empty()).then(|| record.invoice_id.clone());

                    if let Some(invoice_id) = joined.invoice_id.as_deref() {
                        if let Some(invoice_date) = billing_dates.get(invoice_id) {
                            joined.invoice_date = *invoice_date;
                        }
                        out.recovered.push(joined);
                    } else {
                        out.still_unmatched.push(joined);
                    }
                }
            }
            None => out.still_unmatched.push(row),
        }
    }
    out
}

/// Recover "asientos no encontrados" by invoice number.
///
/// Unlike the invoice path, this joins the registry by invoice_id directly;
/// the value date and payment arrive as pseudo credit-side fields and the
/// partition runs on the new credit being present.
pub fn recover_unmatched_entries(
    bucket: Vec<ReconciledRow>,
    registry: &[DetailRecord],
) -> RecoveryMatch {
    let mut registry_by_invoice: HashMap<&str, Vec<&DetailRecord>> = HashMap::new();
    for record in registry {
        if !record.invoice_id.is_empty() {
            registry_by_invoice
                .entry(record.invoice_id.as_str())
                .or_default()
                .push(record);
        }
    }

    let mut out = RecoveryMatch::default();
    for row in bucket {
        match row
            .invoice_id
            .as_deref()
            .and_then(|id| registry_by_invoice.get(id))
        {
            Some(records) => {
                for record in records {
                    let mut joined = row.clone();
                    joined.realized_date = record.value_date;
                    joined.credit_amount = Some(record.payment_amount);
                    out.recovered.push(joined);
                }
            }
            None => out.still_unmatched.push(row),
        }
    }
    out
}
