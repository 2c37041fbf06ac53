// 📈 Aging Calculator - días en calle per invoice
// Weighted aging over the union of reconciled rows. The day count is
// credit-weighted (importe por días summed over the group, divided by the
// total credit), never a plain average. Payment is recorded once per
// receipt, so it aggregates first-per-receipt and rejoins; summing it per
// ledger line would overstate it.

use std::collections::BTreeMap;

use crate::records::{AgingRow, ReconciledRow};

#[derive(Debug, Default)]
struct InvoiceGroup {
    customer_name: String,
    receipt_id: String,
    accounting_entry_id: String,
    reference_id: String,
    weighted_sum: f64,
    credit_sum: f64,
    /// First payment seen per receipt (keyed by the internal id, which
    /// identifies the receipt even when the REC number failed to parse)
    payment_by_receipt: BTreeMap<i64, f64>,
}

/// Group the reconciled rows by invoice and compute the aging indicator.
///
/// Rows missing a realization date, invoice date or credit amount contribute
/// to neither sum; partial data thins the metric instead of skewing it.
/// Negative day counts (ledger realized before the invoice was issued) pass
/// through unclamped - callers should flag them, the calculator does not.
///
/// No zero-credit guard here: the upstream zero filter is the invariant. A
/// group whose credits sum to zero yields a non-finite indicator.
pub fn compute_aging(rows: &[ReconciledRow]) -> Vec<AgingRow> {
    let mut groups: BTreeMap<String, InvoiceGroup> = BTreeMap::new();

    for row in rows {
        let Some(invoice_id) = row.invoice_id.as_deref() else {
            continue;
        };

        let group = groups.entry(invoice_id.to_string()).or_default();

        // First-value representatives; expected constant within a group
        if group.customer_name.is_empty() {
            group.customer_name = row.customer_name.clone();
        }
        if group.receipt_id.is_empty() {
            if let Some(receipt_id) = row.receipt_id.as_deref() {
                group.receipt_id = receipt_id.to_string();
            }
        }
        if group.accounting_entry_id.is_empty() {
            if let Some(entry_id) = row.accounting_entry_id.as_deref() {
                group.accounting_entry_id = entry_id.to_string();
            }
        }
        if group.reference_id.is_empty() {
            if let Some(reference) = row.reference_id.as_deref() {
                group.reference_id = reference.to_string();
            }
        }

        group
            .payment_by_receipt
            .entry(row.internal_id)
            .or_insert(row.payment_amount);

        if let (Some(realized), Some(invoiced), Some(credit)) =
            (row.realized_date, row.invoice_date, row.credit_amount)
        {
            let day_count = (realized - invoiced).num_days();
            group.weighted_sum += day_count as f64 * credit;
            group.credit_sum += credit;
        }
    }

    groups
        .into_iter()
        .map(|(invoice_id, group)| {
            let total_payment: f64 = group.payment_by_receipt.values().sum();
            AgingRow {
                customer_name: group.customer_name,
                receipt_id: group.receipt_id,
                total_credit: group.credit_sum,
                total_payment,
                accounting_entry_id: group.accounting_entry_id,
                invoice_id,
                reference_id: group.reference_id,
                days_outstanding: group.weighted_sum / group.credit_sum,
                payment_reconciliation_delta: total_payment - group.credit_sum,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(
        interno: i64,
        factura: &str,
        fecha_factura: &str,
        fecha: &str,
        haber: f64,
        pago: f64,
    ) -> ReconciledRow {
        ReconciledRow {
            customer_name: "Acme".to_string(),
            internal_id: interno,
            receipt_id: Some("1002".to_string()),
            payment_amount: pago,
            accounting_entry_id: Some("E55".to_string()),
            invoice_id: Some(factura.to_string()),
            invoice_date: NaiveDate::parse_from_str(fecha_factura, "%Y-%m-%d").ok(),
            account_name: Some("Banco".to_string()),
            reference_id: Some("R9".to_string()),
            realized_date: NaiveDate::parse_from_str(fecha, "%Y-%m-%d").ok(),
            credit_amount: Some(haber),
            posting_date: None,
            value_date: None,
        }
    }

    #[test]
    fn weighted_not_plain_average() {
        // Two lines: 100 at 10 days, 200 at 5 days.
        // (10*100 + 5*200) / 300 = 6.666..., not (10+5)/2.
        let rows = vec![
            row(1, "FA-1", "2024-01-10", "2024-01-20", 100.0, 300.0),
            row(1, "FA-1", "2024-01-10", "2024-01-15", 200.0, 300.0),
        ];
        let aging = compute_aging(&rows);
        assert_eq!(aging.len(), 1);
        assert!((aging[0].days_outstanding - 2000.0 / 300.0).abs() < 1e-9);
        assert_eq!(aging[0].total_credit, 300.0);
    }

    #[test]
    fn example_scenario_rec_1002() {
        // REC-1002 pays INV-0007 dated 2024-01-10; credit 500 posted 2024-01-20
        let rows = vec![row(1, "INV-0007", "2024-01-10", "2024-01-20", 500.0, 500.0)];
        let aging = compute_aging(&rows);

        assert_eq!(aging.len(), 1);
        let result = &aging[0];
        assert_eq!(result.invoice_id, "INV-0007");
        assert_eq!(result.days_outstanding, 10.0);
        assert_eq!(result.total_credit, 500.0);
        // Fully reconciled: control figure at zero
        assert!(result.payment_reconciliation_delta.abs() < 1e-9);
    }

    #[test]
    fn payment_counted_once_per_receipt() {
        // One receipt, one payment of 300, spread over two ledger lines.
        // Summing Pago per line would report 600.
        let rows = vec![
            row(1, "FA-1", "2024-01-10", "2024-01-20", 100.0, 300.0),
            row(1, "FA-1", "2024-01-10", "2024-01-15", 200.0, 300.0),
        ];
        let aging = compute_aging(&rows);
        assert_eq!(aging[0].total_payment, 300.0);
        assert!(aging[0].payment_reconciliation_delta.abs() < 1e-9);
    }

    #[test]
    fn two_receipts_sum_their_payments() {
        let rows = vec![
            row(1, "FA-1", "2024-01-10", "2024-01-20", 100.0, 100.0),
            row(2, "FA-1", "2024-01-10", "2024-01-15", 200.0, 200.0),
        ];
        let aging = compute_aging(&rows);
        assert_eq!(aging[0].total_payment, 300.0);
    }

    #[test]
    fn negative_day_count_passes_through() {
        // Ledger realized before the invoice was issued - valid signal
        let rows = vec![row(1, "FA-1", "2024-01-20", "2024-01-10", 500.0, 500.0)];
        let aging = compute_aging(&rows);
        assert_eq!(aging[0].days_outstanding, -10.0);
    }

    #[test]
    fn partial_rows_contribute_to_neither_sum() {
        let mut incomplete = row(1, "FA-1", "2024-01-10", "2024-01-20", 100.0, 300.0);
        incomplete.credit_amount = None;
        let complete = row(1, "FA-1", "2024-01-10", "2024-01-20", 200.0, 300.0);

        let aging = compute_aging(&[incomplete, complete]);
        assert_eq!(aging[0].total_credit, 200.0);
        assert_eq!(aging[0].days_outstanding, 10.0);
    }

    #[test]
    fn groups_ordered_by_invoice_id() {
        let rows = vec![
            row(1, "FA-B", "2024-01-10", "2024-01-20", 100.0, 100.0),
            row(2, "FA-A", "2024-01-10", "2024-01-20", 100.0, 100.0),
        ];
        let aging = compute_aging(&rows);
        assert_eq!(aging[0].invoice_id, "FA-A");
        assert_eq!(aging[1].invoice_id, "FA-B");
    }

    #[test]
    fn empty_input_yields_empty_report() {
        assert!(compute_aging(&[]).is_empty());
    }
}
