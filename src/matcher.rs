// ⚖️ Base Matcher - receipts → journal entries → invoices
// Two chained left joins on the receipt number, then a partition on invoice
// presence. Conservation invariant: every post-join row lands in exactly one
// of the two partitions, even when a receipt fans out to several links.

use std::collections::HashMap;

use crate::records::{DebtorLink, InvoiceLink, Receipt, ReconciledRow};

/// Output of the base matching stage
#[derive(Debug, Clone, Default)]
pub struct BaseMatch {
    /// Rows that found an invoice - the base reconciliation set
    pub matched: Vec<ReconciledRow>,
    /// Exception bucket: "facturas no encontradas"
    pub invoices_not_found: Vec<ReconciledRow>,
}

impl BaseMatch {
    pub fn total_rows(&self) -> usize {
        self.matched.len() + self.invoices_not_found.len()
    }
}

/// Left-join receipts with debtor links and invoice links on receipt_id,
/// then partition on invoice presence.
pub fn match_base(
    receipts: &[Receipt],
    debtor_links: &[DebtorLink],
    invoice_links: &[InvoiceLink],
) -> BaseMatch {
    let mut entries_by_receipt: HashMap<&str, Vec<&DebtorLink>> = HashMap::new();
    for link in debtor_links {
        if let Some(receipt_id) = link.receipt_id.as_deref() {
            entries_by_receipt.entry(receipt_id).or_default().push(link);
        }
    }

    let mut invoices_by_receipt: HashMap<&str, Vec<&InvoiceLink>> = HashMap::new();
    for link in invoice_links {
        if let Some(receipt_id) = link.receipt_id.as_deref() {
            invoices_by_receipt.entry(receipt_id).or_default().push(link);
        }
    }

    let mut result = BaseMatch::default();

    for receipt in receipts {
        let base = ReconciledRow::from_receipt(receipt);

        // Left join #1: attach the journal entry, fanning out per debtor link
        let with_entries: Vec<ReconciledRow> = match receipt
            .receipt_id
            .as_deref()
            .and_then(|id| entries_by_receipt.get(id))
        {
            Some(links) => links
                .iter()
                .map(|link| {
                    let mut row = base.clone();
                    row.accounting_entry_id = Some(link.accounting_entry_id.clone());
                    row
                })
                .collect(),
            None => vec![base],
        };

        // Left join #2: attach the invoice, fanning out per invoice link
        for row in with_entries {
            match receipt
                .receipt_id
                .as_deref()
                .and_then(|id| invoices_by_receipt.get(id))
            {
                Some(links) => {
                    for link in links {
                        let mut joined = row.clone();
                        joined.invoice_id = Some(link.invoice_id.clone());
                        joined.invoice_date = link.invoice_date;
                        result.matched.push(joined);
                    }
                }
                None => result.invoices_not_found.push(row),
            }
        }
    }

    result
}
