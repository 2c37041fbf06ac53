// 📒 Ledger Reference Matcher - attach Referencia and Haber from the mayor
// Joins the base set to the general ledger by Asiento, then runs the
// filter-then-rejoin over credit-bearing lines. One Asiento can point at
// debit postings and reversals under the same Referencia; isolating the
// credit rows first keeps those lines from fanning out the reconciled set.

use std::collections::{HashMap, HashSet};

use crate::records::{LedgerEntry, ReconciledRow};

/// Output of the ledger reference stage
#[derive(Debug, Clone, Default)]
pub struct LedgerMatch {
    /// Rows with a ledger reference and (where found) a credit line attached
    pub matched: Vec<ReconciledRow>,
    /// Exception bucket: "asientos no encontrados"
    pub entries_not_found: Vec<ReconciledRow>,
}

/// Attach account/reference by Asiento, partition on reference presence,
/// then join the credit-bearing ledger lines back in by Referencia and drop
/// the exact-zero postings.
pub fn match_ledger_references(
    base: Vec<ReconciledRow>,
    ledger: &[LedgerEntry],
) -> LedgerMatch {
    let mut lines_by_entry: HashMap<&str, Vec<&LedgerEntry>> = HashMap::new();
    for line in ledger {
        if let Some(entry_id) = line.accounting_entry_id.as_deref() {
            lines_by_entry.entry(entry_id).or_default().push(line);
        }
    }

    // Left join by Asiento, fanning out per ledger line
    let mut with_reference = Vec::new();
    let mut entries_not_found = Vec::new();
    for row in base {
        match row
            .accounting_entry_id
            .as_deref()
            .and_then(|id| lines_by_entry.get(id))
        {
            Some(lines) => {
                for line in lines {
                    let mut joined = row.clone();
                    joined.account_name = Some(line.account_name.clone());
                    joined.reference_id = line.reference_id.clone();
                    if joined.reference_id.is_some() {
                        with_reference.push(joined);
                    } else {
                        entries_not_found.push(joined);
                    }
                }
            }
            None => entries_not_found.push(row),
        }
    }

    // Collect the references actually in play, then keep only their
    // credit-bearing lines: {Referencia, Fecha, Haber}
    let references: HashSet<&str> = with_reference
        .iter()
        .filter_map(|row| row.reference_id.as_deref())
        .collect();

    let mut credits_by_reference: HashMap<&str, Vec<&LedgerEntry>> = HashMap::new();
    for line in ledger {
        if let (Some(reference), Some(_)) = (line.reference_id.as_deref(), line.credit_amount) {
            if references.contains(reference) {
                credits_by_reference.entry(reference).or_default().push(line);
            }
        }
    }

    // Rejoin by Referencia and drop the non-economic zero postings
    let mut matched = Vec::new();
    for row in with_reference {
        match row
            .reference_id
            .as_deref()
            .and_then(|reference| credits_by_reference.get(reference))
        {
            Some(lines) => {
                for line in lines {
                    if line.credit_amount == Some(0.0) {
                        continue;
                    }
                    let mut joined = row.clone();
                    joined.realized_date = line.realized_date;
                    joined.credit_amount = line.credit_amount;
                    matched.push(joined);
                }
            }
            // Reference matched but no credit line exists for it; the row
            // stays in the detail with a null credit, never in the bucket
            None => matched.push(row),
        }
    }

    LedgerMatch {
        matched,
        entries_not_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(asiento: Option<&str>) -> ReconciledRow {
        ReconciledRow {
            customer_name: "Acme".to_string(),
            internal_id: 1,
            receipt_id: Some("1002".to_string()),
            payment_amount: 500.0,
            accounting_entry_id: asiento.map(String::from),
            invoice_id: Some("FA-1".to_string()),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            account_name: None,
            reference_id: None,
            realized_date: None,
            credit_amount: None,
            posting_date: None,
            value_date: None,
        }
    }

    fn line(asiento: &str, referencia: Option<&str>, haber: Option<f64>, fecha: &str) -> LedgerEntry {
        LedgerEntry {
            accounting_entry_id: Some(asiento.to_string()),
            account_name: "Banco".to_string(),
            reference_id: referencia.map(String::from),
            realized_date: NaiveDate::parse_from_str(fecha, "%Y-%m-%d").ok(),
            credit_amount: haber,
            debit_amount: haber.is_none().then_some(500.0),
        }
    }

    #[test]
    fn attaches_reference_and_credit() {
        let ledger = vec![line("E55", Some("R9"), Some(500.0), "2024-01-20")];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);

        assert_eq!(out.matched.len(), 1);
        assert!(out.entries_not_found.is_empty());
        let matched = &out.matched[0];
        assert_eq!(matched.reference_id.as_deref(), Some("R9"));
        assert_eq!(matched.credit_amount, Some(500.0));
        assert_eq!(matched.realized_date, NaiveDate::from_ymd_opt(2024, 1, 20));
        assert!(matched.is_complete());
    }

    #[test]
    fn unknown_entry_goes_to_bucket() {
        let ledger = vec![line("E99", Some("R9"), Some(500.0), "2024-01-20")];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);
        assert!(out.matched.is_empty());
        assert_eq!(out.entries_not_found.len(), 1);
    }

    #[test]
    fn blank_reference_goes_to_bucket() {
        let ledger = vec![line("E55", None, Some(500.0), "2024-01-20")];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);
        assert!(out.matched.is_empty());
        assert_eq!(out.entries_not_found.len(), 1);
    }

    #[test]
    fn debit_lines_do_not_fan_out_the_match() {
        // Same Referencia carries a debit line and a credit line; only the
        // credit line may attach. A single join would duplicate the row.
        let ledger = vec![
            line("E55", Some("R9"), None, "2024-01-19"),
            line("E60", Some("R9"), Some(500.0), "2024-01-20"),
        ];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].credit_amount, Some(500.0));
    }

    #[test]
    fn zero_credit_rows_are_dropped() {
        let ledger = vec![
            line("E55", Some("R9"), Some(0.0), "2024-01-20"),
            line("E55", Some("R9"), Some(300.0), "2024-01-21"),
        ];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);

        // Fan-out produced two reference rows, each rejoined against the one
        // surviving credit line; the zero posting itself never appears.
        assert!(out.matched.iter().all(|r| r.credit_amount != Some(0.0)));
        assert!(!out.matched.is_empty());
    }

    #[test]
    fn reference_without_credit_stays_in_detail() {
        let ledger = vec![line("E55", Some("R9"), None, "2024-01-20")];
        let out = match_ledger_references(vec![row(Some("E55"))], &ledger);
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].credit_amount, None);
        assert!(out.entries_not_found.is_empty());
    }

    #[test]
    fn empty_base_set_yields_empty_outputs() {
        let out = match_ledger_references(Vec::new(), &[]);
        assert!(out.matched.is_empty());
        assert!(out.entries_not_found.is_empty());
    }
}
