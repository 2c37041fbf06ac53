// 🚰 Pipeline - one entry point, optional secondary recovery
// The legacy basic/extended variants lived in forked trees; here they are
// one pipeline parameterized by the recovery stage. Each stage is a pure
// function over owned tables, so concurrent embedders just hand every run
// its own inputs.

use log::{info, warn};

use crate::aging::compute_aging;
use crate::error::PipelineError;
use crate::ledger::match_ledger_references;
use crate::matcher::match_base;
use crate::preprocess::{
    normalize_debtor_links, normalize_detail, normalize_invoice_links, normalize_ledger,
    normalize_receipts, NullReceiptPolicy,
};
use crate::records::{
    AgingRow, RawDebtorRow, RawDetailRow, RawInvoiceRow, RawLedgerRow, RawReceiptRow,
    ReconciledRow,
};
use crate::recovery::{recover_unmatched_entries, recover_unmatched_invoices};

/// Per-run pipeline configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Run the secondary recovery stage against the detail registry
    pub recovery: bool,
    pub null_receipt_policy: NullReceiptPolicy,
}

/// The five/six pre-parsed source tables
#[derive(Debug, Clone, Default)]
pub struct PipelineInputs {
    pub receipts: Vec<RawReceiptRow>,
    pub invoice_links: Vec<RawInvoiceRow>,
    pub debtor_links: Vec<RawDebtorRow>,
    pub ledger: Vec<RawLedgerRow>,
    /// "Detalle de recibos"; required when recovery is on
    pub detail_registry: Option<Vec<RawDetailRow>>,
}

/// The four report sections plus the extended pipeline's third bucket
#[derive(Debug, Clone, Default)]
pub struct ReportBundle {
    /// "Indicador por Factura"
    pub aging: Vec<AgingRow>,
    /// "Detalle del Reporte" - every matched/recovered reconciled row
    pub detail: Vec<ReconciledRow>,
    /// "Asientos No Encontrados"
    pub entries_not_found: Vec<ReconciledRow>,
    /// "Facturas No Encontradas"
    pub invoices_not_found: Vec<ReconciledRow>,
    /// "Recibos No Explicados" - empty unless recovery ran
    pub receipts_unexplained: Vec<ReconciledRow>,
    /// Whether the secondary recovery stage ran; the exporter writes the
    /// third bucket's section exactly when it did, even if empty
    pub recovery_ran: bool,
}

impl ReportBundle {
    pub fn exception_count(&self) -> usize {
        self.entries_not_found.len() + self.invoices_not_found.len() + self.receipts_unexplained.len()
    }
}

/// Run the reconciliation pipeline end to end.
pub fn run(inputs: &PipelineInputs, options: &PipelineOptions) -> Result<ReportBundle, PipelineError> {
    info!("preprocesando datos");
    let receipts = normalize_receipts(&inputs.receipts, options.null_receipt_policy);
    let invoice_links = normalize_invoice_links(&inputs.invoice_links);
    let debtor_links = normalize_debtor_links(&inputs.debtor_links);
    let ledger = normalize_ledger(&inputs.ledger);

    info!("creando reporte base ({} recibos)", receipts.len());
    let base = match_base(&receipts, &debtor_links, &invoice_links);

    info!("procesando referencias del mayor ({} filas)", base.matched.len());
    let ledger_match = match_ledger_references(base.matched, &ledger);

    let mut detail = ledger_match.matched;
    let mut invoices_not_found = base.invoices_not_found;
    let mut entries_not_found = ledger_match.entries_not_found;
    let mut receipts_unexplained = Vec::new();

    if options.recovery {
        let registry_rows = inputs
            .detail_registry
            .as_ref()
            .ok_or(PipelineError::RecoveryWithoutRegistry)?;
        let registry = normalize_detail(registry_rows);

        info!(
            "recuperación secundaria: {} facturas, {} asientos pendientes",
            invoices_not_found.len(),
            entries_not_found.len()
        );

        // Recovery consumes the invoice bucket: what it cannot place becomes
        // the third, final bucket, never a duplicate of the first
        let invoices = recover_unmatched_invoices(invoices_not_found, &registry, &invoice_links);
        receipts_unexplained = invoices.still_unmatched;
        invoices_not_found = Vec::new();

        let entries = recover_unmatched_entries(entries_not_found, &registry);
        entries_not_found = entries.still_unmatched;

        detail.extend(invoices.recovered);
        detail.extend(entries.recovered);
    }

    info!("calculando días en calle sobre {} filas", detail.len());
    let aging = compute_aging(&detail);

    let bundle = ReportBundle {
        aging,
        detail,
        entries_not_found,
        invoices_not_found,
        receipts_unexplained,
        recovery_ran: options.recovery,
    };

    // Exception counts are the primary failure signature; surface them loudly
    if bundle.exception_count() > 0 {
        warn!(
            "excepciones: {} facturas no encontradas, {} asientos no encontrados, {} recibos no explicados",
            bundle.invoices_not_found.len(),
            bundle.entries_not_found.len(),
            bundle.receipts_unexplained.len()
        );
    }

    Ok(bundle)
}
