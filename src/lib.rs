// Días en Calle - Core Library
// Reconciles collection receipts against invoices and the general ledger,
// and computes the payment-weighted days-outstanding indicator per invoice.

pub mod error;
pub mod records;
pub mod normalizer;
pub mod preprocess;
pub mod matcher;      // Base Matcher: receipts → asientos → facturas
pub mod ledger;       // Ledger Reference Matcher: Referencia + Haber
pub mod recovery;     // Secondary Recovery: detalle de recibos
pub mod aging;        // Días en calle calculator
pub mod pipeline;     // Unified entry point (basic + extended)
pub mod loader;       // CSV shell (external collaborator)
pub mod export;       // Report sections

// Re-export commonly used types
pub use error::PipelineError;
pub use records::{
    AgingRow, DebtorLink, DetailRecord, InvoiceLink, LedgerEntry, RawDebtorRow, RawDetailRow,
    RawInvoiceRow, RawLedgerRow, RawReceiptRow, Receipt, ReconciledRow,
};
pub use normalizer::{extract_invoice_number, extract_receipt_number};
pub use preprocess::{
    canonical_entry_id, normalize_debtor_links, normalize_detail, normalize_invoice_links,
    normalize_ledger, normalize_receipts, parse_date, NullReceiptPolicy,
};
pub use matcher::{match_base, BaseMatch};
pub use ledger::{match_ledger_references, LedgerMatch};
pub use recovery::{recover_unmatched_entries, recover_unmatched_invoices, RecoveryMatch};
pub use aging::compute_aging;
pub use pipeline::{run, PipelineInputs, PipelineOptions, ReportBundle};
pub use loader::{load_inputs, load_rows, SourceFormat};
pub use export::{export_bundle, ExportOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
