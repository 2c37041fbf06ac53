// 📋 Row Schemas - Typed records for every source table
// Raw rows mirror the spreadsheet exports column-for-column; normalized
// records carry the extracted identifiers the joins run on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// RAW INPUT ROWS (as exported, Spanish column headers)
// ============================================================================

/// Row of "cobranza por recibo" - one payment receipt per row
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawReceiptRow {
    /// Internal numeric id of the receipt (join key for the detail registry)
    #[serde(rename = "Interno")]
    pub interno: i64,

    #[serde(rename = "Nombre")]
    pub nombre: String,

    /// Free-text reference, e.g. "REC - 1002 Acme SA"
    #[serde(rename = "Recibo")]
    pub recibo: String,

    #[serde(rename = "Pago")]
    pub pago: f64,
}

/// Row of "cobranza por factura" - links a receipt reference to the invoice it pays
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawInvoiceRow {
    /// Free-text receipt reference ("Comprobante")
    #[serde(rename = "Comprobante")]
    pub comprobante: String,

    /// Positional invoice string; the invoice number lives at a fixed offset
    #[serde(rename = "Factura")]
    pub factura: String,

    #[serde(rename = "FechaFactura")]
    pub fecha_factura: String,
}

/// Row of "deudores por ventas" - maps a receipt reference to its journal entry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDebtorRow {
    #[serde(rename = "Compr.Rel.")]
    pub comprobante_relacionado: String,

    /// Journal entry id; numeric in some exports, text in others
    #[serde(rename = "Asiento")]
    pub asiento: String,
}

/// Row of "mayor de PPIs" - the general ledger, source of truth for realized money
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLedgerRow {
    #[serde(rename = "Asiento")]
    pub asiento: String,

    #[serde(rename = "Cuenta")]
    pub cuenta: String,

    #[serde(rename = "Referencia")]
    pub referencia: String,

    #[serde(rename = "Fecha")]
    pub fecha: String,

    #[serde(rename = "Debe")]
    pub debe: Option<f64>,

    /// Credit amount (Haber). Only rows with a value here are settlement events.
    #[serde(rename = "Haber")]
    pub haber: Option<f64>,
}

/// Row of "detalle de recibos" - the detailed receipt registry (extended pipeline)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawDetailRow {
    /// Internal numeric receipt id ("Recibo" holds the interno here, not free text)
    #[serde(rename = "Recibo")]
    pub recibo: i64,

    #[serde(rename = "Nombre")]
    pub nombre: String,

    #[serde(rename = "Pago")]
    pub pago: f64,

    #[serde(rename = "Fecha Comp.")]
    pub fecha_comprobante: String,

    #[serde(rename = "Fecha del Valor")]
    pub fecha_del_valor: String,

    #[serde(rename = "Factura")]
    pub factura: String,
}

// ============================================================================
// NORMALIZED RECORDS (after identifier extraction and key coercion)
// ============================================================================

/// Payment receipt with its extracted receipt number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub internal_id: i64,
    pub customer_name: String,
    /// None when the raw reference did not match the REC pattern
    pub receipt_id: Option<String>,
    pub payment_amount: f64,
    pub raw_reference: String,
}

/// Receipt → invoice link, with the sliced invoice number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLink {
    pub receipt_id: Option<String>,
    pub invoice_id: String,
    pub invoice_date: Option<NaiveDate>,
}

/// Receipt → journal entry link ("deudores por ventas", projected)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtorLink {
    pub receipt_id: Option<String>,
    pub accounting_entry_id: String,
}

/// One general-ledger posting line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub accounting_entry_id: Option<String>,
    pub account_name: String,
    pub reference_id: Option<String>,
    pub realized_date: Option<NaiveDate>,
    pub credit_amount: Option<f64>,
    pub debit_amount: Option<f64>,
}

/// Detail-registry record keyed by the internal receipt id (extended pipeline)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub internal_receipt_id: i64,
    pub customer_name: String,
    pub payment_amount: f64,
    pub posting_date: Option<NaiveDate>,
    pub value_date: Option<NaiveDate>,
    pub invoice_id: String,
}

// ============================================================================
// RECONCILED ROW - the working unit threaded through all matchers
// ============================================================================

/// Left-biased accumulation of receipt + link + ledger columns.
///
/// A row is complete only once it carries an invoice, a ledger reference and a
/// credit amount; until then it belongs in an exception bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRow {
    #[serde(rename = "Nombre")]
    pub customer_name: String,

    #[serde(rename = "Interno")]
    pub internal_id: i64,

    #[serde(rename = "nro_recibo")]
    pub receipt_id: Option<String>,

    #[serde(rename = "Pago")]
    pub payment_amount: f64,

    #[serde(rename = "Asiento")]
    pub accounting_entry_id: Option<String>,

    #[serde(rename = "nro_factura")]
    pub invoice_id: Option<String>,

    #[serde(rename = "FechaFactura")]
    pub invoice_date: Option<NaiveDate>,

    #[serde(rename = "Cuenta")]
    pub account_name: Option<String>,

    #[serde(rename = "Referencia")]
    pub reference_id: Option<String>,

    /// Date the money was actually realized (ledger Fecha, or Fecha del Valor
    /// when the row was recovered through the detail registry)
    #[serde(rename = "Fecha")]
    pub realized_date: Option<NaiveDate>,

    #[serde(rename = "Haber")]
    pub credit_amount: Option<f64>,

    /// Posting date attached by the secondary recovery stage only
    #[serde(rename = "Fecha Comp.")]
    pub posting_date: Option<NaiveDate>,

    /// Value date attached by the secondary recovery stage only
    #[serde(rename = "Fecha del Valor")]
    pub value_date: Option<NaiveDate>,
}

impl ReconciledRow {
    /// Build the initial row from a receipt, before any join has run
    pub fn from_receipt(receipt: &Receipt) -> Self {
        ReconciledRow {
            customer_name: receipt.customer_name.clone(),
            internal_id: receipt.internal_id,
            receipt_id: receipt.receipt_id.clone(),
            payment_amount: receipt.payment_amount,
            accounting_entry_id: None,
            invoice_id: None,
            invoice_date: None,
            account_name: None,
            reference_id: None,
            realized_date: None,
            credit_amount: None,
            posting_date: None,
            value_date: None,
        }
    }

    /// True once invoice, reference and credit are all attached
    pub fn is_complete(&self) -> bool {
        self.invoice_id.is_some() && self.reference_id.is_some() && self.credit_amount.is_some()
    }
}

// ============================================================================
// AGING RESULT - one row per invoice ("Indicador por Factura")
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingRow {
    #[serde(rename = "Nombre")]
    pub customer_name: String,

    #[serde(rename = "nro_recibo")]
    pub receipt_id: String,

    /// Sum of credit amounts across all ledger lines of this invoice
    #[serde(rename = "Haber")]
    pub total_credit: f64,

    /// Sum of payments over the distinct receipts of this invoice
    #[serde(rename = "Pago")]
    pub total_payment: f64,

    #[serde(rename = "Asiento")]
    pub accounting_entry_id: String,

    #[serde(rename = "nro_factura")]
    pub invoice_id: String,

    #[serde(rename = "Referencia")]
    pub reference_id: String,

    /// Payment-weighted average days between invoice date and realization
    #[serde(rename = "cantidad_de_dias_en_calle")]
    pub days_outstanding: f64,

    /// Control figure: total_payment - total_credit, near zero when reconciled
    #[serde(rename = "control_pago_total")]
    pub payment_reconciliation_delta: f64,
}
