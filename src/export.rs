// 💾 Export - the four report sections as CSV files
// Formatting is per-run configuration handed to the writer, never
// process-global display state. Section names match the legacy workbook.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::pipeline::ReportBundle;
use crate::records::{AgingRow, ReconciledRow};

/// Per-run output formatting
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub decimal_places: usize,
    /// chrono format string for every exported date column
    pub date_format: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            decimal_places: 2,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

pub const INDICADOR_POR_FACTURA: &str = "indicador_por_factura.csv";
pub const DETALLE_DEL_REPORTE: &str = "detalle_del_reporte.csv";
pub const ASIENTOS_NO_ENCONTRADOS: &str = "asientos_no_encontrados.csv";
pub const FACTURAS_NO_ENCONTRADAS: &str = "facturas_no_encontradas.csv";
pub const RECIBOS_NO_EXPLICADOS: &str = "recibos_no_explicados.csv";

/// Write all sections of the bundle into `dir`.
///
/// The third bucket's section is written whenever the recovery stage ran,
/// empty or not, so an extended run is always distinguishable from a basic
/// one; a basic run leaves exactly the four legacy sections.
pub fn export_bundle(bundle: &ReportBundle, dir: &Path, options: &ExportOptions) -> Result<()> {
    write_aging(&bundle.aging, &dir.join(INDICADOR_POR_FACTURA), options)?;
    write_detail(&bundle.detail, &dir.join(DETALLE_DEL_REPORTE), options)?;
    write_detail(
        &bundle.entries_not_found,
        &dir.join(ASIENTOS_NO_ENCONTRADOS),
        options,
    )?;
    write_detail(
        &bundle.invoices_not_found,
        &dir.join(FACTURAS_NO_ENCONTRADAS),
        options,
    )?;
    if bundle.recovery_ran {
        write_detail(
            &bundle.receipts_unexplained,
            &dir.join(RECIBOS_NO_EXPLICADOS),
            options,
        )?;
    }
    Ok(())
}

fn fmt_money(value: f64, options: &ExportOptions) -> String {
    format!("{:.*}", options.decimal_places, value)
}

fn fmt_opt_money(value: Option<f64>, options: &ExportOptions) -> String {
    value.map(|v| fmt_money(v, options)).unwrap_or_default()
}

fn fmt_date(value: Option<NaiveDate>, options: &ExportOptions) -> String {
    value
        .map(|d| d.format(&options.date_format).to_string())
        .unwrap_or_default()
}

fn write_aging(rows: &[AgingRow], path: &Path, options: &ExportOptions) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "Nombre",
        "nro_recibo",
        "Haber",
        "Pago",
        "Asiento",
        "nro_factura",
        "Referencia",
        "cantidad_de_dias_en_calle",
        "control_pago_total",
    ])?;

    for row in rows {
        let haber = fmt_money(row.total_credit, options);
        let pago = fmt_money(row.total_payment, options);
        let dias = fmt_money(row.days_outstanding, options);
        let control = fmt_money(row.payment_reconciliation_delta, options);
        writer.write_record([
            row.customer_name.as_str(),
            row.receipt_id.as_str(),
            haber.as_str(),
            pago.as_str(),
            row.accounting_entry_id.as_str(),
            row.invoice_id.as_str(),
            row.reference_id.as_str(),
            dias.as_str(),
            control.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn write_detail(rows: &[ReconciledRow], path: &Path, options: &ExportOptions) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "Nombre",
        "Interno",
        "nro_recibo",
        "Pago",
        "Asiento",
        "nro_factura",
        "FechaFactura",
        "Cuenta",
        "Referencia",
        "Fecha",
        "Haber",
        "Fecha Comp.",
        "Fecha del Valor",
    ])?;

    for row in rows {
        let interno = row.internal_id.to_string();
        let pago = fmt_money(row.payment_amount, options);
        let fecha_factura = fmt_date(row.invoice_date, options);
        let fecha = fmt_date(row.realized_date, options);
        let haber = fmt_opt_money(row.credit_amount, options);
        let fecha_comp = fmt_date(row.posting_date, options);
        let fecha_valor = fmt_date(row.value_date, options);
        writer.write_record([
            row.customer_name.as_str(),
            interno.as_str(),
            row.receipt_id.as_deref().unwrap_or_default(),
            pago.as_str(),
            row.accounting_entry_id.as_deref().unwrap_or_default(),
            row.invoice_id.as_deref().unwrap_or_default(),
            fecha_factura.as_str(),
            row.account_name.as_deref().unwrap_or_default(),
            row.reference_id.as_deref().unwrap_or_default(),
            fecha.as_str(),
            haber.as_str(),
            fecha_comp.as_str(),
            fecha_valor.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{run, PipelineInputs, PipelineOptions};
    use crate::records::{RawDebtorRow, RawInvoiceRow, RawLedgerRow, RawReceiptRow};

    fn inputs() -> PipelineInputs {
        PipelineInputs {
            receipts: vec![RawReceiptRow {
                interno: 7,
                nombre: "Acme".to_string(),
                recibo: "REC-1002".to_string(),
                pago: 500.0,
            }],
            invoice_links: vec![RawInvoiceRow {
                comprobante: "REC-1002".to_string(),
                factura: "__INV-0007".to_string(),
                fecha_factura: "2024-01-10".to_string(),
            }],
            debtor_links: vec![RawDebtorRow {
                comprobante_relacionado: "REC-1002".to_string(),
                asiento: "E55".to_string(),
            }],
            ledger: vec![RawLedgerRow {
                asiento: "E55".to_string(),
                cuenta: "Banco".to_string(),
                referencia: "R9".to_string(),
                fecha: "2024-01-20".to_string(),
                debe: None,
                haber: Some(500.0),
            }],
            detail_registry: None,
        }
    }

    fn bundle() -> ReportBundle {
        run(&inputs(), &PipelineOptions::default()).unwrap()
    }

    #[test]
    fn writes_the_four_basic_sections() {
        let dir = tempfile::tempdir().unwrap();
        export_bundle(&bundle(), dir.path(), &ExportOptions::default()).unwrap();

        assert!(dir.path().join(INDICADOR_POR_FACTURA).exists());
        assert!(dir.path().join(DETALLE_DEL_REPORTE).exists());
        assert!(dir.path().join(ASIENTOS_NO_ENCONTRADOS).exists());
        assert!(dir.path().join(FACTURAS_NO_ENCONTRADAS).exists());
        assert!(!dir.path().join(RECIBOS_NO_EXPLICADOS).exists());
    }

    #[test]
    fn extended_run_always_writes_the_fifth_section() {
        // Even with zero unexplained receipts, an extended run must be
        // distinguishable from a basic one in the output directory
        let mut input = inputs();
        input.detail_registry = Some(Vec::new());
        let options = PipelineOptions {
            recovery: true,
            ..Default::default()
        };
        let extended = run(&input, &options).unwrap();
        assert!(extended.receipts_unexplained.is_empty());

        let dir = tempfile::tempdir().unwrap();
        export_bundle(&extended, dir.path(), &ExportOptions::default()).unwrap();
        assert!(dir.path().join(RECIBOS_NO_EXPLICADOS).exists());
    }

    #[test]
    fn aging_section_respects_format_options() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            decimal_places: 1,
            date_format: "%d/%m/%Y".to_string(),
        };
        export_bundle(&bundle(), dir.path(), &options).unwrap();

        let aging = std::fs::read_to_string(dir.path().join(INDICADOR_POR_FACTURA)).unwrap();
        assert!(aging.contains("INV-0007"));
        assert!(aging.contains("10.0")); // días en calle at one decimal
        assert!(aging.contains("500.0"));

        let detail = std::fs::read_to_string(dir.path().join(DETALLE_DEL_REPORTE)).unwrap();
        assert!(detail.contains("20/01/2024"));
        assert!(detail.contains("10/01/2024"));
    }
}
