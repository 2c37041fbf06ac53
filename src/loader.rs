// 📂 Loader - CSV exports of the source spreadsheets
// The core assumes well-typed tables; this shell owns file location, header
// skipping and parse errors. Skip counts are a property of each export
// format, centralized here instead of scattered across call sites.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::pipeline::PipelineInputs;
use crate::records::{RawDebtorRow, RawDetailRow, RawInvoiceRow, RawLedgerRow, RawReceiptRow};

/// Read parameters for one source export
#[derive(Debug, Clone, Copy)]
pub struct SourceFormat {
    pub name: &'static str,
    pub file_name: &'static str,
    /// Junk rows above the real header row
    pub skip_rows: usize,
}

pub const COBRANZA_POR_RECIBO: SourceFormat = SourceFormat {
    name: "Cobranza por Recibo",
    file_name: "cobranza_por_recibo.csv",
    skip_rows: 1,
};

pub const COBRANZA_POR_FACTURA: SourceFormat = SourceFormat {
    name: "Cobranza por Factura",
    file_name: "cobranza_por_factura.csv",
    skip_rows: 1,
};

pub const DEUDORES_POR_VENTAS: SourceFormat = SourceFormat {
    name: "Deudores por Ventas",
    file_name: "deudores_por_ventas.csv",
    skip_rows: 1,
};

/// The general ledger ships with two banner rows above the header
pub const MAYOR_DE_PPIS: SourceFormat = SourceFormat {
    name: "Mayor de PPIs",
    file_name: "mayor_de_ppis.csv",
    skip_rows: 2,
};

pub const DETALLE_DE_RECIBOS: SourceFormat = SourceFormat {
    name: "Detalle de Recibos",
    file_name: "detalle_de_recibos.csv",
    skip_rows: 1,
};

/// Load one source table, skipping its junk rows before the CSV header.
pub fn load_rows<T: DeserializeOwned>(path: &Path, format: &SourceFormat) -> Result<Vec<T>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} ({})", format.name, path.display()))?;
    let mut reader = BufReader::new(file);

    let mut discarded = String::new();
    for _ in 0..format.skip_rows {
        discarded.clear();
        reader
            .read_line(&mut discarded)
            .with_context(|| format!("Failed to skip header rows of {}", format.name))?;
    }

    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.with_context(|| format!("Failed to parse a row of {}", format.name))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Load every source table from one directory using the conventional names.
pub fn load_inputs(dir: &Path, with_registry: bool) -> Result<PipelineInputs> {
    let receipts: Vec<RawReceiptRow> =
        load_rows(&dir.join(COBRANZA_POR_RECIBO.file_name), &COBRANZA_POR_RECIBO)?;
    let invoice_links: Vec<RawInvoiceRow> =
        load_rows(&dir.join(COBRANZA_POR_FACTURA.file_name), &COBRANZA_POR_FACTURA)?;
    let debtor_links: Vec<RawDebtorRow> =
        load_rows(&dir.join(DEUDORES_POR_VENTAS.file_name), &DEUDORES_POR_VENTAS)?;
    let ledger: Vec<RawLedgerRow> =
        load_rows(&dir.join(MAYOR_DE_PPIS.file_name), &MAYOR_DE_PPIS)?;

    let detail_registry = if with_registry {
        let rows: Vec<RawDetailRow> =
            load_rows(&dir.join(DETALLE_DE_RECIBOS.file_name), &DETALLE_DE_RECIBOS)?;
        Some(rows)
    } else {
        None
    };

    Ok(PipelineInputs {
        receipts,
        invoice_links,
        debtor_links,
        ledger,
        detail_registry,
    })
}
