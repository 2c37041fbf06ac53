// CLI shell: load the CSV exports, run the pipeline, write the report.
// Exits non-zero on any error, with no partial output.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use dias_en_calle::{
    export_bundle, load_inputs, run, ExportOptions, NullReceiptPolicy, PipelineOptions,
};

#[derive(Parser, Debug)]
#[command(name = "dias-en-calle", version, about = "Reporte de días en calle por factura")]
struct Cli {
    /// Directory holding the source CSV exports
    #[arg(short, long, default_value = "./data")]
    input_dir: PathBuf,

    /// Directory the report sections are written to
    #[arg(short, long, default_value = "./reporte")]
    output_dir: PathBuf,

    /// Run the extended pipeline (secondary recovery via detalle de recibos)
    #[arg(long)]
    recovery: bool,

    /// Drop receipts whose reference never matched the REC pattern
    /// (legacy basic-pipeline behavior; default keeps them as exceptions)
    #[arg(long)]
    drop_unparsed_receipts: bool,

    /// Decimal places in the exported amounts
    #[arg(long, default_value_t = 2)]
    decimals: usize,

    /// chrono format string for the exported date columns
    #[arg(long, default_value = "%Y-%m-%d")]
    date_format: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("📊 Reporte de Días en Calle v{}", dias_en_calle::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Leyendo archivos de {}...", cli.input_dir.display());
    let inputs = load_inputs(&cli.input_dir, cli.recovery)?;
    println!(
        "✓ {} recibos, {} cobranzas por factura, {} deudores, {} líneas del mayor",
        inputs.receipts.len(),
        inputs.invoice_links.len(),
        inputs.debtor_links.len(),
        inputs.ledger.len()
    );

    let options = PipelineOptions {
        recovery: cli.recovery,
        null_receipt_policy: if cli.drop_unparsed_receipts {
            NullReceiptPolicy::Drop
        } else {
            NullReceiptPolicy::Keep
        },
    };

    println!("\n⚙️  Conciliando...");
    let bundle = run(&inputs, &options)?;
    println!(
        "✓ {} facturas en el indicador, {} filas de detalle",
        bundle.aging.len(),
        bundle.detail.len()
    );

    // Exception counts are the first thing to look at in every run
    println!("\n🔍 Excepciones:");
    println!("   Facturas no encontradas: {}", bundle.invoices_not_found.len());
    println!("   Asientos no encontrados: {}", bundle.entries_not_found.len());
    if cli.recovery {
        println!("   Recibos no explicados:   {}", bundle.receipts_unexplained.len());
    }

    std::fs::create_dir_all(&cli.output_dir)?;
    let export_options = ExportOptions {
        decimal_places: cli.decimals,
        date_format: cli.date_format.clone(),
    };
    export_bundle(&bundle, &cli.output_dir, &export_options)?;

    println!("\n💾 Reporte escrito en {}", cli.output_dir.display());
    Ok(())
}
