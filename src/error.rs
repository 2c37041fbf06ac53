// Pipeline error taxonomy. Malformed identifiers never error (they route to
// exception buckets); only real precondition violations surface here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Extended pipeline was requested without the detail-registry table
    #[error("el pipeline extendido requiere la tabla 'detalle de recibos'")]
    RecoveryWithoutRegistry,
}
