//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::StartupError;

/// Map domain/service errors to the single diagnostic line printed on stderr.
pub fn map_error(e: &StartupError) -> String {
    format!("preinit: {}", e)
}
