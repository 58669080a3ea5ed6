//! Public library API for viewing PHP `serialize()` payloads.

/// Value model, decoder, visibility resolver, tree renderer, and JSON projection.
pub mod php;
