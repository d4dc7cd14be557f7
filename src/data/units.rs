//! GPU memory unit inference.
//!
//! Backends report VRAM either in bytes or in MiB and have switched between
//! the two without any version marker. The unit is guessed from magnitude:
//! no GPU has more than a million MiB, and no GPU has less than a million
//! bytes. This is an approximation, not a parse. A card reporting under
//! ~1 MB in bytes, or over ~976 GiB in MiB, would be misread.

/// Raw values strictly above this are bytes; values at or below are MiB.
pub const VRAM_BYTE_THRESHOLD: f64 = 1_000_000.0;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIB_PER_GIB: f64 = 1024.0;

/// The unit a raw VRAM value was inferred to be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VramUnit {
    Bytes,
    Mebibytes,
}

/// Guess the unit of a raw VRAM value.
pub fn infer_vram_unit(raw: f64, threshold: f64) -> VramUnit {
    if raw > threshold {
        VramUnit::Bytes
    } else {
        VramUnit::Mebibytes
    }
}

/// Convert a raw VRAM value to GiB using the inferred unit.
pub fn vram_to_gib(raw: f64, threshold: f64) -> f64 {
    match infer_vram_unit(raw, threshold) {
        VramUnit::Bytes => raw / BYTES_PER_GIB,
        VramUnit::Mebibytes => raw / MIB_PER_GIB,
    }
}
