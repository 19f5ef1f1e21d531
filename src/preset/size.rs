//! Storage sizing
//!
//! Sizes are Kubernetes quantities in whole gibibytes, e.g. `59Gi`.

/// Disk reserved for the OS, runtime and caches on top of the weights
pub const SYSTEM_DISK_OVERHEAD_GIB: u64 = 50;

const GIB: u64 = 1 << 30;

/// Weight size rounded up to whole GiB
pub fn model_file_size(total_bytes: u64) -> String {
    format_gib(total_bytes.div_ceil(GIB))
}

/// Disk needed for a model of the given size, overhead included.
///
/// An unparsable size counts as zero.
pub fn disk_storage_requirement(model_file_size: &str) -> String {
    let size = parse_gib(model_file_size).unwrap_or(0.0);
    format_gib(size.floor() as u64 + SYSTEM_DISK_OVERHEAD_GIB)
}

pub fn format_gib(gib: u64) -> String {
    format!("{}Gi", gib)
}

/// Numeric part of a `<N>Gi` quantity
pub fn parse_gib(quantity: &str) -> Option<f64> {
    quantity
        .trim()
        .strip_suffix("Gi")
        .and_then(|n| n.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite() && *n >= 0.0)
}
