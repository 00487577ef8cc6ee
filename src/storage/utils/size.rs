// Byte counts as shown next to the quota
const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Render `bytes` with a binary unit and one decimal, e.g. `1.5 KiB`.
pub fn format_size(bytes: u64) -> String {
    let bits = u64::BITS - bytes.leading_zeros();
    let unit = ((bits.saturating_sub(1) / 10) as usize).min(UNITS.len() - 1);
    if unit == 0 {
        return format!("{bytes} B");
    }
    let scaled = bytes as f64 / (1u64 << (10 * unit)) as f64;
    format!("{scaled:.1} {}", UNITS[unit])
}

/// Share of the quota in use, as a whole percentage.
pub fn usage_percent(used: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    ((used as u128 * 100) / total as u128) as u64
}
