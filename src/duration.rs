//! Duration rounding and rendering.
//!
//! Every duration shown to the operator goes through [`format_duration`],
//! which renders the compact `1h2m3s` / `12.34s` / `340ms` form used by
//! most CI tooling rather than `Debug`'s `12.345678901s`.

use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Round `d` to the nearest multiple of `multiple`, halfway values rounding up.
///
/// A zero `multiple` returns `d` unchanged.
pub fn round(d: Duration, multiple: Duration) -> Duration {
    let m = multiple.as_nanos();
    if m == 0 {
        return d;
    }
    let n = d.as_nanos();
    let r = n % m;
    let rounded = if r + r < m { n - r } else { n + (m - r) };
    nanos_to_duration(rounded)
}

/// Render a duration as `[<h>h][<m>m]<s>[.<frac>]s`, or with a sub-second
/// unit (`ms`, `µs`, `ns`) when it is shorter than one second.
///
/// # Examples
///
/// ```
/// use actions_wait::duration::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::ZERO), "0s");
/// assert_eq!(format_duration(Duration::from_millis(340)), "340ms");
/// assert_eq!(format_duration(Duration::from_millis(12_340)), "12.34s");
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m5s");
/// assert_eq!(format_duration(Duration::from_secs(3605)), "1h0m5s");
/// ```
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_MICRO {
        return format!("{nanos}ns");
    }
    if nanos < NANOS_PER_MILLI {
        return format!("{}µs", with_fraction(nanos, NANOS_PER_MICRO));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", with_fraction(nanos, NANOS_PER_MILLI));
    }

    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs_nanos = u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(d.subsec_nanos());
    let secs = with_fraction(secs_nanos, NANOS_PER_SEC);

    if hours > 0 {
        format!("{hours}h{minutes}m{secs}s")
    } else if minutes > 0 {
        format!("{minutes}m{secs}s")
    } else {
        format!("{secs}s")
    }
}

/// `value / unit` as a decimal with trailing zeros removed.
fn with_fraction(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let frac = value % unit;
    if frac == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{frac:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

fn nanos_to_duration(nanos: u128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // Remainder of a division by 1e9 always fits in u32.
    let subsec = (nanos % NANOS_PER_SEC) as u32;
    Duration::new(secs, subsec)
}
