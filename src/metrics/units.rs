//! Value conversions shared by the emitter.

/// Convert optical power from milliwatts to dBm.
///
/// Non-positive input is not guarded: `0.0` gives negative infinity and
/// negative values give NaN.
pub fn milliwatts_to_dbm(mw: f64) -> f64 {
    10.0 * mw.log10()
}

/// Gauge value for a flag.
pub fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
