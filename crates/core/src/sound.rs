//! Approximate sound pressure level from an audio magnitude spectrum.
//!
//! Input is one frame of byte frequency magnitudes (0-255), as produced by a
//! typical FFT analyser. The conversion is deliberately rough: it is meant
//! for a dashboard gauge, not for calibrated measurement.

/// Quietest level the gauge reports.
pub const MIN_DB: f64 = 30.0;
/// Loudest level the gauge reports.
pub const MAX_DB: f64 = 130.0;

/// Offset that maps full-scale RMS to 90 dB.
const REFERENCE_OFFSET_DB: f64 = 90.0;

/// Convert a magnitude spectrum to decibels.
///
/// An empty frame means no microphone is attached and reads as `0.0`.
/// Otherwise the result is rounded and clamped to `[MIN_DB, MAX_DB]`.
pub fn decibels_from_spectrum(magnitudes: &[u8]) -> f64 {
    if magnitudes.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = magnitudes
        .iter()
        .map(|&m| f64::from(m) * f64::from(m))
        .sum();
    let rms = (sum_squares / magnitudes.len() as f64).sqrt();

    // log10(0) is -inf; the clamp below turns silence into MIN_DB.
    let db = 20.0 * (rms / 255.0).log10() + REFERENCE_OFFSET_DB;
    db.round().clamp(MIN_DB, MAX_DB)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_frame_reads_zero() {
        assert_eq!(decibels_from_spectrum(&[]), 0.0);
    }

    #[test]
    fn silence_clamps_to_floor() {
        assert_eq!(decibels_from_spectrum(&[0; 1024]), MIN_DB);
    }

    #[test]
    fn full_scale_reads_reference_level() {
        assert_eq!(decibels_from_spectrum(&[255; 1024]), 90.0);
    }

    #[test]
    fn louder_frames_read_higher() {
        let quiet = decibels_from_spectrum(&[40; 256]);
        let loud = decibels_from_spectrum(&[200; 256]);
        assert!(loud > quiet);
        assert!((MIN_DB..=MAX_DB).contains(&quiet));
    }
}
