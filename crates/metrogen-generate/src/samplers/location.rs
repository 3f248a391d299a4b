use metrogen_core::Location;

use crate::provider::FieldProvider;

const NOMINAL_MIN: f64 = 0.0;
const NOMINAL_MAX: f64 = 500.0;
const MEASURED_WINDOW: f64 = 1.0;
const TOLERANCE_MIN: f64 = -1.0;
const TOLERANCE_MAX: f64 = 1.0;
const PRECISION: u32 = 3;

/// Samples one nominal/measured/tolerance tuple.
///
/// The measured value lands within one unit of the nominal; the tolerance is
/// signed.
pub fn sample_location(provider: &mut dyn FieldProvider) -> Location {
    let name = provider.next_word();
    let nominal = provider.next_float(NOMINAL_MIN, NOMINAL_MAX, PRECISION);
    let measured = provider.next_float(
        nominal - MEASURED_WINDOW,
        nominal + MEASURED_WINDOW,
        PRECISION,
    );
    let tolerance = provider.next_float(TOLERANCE_MIN, TOLERANCE_MAX, PRECISION);
    Location::new(name, nominal, measured, tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::SeededFieldProvider;

    #[test]
    fn locations_keep_margin_invariants() {
        let mut provider = SeededFieldProvider::new(42);
        let mut out_of_tolerance = 0;
        for _ in 0..1_000 {
            let location = sample_location(&mut provider);
            assert!(location.o_tol >= 0.0);
            let expected = (location.deviation.abs() - location.tolerance.abs()).max(0.0);
            assert_eq!(location.o_tol, expected);
            assert_eq!(location.deviation, location.measured - location.nominal);
            assert!(location.deviation.abs() <= MEASURED_WINDOW + 1e-9);
            assert!((TOLERANCE_MIN..=TOLERANCE_MAX).contains(&location.tolerance));
            if location.is_out_of_tolerance() {
                out_of_tolerance += 1;
            }
        }
        assert!(out_of_tolerance > 0);
        assert!(out_of_tolerance < 1_000);
    }
}
