//! US EPA Air Quality Index from particulate concentrations.
//!
//! Weather feeds report PM2.5 and PM10 in µg/m³. Each pollutant is mapped to
//! an index by linear interpolation inside its EPA breakpoint band; the
//! overall AQI is the worse of the two.

/// `(concentration_lo, concentration_hi, index_lo, index_hi)` bands.
type Breakpoint = (f64, f64, f64, f64);

const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 350.4, 301.0, 400.0),
    (350.5, 500.4, 401.0, 500.0),
];

const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    (0.0, 54.0, 0.0, 50.0),
    (55.0, 154.0, 51.0, 100.0),
    (155.0, 254.0, 101.0, 150.0),
    (255.0, 354.0, 151.0, 200.0),
    (355.0, 424.0, 201.0, 300.0),
    (425.0, 504.0, 301.0, 400.0),
    (505.0, 604.0, 401.0, 500.0),
];

fn interpolate(value: f64, (c_lo, c_hi, i_lo, i_hi): Breakpoint) -> f64 {
    (value - c_lo) * (i_hi - i_lo) / (c_hi - c_lo) + i_lo
}

/// Pick the first band whose upper bound covers `value`; beyond the table
/// the last band is extrapolated.
fn index_for(value: f64, table: &[Breakpoint; 7]) -> f64 {
    let band = table
        .iter()
        .find(|(_, c_hi, ..)| value <= *c_hi)
        .unwrap_or(&table[table.len() - 1]);
    interpolate(value, *band)
}

/// AQI sub-index for PM2.5 (µg/m³).
pub fn pm25_index(pm2_5: f64) -> f64 {
    index_for(pm2_5, &PM25_BREAKPOINTS)
}

/// AQI sub-index for PM10 (µg/m³).
pub fn pm10_index(pm10: f64) -> f64 {
    index_for(pm10, &PM10_BREAKPOINTS)
}

/// Combined US AQI, rounded to the nearest integer.
pub fn us_aqi(pm2_5: f64, pm10: f64) -> f64 {
    pm25_index(pm2_5).max(pm10_index(pm10)).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_air_is_zero() {
        assert_eq!(us_aqi(0.0, 0.0), 0.0);
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn band_edges_map_to_band_indices() {
        assert!(close(pm25_index(12.0), 50.0));
        assert!(close(pm25_index(35.4), 100.0));
        assert!(close(pm10_index(54.0), 50.0));
        assert!(close(pm10_index(154.0), 100.0));
    }

    #[test]
    fn worse_pollutant_wins() {
        // PM2.5 at 35.4 -> 100, PM10 at 254 -> 150.
        assert_eq!(us_aqi(35.4, 254.0), 150.0);
        assert_eq!(us_aqi(150.4, 10.0), 200.0);
    }

    #[test]
    fn result_is_rounded() {
        let aqi = us_aqi(20.0, 0.0);
        assert_eq!(aqi, aqi.round());
        assert!((67.0..=69.0).contains(&aqi));
    }

    #[test]
    fn off_the_chart_extrapolates_last_band() {
        assert!(pm25_index(600.0) > 500.0);
    }
}
