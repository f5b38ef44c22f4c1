//! Display strings for telemetry values.

pub fn format_latitude(lat: f64) -> String {
    let hemisphere = if lat < 0.0 { 'S' } else { 'N' };
    format!("{:.2}° {hemisphere}", lat.abs())
}

pub fn format_longitude(lon: f64) -> String {
    let hemisphere = if lon < 0.0 { 'W' } else { 'E' };
    format!("{:.2}° {hemisphere}", lon.abs())
}

pub fn format_altitude(alt_km: f64) -> String {
    format!("{alt_km:.1} km")
}

/// Motor angle reduced to `[0, 360)` with one decimal.
pub fn format_motor_angle(degrees: f64) -> String {
    let tenths = (degrees * 10.0).round().rem_euclid(3600.0);
    format!("{:.1}°", tenths / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latitude_uses_hemisphere_suffix() {
        assert_eq!(format_latitude(51.6012), "51.60° N");
        assert_eq!(format_latitude(-33.8688), "33.87° S");
        assert_eq!(format_latitude(0.0), "0.00° N");
    }

    #[test]
    fn longitude_uses_hemisphere_suffix() {
        assert_eq!(format_longitude(-0.1276), "0.13° W");
        assert_eq!(format_longitude(151.2093), "151.21° E");
    }

    #[test]
    fn altitude_has_one_decimal_and_unit() {
        assert_eq!(format_altitude(418.26), "418.3 km");
        assert_eq!(format_altitude(35786.0), "35786.0 km");
    }

    #[test]
    fn motor_angle_wraps_into_one_turn() {
        assert_eq!(format_motor_angle(370.5), "10.5°");
        assert_eq!(format_motor_angle(720.0), "0.0°");
        assert_eq!(format_motor_angle(-10.0), "350.0°");
        assert_eq!(format_motor_angle(359.96), "0.0°");
    }
}
