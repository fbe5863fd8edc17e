//! Display formatting (pt-BR conventions)

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

const PT_BR_DATETIME: &str = "%d/%m/%Y, %H:%M:%S";

/// Format an ISO-8601 timestamp in local time; unparseable input is returned as-is
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Format an ISO-8601 timestamp in the given zone
pub fn format_timestamp_in<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(tz).format(PT_BR_DATETIME).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// `65 km/h`
pub fn format_speed(speed: f64) -> String {
    format!("{} km/h", speed)
}

/// Driver name or the "not informed" placeholder
pub fn driver_label(driver: Option<&str>) -> &str {
    match driver {
        Some(name) if !name.trim().is_empty() => name,
        _ => "Não informado",
    }
}

/// `Total: N veículos`
pub fn vehicle_count(count: usize) -> String {
    format!("Total: {} veículos", count)
}

/// `Atualização automática a cada 2 minutos`
pub fn refresh_interval_label(interval: Duration) -> String {
    let secs = interval.as_secs();
    let every = match secs {
        60 => "1 minuto".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutos", s / 60),
        1 => "1 segundo".to_string(),
        s => format!("{} segundos", s),
    };
    format!("Atualização automática a cada {}", every)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_timestamp_utc() {
        assert_eq!(
            format_timestamp_in("2023-05-05T10:30:00Z", &Utc),
            "05/05/2023, 10:30:00"
        );
    }

    #[test]
    fn test_format_timestamp_brasilia() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in("2023-05-05T10:30:00.000Z", &brt),
            "05/05/2023, 07:30:00"
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_kept() {
        assert_eq!(format_timestamp("ontem"), "ontem");
    }

    #[test]
    fn test_speed() {
        assert_eq!(format_speed(65.0), "65 km/h");
        assert_eq!(format_speed(0.0), "0 km/h");
        assert_eq!(format_speed(42.5), "42.5 km/h");
    }

    #[test]
    fn test_driver_label() {
        assert_eq!(driver_label(Some("Ana Costa")), "Ana Costa");
        assert_eq!(driver_label(Some("")), "Não informado");
        assert_eq!(driver_label(None), "Não informado");
    }

    #[test]
    fn test_refresh_interval_label() {
        assert_eq!(
            refresh_interval_label(Duration::from_secs(120)),
            "Atualização automática a cada 2 minutos"
        );
        assert_eq!(
            refresh_interval_label(Duration::from_secs(60)),
            "Atualização automática a cada 1 minuto"
        );
        assert_eq!(
            refresh_interval_label(Duration::from_secs(90)),
            "Atualização automática a cada 90 segundos"
        );
    }
}
