//! Utilidades de validación
//!
//! Funciones helper usadas por los DTOs (`#[validate(custom = ...)]`)
//! y por los controladores.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::utils::errors::{AppError, AppResult};

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Variante para `#[validate(custom)]` sobre lecturas de odómetro
pub fn validate_odometer(value: f64) -> Result<(), ValidationError> {
    if value.is_nan() {
        return Err(ValidationError::new("odometer_nan"));
    }
    validate_non_negative(value)
}

/// Importes monetarios (bonos, tope de tarjeta)
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Validar formato de matrícula de vehículo
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    // Formato básico: AB-123-CD o similar
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.len() < 5 || clean_plate.len() > 10 {
        let mut error = ValidationError::new("license_plate");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Verificar que un periodo de consulta esté bien formado (`from <= to`)
pub fn validate_period(from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<()> {
    if from > to {
        return Err(AppError::BadRequest(format!(
            "period start {} is after period end {}",
            from.to_rfc3339(),
            to.to_rfc3339()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("BON-001").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(0.0).is_ok());
        assert!(validate_non_negative(10500.0).is_ok());
        assert!(validate_non_negative(-1.0).is_err());
    }

    #[test]
    fn test_validate_odometer() {
        assert!(validate_odometer(12.5).is_ok());
        assert!(validate_odometer(f64::NAN).is_err());
        assert!(validate_odometer(-0.5).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(&Decimal::new(5000, 2)).is_ok());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("AB-123-CD").is_ok());
        assert!(validate_license_plate("A").is_err());
        assert!(validate_license_plate("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_validate_period() {
        let now = Utc::now();
        assert!(validate_period(now, now).is_ok());
        assert!(validate_period(now - Duration::days(1), now).is_ok());
        assert!(validate_period(now, now - Duration::seconds(1)).is_err());
    }
}
