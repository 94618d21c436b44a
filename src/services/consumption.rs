//! Cálculo de estadísticas de consumo
//!
//! Función pura: a partir del repostaje nuevo y del último repostaje
//! registrado del mismo vehículo obtiene distancia recorrida, consumo
//! (L/100 km), coste por km y la alerta de consumo anómalo.

use crate::models::fuel::ConsumptionStats;

/// Umbral fijo de consumo anómalo, en L/100 km (estricto: `> 12.0`)
pub const HIGH_CONSUMPTION_THRESHOLD: f64 = 12.0;
pub const HIGH_CONSUMPTION_MESSAGE: &str = "abnormally high consumption detected";

/// Magnitudes del repostaje que intervienen en el cálculo
#[derive(Debug, Clone, Copy)]
pub struct Refuel {
    pub quantity: f64,
    pub total_amount: f64,
    pub odometer: f64,
}

/// Calcula las estadísticas respecto al odómetro del repostaje anterior.
///
/// Sin repostaje anterior (primer lleno) el resultado es vacío. Si el
/// odómetro no avanzó (`distance <= 0`) también se devuelve vacío en lugar
/// de dividir por cero o producir valores negativos.
pub fn compute_stats(current: Refuel, previous_odometer: Option<f64>) -> ConsumptionStats {
    let Some(previous_odometer) = previous_odometer else {
        return ConsumptionStats::empty();
    };

    let distance = current.odometer - previous_odometer;
    if distance.is_nan() || distance <= 0.0 {
        tracing::warn!(
            "Odómetro sin avance ({} -> {}), estadísticas no calculables",
            previous_odometer,
            current.odometer
        );
        return ConsumptionStats::empty();
    }

    let average_consumption = (current.quantity * 100.0) / distance;
    let cost_per_distance = current.total_amount / distance;
    let anomaly = average_consumption > HIGH_CONSUMPTION_THRESHOLD;

    ConsumptionStats {
        average_consumption,
        distance_traveled: distance,
        cost_per_distance,
        anomaly,
        anomaly_message: anomaly.then(|| HIGH_CONSUMPTION_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refuel(quantity: f64, total_amount: f64, odometer: f64) -> Refuel {
        Refuel {
            quantity,
            total_amount,
            odometer,
        }
    }

    #[test]
    fn test_first_fill_up_is_empty() {
        let stats = compute_stats(refuel(40.0, 72.0, 10000.0), None);
        assert_eq!(stats, ConsumptionStats::empty());
        assert_eq!(stats.distance_traveled, 0.0);
        assert_eq!(stats.average_consumption, 0.0);
        assert!(!stats.anomaly);
    }

    #[test]
    fn test_normal_consumption() {
        let stats = compute_stats(refuel(40.0, 80.0, 10500.0), Some(10000.0));
        assert_eq!(stats.distance_traveled, 500.0);
        assert_eq!(stats.average_consumption, 8.0);
        assert!((stats.cost_per_distance - 0.16).abs() < 1e-9);
        assert!(!stats.anomaly);
        assert!(stats.anomaly_message.is_none());
    }

    #[test]
    fn test_high_consumption_raises_anomaly() {
        let stats = compute_stats(refuel(70.0, 140.0, 10500.0), Some(10000.0));
        assert_eq!(stats.average_consumption, 14.0);
        assert!(stats.anomaly);
        assert_eq!(stats.anomaly_message.as_deref(), Some(HIGH_CONSUMPTION_MESSAGE));
    }

    #[test]
    fn test_threshold_is_strict() {
        // 60 L sobre 500 km = 12.0 exactos: no es anomalía
        let stats = compute_stats(refuel(60.0, 100.0, 10500.0), Some(10000.0));
        assert_eq!(stats.average_consumption, 12.0);
        assert!(!stats.anomaly);
    }

    #[test]
    fn test_odometer_not_advancing_yields_empty_stats() {
        let same = compute_stats(refuel(40.0, 80.0, 10000.0), Some(10000.0));
        assert_eq!(same, ConsumptionStats::empty());

        let backwards = compute_stats(refuel(40.0, 80.0, 9000.0), Some(10000.0));
        assert_eq!(backwards, ConsumptionStats::empty());
    }
}
