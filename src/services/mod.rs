//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación. Los servicios
//! reciben los repositorios como `Arc<dyn ...>` y no conocen la capa HTTP.

pub mod consumption;
pub mod fuel_service;
pub mod maintenance_service;
pub mod mission_service;
pub mod mission_transitions;
pub mod vehicle_service;

pub use fuel_service::FuelService;
pub use maintenance_service::MaintenanceService;
pub use mission_service::MissionService;
pub use mission_transitions::{MissionCommand, TransitionPolicy};
pub use vehicle_service::VehicleService;
