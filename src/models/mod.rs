//! Modelos del sistema
//!
//! Entidades del parque: misiones, repostajes, bonos, tarjetas, vehículos
//! y mantenimientos. Las asociaciones se guardan como ids (`Uuid`), nunca
//! como grafos de objetos.

pub mod fuel;
pub mod maintenance;
pub mod mission;
pub mod vehicle;

pub use fuel::*;
pub use maintenance::*;
pub use mission::*;
pub use vehicle::*;
