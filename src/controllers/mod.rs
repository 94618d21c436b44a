pub mod fuel_controller;
pub mod maintenance_controller;
pub mod mission_controller;
pub mod vehicle_controller;
