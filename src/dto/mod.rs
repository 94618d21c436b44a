pub mod api_response;
pub mod fuel_dto;
pub mod maintenance_dto;
pub mod mission_dto;
pub mod vehicle_dto;

pub use api_response::ApiResponse;
