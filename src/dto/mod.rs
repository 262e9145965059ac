pub mod car_dto;
pub mod common_dto;
pub mod customer_dto;
pub mod image_dto;
pub mod ml_dto;
pub mod rental_dto;
