pub mod alumni_service;
pub mod auth_service;
pub mod resource_service;
