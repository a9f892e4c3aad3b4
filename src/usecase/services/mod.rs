pub mod delete_service;
pub mod export_service;
pub mod view_engine;
