pub mod deleter;
pub mod exporter;
