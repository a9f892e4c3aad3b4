pub mod export;
pub mod record;
pub mod selection;
pub mod value;
pub mod view;
