pub mod form_sections;
pub mod handlers;
pub mod header;
pub mod results;
pub mod utils;
