//! Label field extraction module.

mod parser;
pub mod rules;

pub use parser::LabelParser;
pub use rules::brand::BrandBoundary;
