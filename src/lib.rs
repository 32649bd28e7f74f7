pub mod aggregate;
pub mod fetch;
pub mod geometry;
pub mod labels;
pub mod normalize;
pub mod output;
pub mod parser;
