//! Map overlay construction: polyline decoding and route shape assembly.

pub mod polyline;
pub mod shapes;
