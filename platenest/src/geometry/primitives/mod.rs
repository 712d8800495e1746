mod edge;
mod point;
mod polygon;
mod rect;

#[doc(inline)]
pub use edge::Edge;
#[doc(inline)]
pub use point::Point;
#[doc(inline)]
pub use polygon::Polygon;
#[doc(inline)]
pub use rect::Rect;
