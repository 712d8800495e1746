mod part;
mod plate;

#[doc(inline)]
pub use part::Part;
#[doc(inline)]
pub use part::Placement;
#[doc(inline)]
pub use part::PlacementState;
#[doc(inline)]
pub use plate::Plate;
