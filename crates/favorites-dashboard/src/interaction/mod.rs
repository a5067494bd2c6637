//! Pointer interaction state machines used by the grid.
//!
//! Each machine is plain data. The grid drives them from UI events and
//! applies their outcomes to the view; timers live in the controller.

pub mod drag;
pub mod dropdown;
pub mod long_press;
pub mod rename;

pub use drag::{DragState, TargetChange};
pub use dropdown::{DropdownKind, DropdownRef, Dropdowns};
pub use long_press::{LongPress, PressPhase};
pub use rename::RenameModal;
