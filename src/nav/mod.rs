//! Navigation - menu definition, component registry, route composition
//!
//! The menu is declarative data; the composer evaluates it against a session
//! gate and produces the serializable route table the console shell renders.

pub mod components;
pub mod composer;
pub mod menu;

pub use components::{Component, ComponentRegistry};
pub use composer::{compose, Gate, RouteEntry, RouteOutcome, RouteTable};
pub use menu::{MenuChild, MenuItem, OutsideArea, OutsideRoute, MAIN_MENU, OUTSIDE_AREAS};
