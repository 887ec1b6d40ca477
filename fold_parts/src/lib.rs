//! Named, nested collections of display geometry for mirror setups, and the
//! seams through which they reach a viewer or a file.

mod assembly;
mod display;
mod export;
mod shape;

pub use assembly::*;
pub use display::*;
pub use export::*;
pub use shape::*;

use fold::*;
use std::error::Error;
