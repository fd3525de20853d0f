//! Small text helpers shared with the workflows' own scripts.

pub mod script;
pub mod template;

pub use script::contains_arabic;
pub use template::render_template;
