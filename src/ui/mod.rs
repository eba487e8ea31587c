pub mod console;
pub mod display;
pub mod palette;

pub use console::Console;
pub use display::print_error;
