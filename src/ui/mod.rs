//! Terminal output styling for the CLI subcommands.

mod theme;

pub use theme::Style;
