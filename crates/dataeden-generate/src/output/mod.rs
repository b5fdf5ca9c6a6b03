pub mod csv;

pub use self::csv::{write_grid, write_grid_csv};
