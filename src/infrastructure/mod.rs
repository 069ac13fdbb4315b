pub mod csv_io;
pub mod observability;
