pub mod connection;
pub mod process;
pub mod python;

pub use connection::{ConnectionError, ConnectionManager, OdbcCatalog};
pub use process::SystemLauncher;
pub use python::PythonToolchain;
