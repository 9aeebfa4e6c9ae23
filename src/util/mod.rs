
/// Generic functionality for reading/writing serializable object to file
pub mod file_io;
