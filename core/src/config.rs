use std::path::Path;

/// Trait for building configuration structs
///
/// Implementors read the given file (and whatever layered sources they
/// support) and return a validated, read-only settings value.
pub trait ConfigBuilder: Sized + Clone + Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the configuration instance from the file at `path`.
    fn build(path: &Path) -> Result<Self, Self::Error>;
}
