use crate::domain::catalog::Catalog;
use crate::domain::model::Car;
use crate::utils::error::Result;

/// Durable key-value slots holding text blobs.
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the whole slot. A concurrent or later `read` must observe
    /// either the previous value or the new one, never a partial write.
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Presentation layer notified by the listing engine.
pub trait View {
    fn render(&mut self, cars: &[Car], highlight: Option<usize>);
    fn notify(&mut self, message: &str, severity: Severity);
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn slot(&self) -> &str;
    fn catalog(&self) -> Catalog;
}
