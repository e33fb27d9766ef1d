// Adapters layer: concrete implementations of the domain ports.

pub mod storage;
pub mod terminal;

pub use storage::{LocalStorage, MemoryStorage};
pub use terminal::TerminalView;
