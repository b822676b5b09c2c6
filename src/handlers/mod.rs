pub mod cleanup;
pub mod creation;

pub use cleanup::ImageSweeper;
pub use creation::CreationHandler;
