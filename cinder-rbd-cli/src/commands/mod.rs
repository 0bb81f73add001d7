pub mod attach;
pub mod detach;
pub mod drivers;
pub mod format;
pub mod show;
