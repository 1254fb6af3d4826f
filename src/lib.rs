pub mod check;
pub mod config;
pub mod events;
pub mod gallery;
pub mod probe;
pub mod viewer;
pub mod tasks {
    pub mod autoplay;
}

pub use check::ExistenceCheck;
pub use gallery::{Gallery, ImageRef, ProbeResult};
pub use probe::{ProbeOptions, discover};
