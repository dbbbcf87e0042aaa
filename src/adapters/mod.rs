// Adapters layer: concrete implementations of the domain ports.

#[cfg(feature = "cli")]
pub mod folder_prompt;
#[cfg(windows)]
pub mod publisher_com;
pub mod unsupported;

#[cfg(windows)]
pub use publisher_com::ComPublisherLauncher as DefaultLauncher;
#[cfg(not(windows))]
pub use unsupported::UnsupportedLauncher as DefaultLauncher;
