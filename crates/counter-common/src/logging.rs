#[cfg(not(feature = "logging"))]
#[allow(unused)]
pub mod log {
    #[macro_export]
    macro_rules! debug { ($($t:tt)*) => {} }
    #[macro_export]
    macro_rules! warn { ($($t:tt)*) => {} }
}

#[cfg(feature = "logging")]
pub mod log {
    pub use tracing::{debug, warn};
}
