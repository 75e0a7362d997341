pub mod recovery;

pub use recovery::{recovery_layer, PanicResponder, RecoveryLayer};
