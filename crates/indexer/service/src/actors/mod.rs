//! [`NodeActor`] services run by the [`crate::TxParserService`].

mod traits;
pub use traits::{CancellableContext, NodeActor};

mod scan;
pub use scan::{ScanActor, ScanActorError};
