mod actor;
pub use actor::ScanActor;

mod error;
pub use error::ScanActorError;
