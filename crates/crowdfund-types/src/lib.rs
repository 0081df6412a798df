pub mod campaign;
pub mod envelope;
pub mod errors;
pub mod intent;
pub mod ledger;

pub use campaign::*;
pub use envelope::*;
pub use errors::*;
pub use intent::*;
pub use ledger::*;
