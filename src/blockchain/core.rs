// core.rs splits ledger responsibilities into submodules.
pub mod chain;
pub mod lookup;
pub mod validation;

pub use chain::*;
pub use lookup::*;
pub use validation::*;
