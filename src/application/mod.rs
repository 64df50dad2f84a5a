// Application layer: the ledger service and the view adapter that drives it.
// Presentation (terminal, tests) plugs in through the `Presenter` trait.

pub mod error;
pub mod service;
pub mod view;

pub use error::*;
pub use service::*;
pub use view::*;
