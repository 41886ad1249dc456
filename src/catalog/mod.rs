pub mod profiles;
pub mod selector;

pub use profiles::*;
pub use selector::*;
