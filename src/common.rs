mod assignment;
mod clause;
mod formula;
mod literal;

pub use assignment::*;
pub use clause::*;
pub use formula::*;
pub use literal::*;
