//! Graph algorithms: the shortest-path-tree oracle, congestion
//! computations, the multiplicative-weights driver, and cut extraction.
mod congestion;
pub use self::congestion::*;
mod cuts;
pub use self::cuts::*;
mod mwu;
pub use self::mwu::*;
mod spt;
pub use self::spt::*;
