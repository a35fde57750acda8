// Identity context: token verification only, no sessions
pub mod jwt;

pub use jwt::{Claims, JwtService};
