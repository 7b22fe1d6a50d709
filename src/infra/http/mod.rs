pub mod middleware;
mod og;
mod public;

pub use public::{HttpState, build_router};
