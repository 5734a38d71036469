// Path Planning: bidirectional RRT-Connect with dynamic-domain sampling

pub mod config;
pub mod sampler;
pub mod tree;
pub mod dynamic_domain;
pub mod nearest;
pub mod rrt_connect;
pub mod plan_system;

pub use config::*;
pub use sampler::*;
pub use tree::*;
pub use dynamic_domain::*;
pub use nearest::*;
pub use rrt_connect::*;
pub use plan_system::*;
