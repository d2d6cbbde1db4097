pub mod backend;
pub mod rpc;
