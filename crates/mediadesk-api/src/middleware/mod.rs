pub mod signature;

pub use signature::signature_middleware;
