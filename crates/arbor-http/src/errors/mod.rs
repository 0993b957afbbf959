pub mod http_error;
pub mod procedure_error;
pub mod sink;

pub use http_error::*;
pub use procedure_error::*;
pub use sink::*;
