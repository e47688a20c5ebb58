mod atomic;
mod identity;
mod interface;
mod lock;
mod mutex;
mod status;

pub use atomic::*;
pub(crate) use identity::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use status::*;
