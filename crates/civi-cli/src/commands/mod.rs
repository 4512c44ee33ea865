pub mod choices;
pub mod count;
pub mod dispatch;
pub mod mapping;
pub mod replay;
pub mod resolve;
pub mod shared;
