//! Wire vocabulary shared by the watch face client and its controller.

pub mod domain;
pub mod error;
pub mod protocol;
