pub mod capture;
pub mod detection;
pub mod session;
pub mod shared;
pub mod storage;
pub mod stream;
pub mod validation;
