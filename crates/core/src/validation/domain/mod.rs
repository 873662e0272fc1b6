pub mod frame_validator;
pub mod rejection;
pub mod smiling_validator;
pub mod validation_outcome;
