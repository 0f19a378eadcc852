pub mod check;
pub mod cleanup;
pub mod create;
pub mod watermark;
