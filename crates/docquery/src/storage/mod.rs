//! Persistent storage for uploads

mod uploads;

pub use uploads::UploadStore;
