//! Conversions between storage rows and domain records

pub mod event;

pub use event::{
    collapse_status, combine_timestamp, expand_status, normalize_time, pack_metadata,
    read_metadata, to_domain, to_storage,
};
