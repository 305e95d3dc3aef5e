//! Data acquisition: the HTTP source and row normalization.

pub mod covid;
pub mod normalize;

pub use covid::{CovidClient, DailySource, DEFAULT_URL};
pub use normalize::{Ingested, normalize, window};
