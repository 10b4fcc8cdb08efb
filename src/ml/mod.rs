pub mod encoding;

pub use encoding::{depth_schema, encode_trees, EncodedValue, TreeEncoders, TypeEncoder, ValueEncoders};
