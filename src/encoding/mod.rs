/*
    Module that bundles together the binary and text encodings
    shared by keys, scripts and addresses.
*/

pub mod base58;
pub mod bip276;
pub mod reader;
pub mod varint;

pub use reader::Reader;
