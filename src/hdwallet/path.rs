/*
    This module helps with parsing derivation paths passed in as strings
    as vectors of ChildIndex that can be used to derive a child key.

    Syntax: m/44'/0'/0/1  where a trailing ' (or h / H) marks a hardened child.
*/

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Indexes at or above this value denote hardened children
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildIndex {
    Normal(u32),
    Hardened(u32),
}

impl ChildIndex {
    /// Splits a raw BIP32 index into its normal or hardened form
    pub fn from_index(index: u32) -> Self {
        if index >= HARDENED_OFFSET {
            ChildIndex::Hardened(index - HARDENED_OFFSET)
        } else {
            ChildIndex::Normal(index)
        }
    }

    /**
        The raw index used in derivation. Fails if the number given to the
        variant is already 2^31 or larger.
    */
    pub fn to_index(self) -> Result<u32> {
        match self {
            ChildIndex::Normal(x) if x < HARDENED_OFFSET => Ok(x),
            ChildIndex::Hardened(x) if x < HARDENED_OFFSET => Ok(x + HARDENED_OFFSET),
            ChildIndex::Normal(x) | ChildIndex::Hardened(x) => {
                Err(Error::BadPath(format!("index {} is not below 2^31", x)))
            }
        }
    }

    pub fn is_hardened(self) -> bool {
        matches!(self, ChildIndex::Hardened(_))
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChildIndex::Normal(x) => write!(f, "{}", x),
            ChildIndex::Hardened(x) => write!(f, "{}'", x),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    pub children: Vec<ChildIndex>,
}

impl Path {
    pub fn new(children: Vec<ChildIndex>) -> Self {
        Self { children }
    }

    pub fn empty() -> Self {
        Self { children: vec![] }
    }

    /// Raw indexes in derivation order
    pub fn indexes(&self) -> Result<Vec<u32>> {
        self.children.iter().map(|c| c.to_index()).collect()
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let mut segments = path.split('/');
        if segments.next() != Some("m") {
            return Err(Error::BadPath(path.to_string()));
        }

        let mut children = vec![];
        for segment in segments {
            let (number, hardened) = match segment.strip_suffix(&['\'', 'h', 'H'][..]) {
                Some(n) => (n, true),
                None => (segment, false),
            };
            //u32::from_str accepts a leading '+', a path segment does not
            if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::BadPath(path.to_string()));
            }
            let x: u32 = number.parse().map_err(|_| Error::BadPath(path.to_string()))?;
            let child = if hardened { ChildIndex::Hardened(x) } else { ChildIndex::Normal(x) };
            child.to_index()?;
            children.push(child);
        }
        Ok(Self { children })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.children {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}
