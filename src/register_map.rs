//! # Register Maps and the Register Dump Format
//!
//! A `RegisterMap` is a sparse address → value map. An absent address means
//! "not specified", which is different from a register holding 0x00.
//!
//! ## Dump Format
//!
//! One register per line, address and value as hex separated by whitespace.
//! Blank lines are ignored:
//! ```text
//! 07 d9
//! 08 00
//! 09 00
//! ```
//! Dumps are written with two lowercase hex digits per field in ascending
//! address order.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use nom::character::complete::{hex_digit1, space1};
use nom::combinator::all_consuming;
use nom::sequence::separated_pair;
use nom::IResult;
use serde::Serialize;

use crate::error::{RegCalcError, Result};
use crate::registers::POR_REGISTERS;

/// Sparse SX1231 register contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegisterMap {
    regs: BTreeMap<u8, u8>,
}

impl RegisterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, addr: u8) -> Option<u8> {
        self.regs.get(&addr).copied()
    }

    /// Set a register, returning the previous value if there was one.
    pub fn insert(&mut self, addr: u8, value: u8) -> Option<u8> {
        self.regs.insert(addr, value)
    }

    pub fn remove(&mut self, addr: u8) -> Option<u8> {
        self.regs.remove(&addr)
    }

    pub fn contains(&self, addr: u8) -> bool {
        self.regs.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.regs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regs.is_empty()
    }

    /// Registers in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.regs.iter().map(|(&addr, &value)| (addr, value))
    }

    pub fn addresses(&self) -> impl Iterator<Item = u8> + '_ {
        self.regs.keys().copied()
    }

    /// `N` consecutive registers starting at `start`, if all of them are present.
    pub fn get_block<const N: usize>(&self, start: u8) -> Option<[u8; N]> {
        let mut block = [0u8; N];
        for (i, slot) in block.iter_mut().enumerate() {
            let addr = u8::try_from(usize::from(start) + i).ok()?;
            *slot = self.get(addr)?;
        }
        Some(block)
    }

    /// Parse a register dump.
    pub fn parse_dump(text: &str) -> Result<Self> {
        let mut map = RegisterMap::new();
        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let (_, (addr_text, value_text)) = dump_line(line).map_err(|_| {
                RegCalcError::ParseError {
                    line: line_no,
                    reason: "Syntax Error".to_string(),
                }
            })?;

            let addr = u8::from_str_radix(addr_text, 16).map_err(|_| RegCalcError::ParseError {
                line: line_no,
                reason: "Address out of range".to_string(),
            })?;
            let value =
                u8::from_str_radix(value_text, 16).map_err(|_| RegCalcError::ParseError {
                    line: line_no,
                    reason: "Value out of range".to_string(),
                })?;

            map.insert(addr, value);
        }
        Ok(map)
    }

    /// Render as a register dump.
    pub fn to_dump(&self) -> String {
        self.iter()
            .map(|(addr, value)| format!("{addr:02x} {value:02x}\n"))
            .collect()
    }

    /// Read a register dump file.
    pub fn read_dump_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_dump(&text)
    }

    /// Write the map as a register dump file.
    pub fn write_dump_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_dump())?;
        Ok(())
    }
}

/// `<hex address> <hex value>` with nothing else on the line
fn dump_line(input: &str) -> IResult<&str, (&str, &str)> {
    all_consuming(separated_pair(hex_digit1, space1, hex_digit1))(input)
}

impl FromStr for RegisterMap {
    type Err = RegCalcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_dump(s)
    }
}

impl fmt::Display for RegisterMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dump())
    }
}

impl FromIterator<(u8, u8)> for RegisterMap {
    fn from_iter<I: IntoIterator<Item = (u8, u8)>>(iter: I) -> Self {
        Self {
            regs: iter.into_iter().collect(),
        }
    }
}

impl Extend<(u8, u8)> for RegisterMap {
    fn extend<I: IntoIterator<Item = (u8, u8)>>(&mut self, iter: I) {
        self.regs.extend(iter);
    }
}

/// The chip's power-on-reset register state, the baseline for export diffs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorDefaults;

impl PorDefaults {
    /// POR value of a register, `None` for addresses outside the table.
    pub fn value(addr: u8) -> Option<u8> {
        POR_REGISTERS
            .binary_search_by_key(&addr, |&(a, _)| a)
            .ok()
            .map(|idx| POR_REGISTERS[idx].1)
    }

    /// The POR table as a register map.
    pub fn map() -> RegisterMap {
        POR_REGISTERS.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dump() {
        let map = RegisterMap::parse_dump("07 D9\n\n  08 00\n09\t0a\n").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(0x07), Some(0xD9));
        assert_eq!(map.get(0x09), Some(0x0A));
        assert_eq!(map.get(0x0A), None);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let err = RegisterMap::parse_dump("07 d9\nzz 01\n").unwrap_err();
        assert!(matches!(err, RegCalcError::ParseError { line: 2, .. }));
        assert_eq!(err.to_string(), "Line 2: Syntax Error");

        let err = RegisterMap::parse_dump("\n\n100 01").unwrap_err();
        assert!(matches!(err, RegCalcError::ParseError { line: 3, .. }));
        assert_eq!(err.to_string(), "Line 3: Address out of range");

        let err = RegisterMap::parse_dump("01 1ff").unwrap_err();
        assert_eq!(err.to_string(), "Line 1: Value out of range");

        assert!(RegisterMap::parse_dump("01 02 03").is_err());
        assert!(RegisterMap::parse_dump("0102").is_err());
    }

    #[test]
    fn test_to_dump() {
        let map: RegisterMap = [(0x38, 0x00), (0x07, 0xE4)].into_iter().collect();
        assert_eq!(map.to_dump(), "07 e4\n38 00\n");
        assert_eq!(map.to_dump().parse::<RegisterMap>().unwrap(), map);
    }

    #[test]
    fn test_get_block() {
        let map: RegisterMap = [(0x2F, 1), (0x30, 2), (0x32, 4)].into_iter().collect();
        assert_eq!(map.get_block::<2>(0x2F), Some([1, 2]));
        assert_eq!(map.get_block::<3>(0x2F), None);
        assert_eq!(map.get_block::<2>(0xFF), None);
    }

    #[test]
    fn test_por_defaults() {
        assert_eq!(PorDefaults::value(0x07), Some(0xE4));
        assert_eq!(PorDefaults::value(0x71), Some(0x00));
        assert_eq!(PorDefaults::value(0x50), None);
        assert_eq!(PorDefaults::map().len(), 85);
    }
}
