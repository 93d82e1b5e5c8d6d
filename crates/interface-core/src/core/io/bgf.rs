use crate::core::io::traits::MolecularFile;
use crate::core::models::builder::MolecularSystemBuilder;
use crate::core::models::chain::ChainType;
use crate::core::models::system::{ModelError, MolecularSystem};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum BgfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: BgfParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
    #[error("Invalid structure: {0}")]
    Model(#[from] ModelError),
}

#[derive(Debug, Error)]
pub enum BgfParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 80 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    value: &str,
    columns: &str,
    line: usize,
) -> Result<T, BgfError> {
    value.parse().map_err(|_| BgfError::Parse {
        line,
        kind: BgfParseErrorKind::InvalidInt {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

fn parse_float(value: &str, columns: &str, line: usize) -> Result<f64, BgfError> {
    value.parse().map_err(|_| BgfError::Parse {
        line,
        kind: BgfParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

/// Reader for the BGF (BIOGRAF) fixed-column structure format.
///
/// Only ATOM/HETATM records are interpreted; connectivity and header records are skipped.
/// Chains holding any HETATM record are classified as [`ChainType::Hetero`].
pub struct BgfFile;

impl MolecularFile for BgfFile {
    type Error = BgfError;

    fn read_from(reader: &mut impl BufRead) -> Result<MolecularSystem, Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut seen_serials = HashSet::new();

        let mut current_chain_id = '\0';
        let mut current_residue_id = isize::MIN;
        let mut chain_is_hetero: HashMap<char, bool> = HashMap::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < 80 {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::LineTooShort,
                        });
                    }

                    let serial_str = slice_and_trim(&line, 7, 12);
                    let name_str = slice_and_trim(&line, 13, 18);
                    let res_name_str = slice_and_trim(&line, 19, 22);
                    let chain_id_str = slice_and_trim(&line, 23, 24);
                    let res_id_str = slice_and_trim(&line, 25, 30);
                    let ff_type_str = slice_and_trim(&line, 61, 66);
                    let charge_str = slice_and_trim(&line, 72, 80);

                    if name_str.is_empty() {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::MissingRequiredField {
                                columns: "14-18".into(),
                            },
                        });
                    }
                    let serial: usize = parse_int(serial_str, "8-12", line_num)?;
                    if !seen_serials.insert(serial) {
                        return Err(BgfError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            serial
                        )));
                    }

                    let chain_id: char = chain_id_str.chars().next().unwrap_or('A');
                    let res_id: isize = parse_int(res_id_str, "26-30", line_num)?;
                    let x = parse_float(slice_and_trim(&line, 30, 40), "31-40", line_num)?;
                    let y = parse_float(slice_and_trim(&line, 40, 50), "41-50", line_num)?;
                    let z = parse_float(slice_and_trim(&line, 50, 60), "51-60", line_num)?;
                    let charge = if charge_str.is_empty() {
                        0.0
                    } else {
                        parse_float(charge_str, "73-80", line_num)?
                    };

                    if chain_id != current_chain_id {
                        let is_hetero = chain_is_hetero.entry(chain_id).or_insert(false);
                        if record_type == "HETATM" {
                            *is_hetero = true;
                        }
                        builder.start_chain(chain_id, ChainType::from_hetero_flag(*is_hetero));
                        current_chain_id = chain_id;
                        current_residue_id = isize::MIN;
                    }
                    if res_id != current_residue_id {
                        builder.start_residue(res_id, res_name_str)?;
                        current_residue_id = res_id;
                    }
                    builder.add_atom(serial, name_str, Point3::new(x, y, z), charge, ff_type_str)?;
                }
                "END" => break,
                _ => {}
            }
        }

        if seen_serials.is_empty() {
            return Err(BgfError::MissingRecord("ATOM/HETATM records".into()));
        }
        debug!(atoms = seen_serials.len(), "Parsed BGF structure.");
        Ok(builder.build())
    }
}
