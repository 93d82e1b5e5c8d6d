use crate::error::Result;
use openinterface::core::units::{Area, AreaUnit};
use openinterface::engine::labels::{ElementLabel, LabeledSeries};
use openinterface::toolkit::provider::SasaArray;
use openinterface::workflows::contacts::ContactMap;
use openinterface::workflows::interface::ContactingResidues;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A CSV writer over `path`, or over stdout when no path is given.
pub fn open_writer(path: Option<&Path>) -> Result<csv::Writer<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    Ok(csv::Writer::from_writer(sink))
}

#[derive(Serialize)]
struct ContactRow<'a> {
    frame: usize,
    receptor_index: usize,
    receptor: &'a str,
    ligand_index: usize,
    ligand: &'a str,
}

#[derive(Serialize)]
struct SeriesRow<'a, T> {
    side: &'a str,
    index: usize,
    label: &'a str,
    frame: usize,
    value: T,
}

#[derive(Serialize)]
struct SasaRow<'a> {
    index: usize,
    label: &'a str,
    frame: usize,
    sasa_a2: f64,
}

#[derive(Serialize)]
struct BuriedRow {
    frame: usize,
    buried_sasa_a2: f64,
}

#[derive(Serialize)]
struct ResidueRow<'a> {
    side: &'a str,
    index: usize,
    label: &'a str,
}

/// One row per receptor/ligand group pair in contact, per frame.
pub fn write_contact_map<W: Write>(writer: &mut csv::Writer<W>, map: &ContactMap) -> Result<()> {
    for ((frame, i, j), &in_contact) in map.tensor.indexed_iter() {
        if in_contact {
            writer.serialize(ContactRow {
                frame,
                receptor_index: map.receptor[i].index,
                receptor: &map.receptor[i].label,
                ligand_index: map.ligand[j].index,
                ligand: &map.ligand[j].label,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Long-format rows `side,index,label,frame,value` for each labelled series.
pub fn write_sided_series<W: Write, T: Serialize + Copy>(
    writer: &mut csv::Writer<W>,
    sides: &[(&str, &LabeledSeries<T>)],
) -> Result<()> {
    for &(side, series) in sides {
        for (label, column) in series.iter() {
            for (frame, &value) in column.iter().enumerate() {
                writer.serialize(SeriesRow {
                    side,
                    index: label.index,
                    label: &label.label,
                    frame,
                    value,
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// SASA rows in Å²; `frames[k]` is the structure frame of row `k` of `sasa`.
pub fn write_sasa<W: Write>(
    writer: &mut csv::Writer<W>,
    labels: &[ElementLabel],
    frames: &[usize],
    sasa: &SasaArray,
) -> Result<()> {
    let sasa = sasa.to(AreaUnit::SquareAngstrom);
    for (k, &frame) in frames.iter().enumerate() {
        for (e, label) in labels.iter().enumerate() {
            writer.serialize(SasaRow {
                index: label.index,
                label: &label.label,
                frame,
                sasa_a2: sasa.values[[k, e]],
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn write_sasa_buried<W: Write>(writer: &mut csv::Writer<W>, buried: &[Area]) -> Result<()> {
    for (frame, area) in buried.iter().enumerate() {
        writer.serialize(BuriedRow {
            frame,
            buried_sasa_a2: area.value_in(AreaUnit::SquareAngstrom),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_contacting_residues<W: Write>(
    writer: &mut csv::Writer<W>,
    residues: &ContactingResidues,
) -> Result<()> {
    for (side, labels) in [("receptor", &residues.receptor), ("ligand", &residues.ligand)] {
        for label in labels {
            writer.serialize(ResidueRow {
                side,
                index: label.index,
                label: &label.label,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
