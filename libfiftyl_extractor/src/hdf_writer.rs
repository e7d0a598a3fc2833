use hdf5::types::VarLenUnicode;
use hdf5::File;
use ndarray::Array2;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::HDF5WriterError;
use super::hardware_id::RecordId;
use super::run_info::RunInfo;

const WAVEFORMS_NAME: &str = "waveforms";

/// This is the version of the output format
const FORMAT_VERSION: &str = "1.0";

/// A simple struct which wraps around the hdf5-rust library.
///
/// Opens an HDF5 file for writing extracted waveforms. The capture file itself is never written.
#[allow(dead_code)]
#[derive(Debug)]
pub struct HDFWriter {
    file_handle: File,
    path: PathBuf,
    waveforms_group: hdf5::Group,
    records_written: u64,
}
// Structure
// (root) - run_id, sub_run_id, runtime, source, version
// waveforms - n_records
// |---- TriggerRecord#####.####(dset, samples x channels) - record, sequence, channels

impl HDFWriter {
    /// Create the writer, opening a file at path and recording the run info of the source capture
    pub fn new(path: &Path, run_info: &RunInfo, source: &Path) -> Result<Self, HDF5WriterError> {
        let file_handle = File::create(path)?;
        let version = format!("{}:{}", env!("CARGO_PKG_NAME"), FORMAT_VERSION);

        file_handle
            .new_attr::<u32>()
            .create("run_id")?
            .write_scalar(&run_info.run_id)?;
        file_handle
            .new_attr::<u32>()
            .create("sub_run_id")?
            .write_scalar(&run_info.sub_run_id)?;
        file_handle
            .new_attr::<VarLenUnicode>()
            .create("runtime")?
            .write_scalar(&VarLenUnicode::from_str(&run_info.runtime()?)?)?;
        file_handle
            .new_attr::<VarLenUnicode>()
            .create("source")?
            .write_scalar(&VarLenUnicode::from_str(&source.to_string_lossy())?)?;
        file_handle
            .new_attr::<VarLenUnicode>()
            .create("version")?
            .write_scalar(&VarLenUnicode::from_str(&version)?)?;

        let waveforms_group = file_handle.create_group(WAVEFORMS_NAME)?;
        waveforms_group.new_attr::<u64>().create("n_records")?;

        Ok(Self {
            file_handle,
            path: path.to_path_buf(),
            waveforms_group,
            records_written: 0,
        })
    }

    /// Write the waveforms of a record. Mask holds the logical channel of each column.
    pub fn write_waveforms(
        &mut self,
        record: &RecordId,
        mask: &[usize],
        adcs: &Array2<u16>,
    ) -> Result<(), HDF5WriterError> {
        let channels: Vec<u64> = mask.iter().map(|c| *c as u64).collect();
        let dset = self
            .waveforms_group
            .new_dataset_builder()
            .with_data(adcs)
            .create(record.group_name().as_str())?;
        dset.new_attr::<u64>()
            .create("record")?
            .write_scalar(&record.number)?;
        dset.new_attr::<u32>()
            .create("sequence")?
            .write_scalar(&record.sequence)?;
        dset.new_attr_builder()
            .with_data(&channels[..])
            .create("channels")?;
        self.records_written += 1;
        Ok(())
    }

    /// Write meta information on the written records, consume the writer
    pub fn close(self) -> Result<(), HDF5WriterError> {
        self.waveforms_group
            .attr("n_records")?
            .write_scalar(&self.records_written)?;
        log::info!(
            "{} records written to {}.",
            self.records_written,
            self.path.to_string_lossy()
        );
        Ok(())
    }
}
