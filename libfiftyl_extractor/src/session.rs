use fxhash::FxHashSet;
use ndarray::{Array2, Axis};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;

use super::assembler::FragmentAssembler;
use super::capture::{CaptureReader, FragmentUnpacker};
use super::channel_map::ChannelMap;
use super::error::{ExtractError, RunInfoError, SessionError};
use super::hardware_id::RecordId;
use super::hdf_reader::HDFReader;
use super::run_info::RunInfo;
use super::selector::Selector;
use super::wibeth::WibEthUnpacker;

/// Expand a leading `~` to the home directory
fn expand_user(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), std::env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => path.to_path_buf(),
    }
}

/// Session is an open capture file, ready for extraction.
///
/// The run info is parsed from the filename and the records are enumerated once, when the session is
/// opened. Every call to [Session::extract] reads and unpacks the fragments of the record again;
/// nothing is cached. A session is used by one caller at a time, which `extract` taking `&mut self` enforces.
#[derive(Debug)]
pub struct Session<R = HDFReader, U = WibEthUnpacker> {
    filename: PathBuf,
    run_info: RunInfo,
    reader: R,
    unpacker: U,
    channel_map: ChannelMap,
    records: Vec<RecordId>,
    record_set: FxHashSet<RecordId>,
    last_extracted_record: Option<RecordId>,
}

impl Session<HDFReader, WibEthUnpacker> {
    /// Open a capture file using the default channel map
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        Self::open_with_map(path, ChannelMap::default())
    }

    /// Open a capture file using a given channel map
    pub fn open_with_map(path: &Path, channel_map: ChannelMap) -> Result<Self, SessionError> {
        let filename = expand_user(path);
        let reader = HDFReader::open(&filename)?;
        Self::from_reader(&filename, reader, WibEthUnpacker, channel_map)
    }
}

impl<R: CaptureReader, U: FragmentUnpacker> Session<R, U> {
    /// Create a session over an already opened capture.
    ///
    /// The filename must still follow the capture naming pattern, as the run info is taken from it.
    pub fn from_reader(
        filename: &Path,
        reader: R,
        unpacker: U,
        channel_map: ChannelMap,
    ) -> Result<Self, SessionError> {
        let run_info = RunInfo::from_path(filename)?;
        let records = reader.get_all_record_ids()?;
        let record_set = records.iter().copied().collect();
        log::info!(
            "Run {} sub run {} has {} records",
            run_info.run_id,
            run_info.sub_run_id,
            records.len()
        );
        Ok(Self {
            filename: filename.to_path_buf(),
            run_info,
            reader,
            unpacker,
            channel_map,
            records,
            record_set,
            last_extracted_record: None,
        })
    }

    pub fn get_run_id(&self) -> u32 {
        self.run_info.run_id
    }

    pub fn get_sub_run_id(&self) -> u32 {
        self.run_info.sub_run_id
    }

    /// The run time as YYYYmmddTHHMMSS
    pub fn get_runtime(&self) -> Result<String, RunInfoError> {
        self.run_info.runtime()
    }

    pub fn get_datetime(&self) -> PrimitiveDateTime {
        self.run_info.datetime
    }

    pub fn get_run_info(&self) -> &RunInfo {
        &self.run_info
    }

    /// The records of the capture, as enumerated when the session was opened
    pub fn get_records(&self) -> &[RecordId] {
        &self.records
    }

    pub fn get_filename(&self) -> &Path {
        &self.filename
    }

    /// The record most recently accepted by [Session::extract]
    pub fn last_extracted_record(&self) -> Option<RecordId> {
        self.last_extracted_record
    }

    /// Extract the waveforms of a record.
    ///
    /// Returns a matrix of (samples, channels), where the columns follow the mask resolved from the
    /// selector. The record must be one of [Session::get_records].
    pub fn extract(
        &mut self,
        record: &RecordId,
        selector: &Selector,
    ) -> Result<Array2<u16>, ExtractError> {
        if !self.record_set.contains(record) {
            return Err(ExtractError::RecordNotFound(*record));
        }
        self.last_extracted_record = Some(*record);

        let mask = selector.resolve()?;
        let adcs = FragmentAssembler::new(&self.channel_map).assemble(
            &self.reader,
            &self.unpacker,
            record,
        )?;
        Ok(adcs.select(Axis(1), &mask))
    }
}

impl<R, U> Display for Session<R, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.filename.to_string_lossy())
    }
}
