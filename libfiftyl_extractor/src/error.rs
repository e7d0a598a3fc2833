use std::path::PathBuf;
use thiserror::Error;

use super::constants::*;
use super::hardware_id::{GeoId, RecordId};
use super::worker_status::WorkerStatus;

#[derive(Debug, Error)]
pub enum ChannelMapError {
    #[error("ChannelMap failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("ChannelMap failed to parse an integer: {0}")]
    ParsingError(#[from] std::num::ParseIntError),
    #[error("ChannelMap was given a file with the incorrect format; most likely the number of columns is incorrect")]
    BadFileFormat,
    #[error("ChannelMap was given channel {0} which is outside the detector (max {max})", max=NUMBER_OF_CHANNELS)]
    ChannelOutOfRange(usize),
    #[error("ChannelMap was given link channel {0} which is outside the link (max {max})", max=CHANNELS_PER_LINK)]
    LinkChannelOutOfRange(usize),
    #[error("ChannelMap was given link {0} which is outside the detector (max {max})", max=NUMBER_OF_LINKS)]
    LinkOutOfRange(usize),
    #[error("ChannelMap assigns physical channel {0} more than once")]
    DuplicatePhysical(usize),
    #[error("ChannelMap assigns logical position {0} more than once")]
    DuplicateLogical(usize),
    #[error("ChannelMap does not assign logical position {0}")]
    MissingLogical(usize),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlaneError {
    #[error("Found invalid plane name: {0}")]
    InvalidName(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Selector collection is empty; there is nothing to select")]
    EmptyCollection,
    #[error("Selector collection element {0:?} is not a valid channel to mask from")]
    NotAnInteger(String),
    #[error("Selector channel {0} is outside the detector (max {max})", max=NUMBER_OF_CHANNELS)]
    ChannelOutOfRange(i64),
    #[error("Selector failed to resolve plane: {0}")]
    PlaneError(#[from] PlaneError),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Capture file failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("Capture file failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Could not open capture file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Capture file does not contain record {0}")]
    MissingRecord(RecordId),
    #[error("Capture file record {0} does not contain a fragment with geo ID {1}")]
    MissingFragment(RecordId, GeoId),
    #[error("Incorrect magic {0:#x} found for fragment header; expected {exp:#x}", exp=FRAGMENT_MAGIC)]
    IncorrectMagic(u32),
    #[error("Incorrect fragment size {0} found in header; dataset holds {1} bytes")]
    IncorrectFragmentSize(u64, usize),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnpackError {
    #[error("Fragment payload of {0} bytes is not a whole number of WIBEth frames ({size} bytes each)", size=WIBETH_FRAME_SIZE)]
    PartialFrame(usize),
    #[error("Fragment payload is empty")]
    EmptyPayload,
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Record {0} has no fragments to assemble")]
    NoFragments(RecordId),
    #[error("Fragment with geo ID {0} has {1} samples; expected {2} from the first fragment")]
    MismatchedSamples(GeoId, usize, usize),
    #[error("Fragment with geo ID {0} has {1} channels; expected {exp}", exp=CHANNELS_PER_LINK)]
    BadChannelCount(GeoId, usize),
    #[error("Physical channel {0} from link {1} does not exist in the channel map")]
    UnmappedChannel(usize, usize),
    #[error("Assembly failed due to capture error: {0}")]
    CaptureError(#[from] CaptureError),
    #[error("Assembly failed due to unpacking error: {0}")]
    UnpackError(#[from] UnpackError),
}

#[derive(Debug, Error)]
pub enum RunInfoError {
    #[error("Filename {0:?} does not match the <prefix><run>_<sub run>_..._<timestamp>.<ext> pattern")]
    BadPattern(PathBuf),
    #[error("RunInfo failed to parse an integer: {0}")]
    ParsingError(#[from] std::num::ParseIntError),
    #[error("RunInfo failed to parse the timestamp: {0}")]
    TimeError(#[from] time::error::Parse),
    #[error("RunInfo failed to format the timestamp: {0}")]
    FormatError(#[from] time::error::Format),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session failed due to RunInfo error: {0}")]
    RunInfoError(#[from] RunInfoError),
    #[error("Session failed due to capture error: {0}")]
    CaptureError(#[from] CaptureError),
    #[error("Session failed due to ChannelMap error: {0}")]
    MapError(#[from] ChannelMapError),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Record {0} is not available in the current data set")]
    RecordNotFound(RecordId),
    #[error("Extraction failed due to selector error: {0}")]
    SelectorError(#[from] SelectorError),
    #[error("Extraction failed due to assembly error: {0}")]
    AssemblyError(#[from] AssemblyError),
}

#[derive(Debug, Error)]
pub enum HDF5WriterError {
    #[error("HDF5Writer failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("HDF5Writer failed to encode a string attribute: {0}")]
    StringError(#[from] hdf5::types::StringError),
    #[error("HDF5Writer failed due to RunInfo error: {0}")]
    RunInfoError(#[from] RunInfoError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config record window is empty -- first: {0} last: {1}")]
    BadRecordWindow(u64, u64),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to ChannelMap error: {0}")]
    MapError(#[from] ChannelMapError),
    #[error("Processor failed due to Session error: {0}")]
    SessionError(#[from] SessionError),
    #[error("Processor failed due to selector error: {0}")]
    SelectorError(#[from] SelectorError),
    #[error("Processor failed due to extraction error: {0}")]
    ExtractError(#[from] ExtractError),
    #[error("Processor failed due to HDF5Writer error: {0}")]
    HDFError(#[from] HDF5WriterError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
}
