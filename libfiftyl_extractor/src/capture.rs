use ndarray::Array2;

use super::error::{CaptureError, UnpackError};
use super::hardware_id::{GeoId, RecordId};

/// A single hardware fragment: the raw payload read out by one link for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub geo_id: GeoId,
    pub payload: Vec<u8>,
}

impl Fragment {
    pub fn new(geo_id: GeoId, payload: Vec<u8>) -> Self {
        Self { geo_id, payload }
    }
}

/// CaptureReader gives access to the records and fragments of a capture file.
///
/// Records are enumerated by the caller once; fragments are re-read every time they are requested.
pub trait CaptureReader {
    /// All records contained in the capture, in file order
    fn get_all_record_ids(&self) -> Result<Vec<RecordId>, CaptureError>;

    /// Geographic IDs of every fragment in a record. No ordering is promised.
    fn get_geo_ids(&self, record: &RecordId) -> Result<Vec<GeoId>, CaptureError>;

    /// Read the fragment for a geographic ID of a record
    fn get_frag(&self, record: &RecordId, geo_id: &GeoId) -> Result<Fragment, CaptureError>;
}

/// FragmentUnpacker turns a fragment into its ADC samples.
///
/// The returned matrix has one row per time sample and one column per link channel.
pub trait FragmentUnpacker {
    fn unpack(&self, fragment: &Fragment) -> Result<Array2<u16>, UnpackError>;
}

/// In-memory capture used to drive tests without an HDF5 file
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct MemoryCapture {
        pub records: BTreeMap<RecordId, Vec<Fragment>>,
    }

    impl MemoryCapture {
        pub fn insert(&mut self, record: RecordId, fragments: Vec<Fragment>) {
            self.records.insert(record, fragments);
        }
    }

    impl CaptureReader for MemoryCapture {
        fn get_all_record_ids(&self) -> Result<Vec<RecordId>, CaptureError> {
            Ok(self.records.keys().copied().collect())
        }

        fn get_geo_ids(&self, record: &RecordId) -> Result<Vec<GeoId>, CaptureError> {
            match self.records.get(record) {
                Some(frags) => Ok(frags.iter().map(|f| f.geo_id).collect()),
                None => Err(CaptureError::MissingRecord(*record)),
            }
        }

        fn get_frag(&self, record: &RecordId, geo_id: &GeoId) -> Result<Fragment, CaptureError> {
            self.records
                .get(record)
                .ok_or(CaptureError::MissingRecord(*record))?
                .iter()
                .find(|f| f.geo_id == *geo_id)
                .cloned()
                .ok_or(CaptureError::MissingFragment(*record, *geo_id))
        }
    }
}
