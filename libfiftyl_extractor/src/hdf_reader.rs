use byteorder::{ByteOrder, LittleEndian};
use hdf5::{File, Group};
use std::path::Path;

use super::capture::{CaptureReader, Fragment};
use super::constants::*;
use super::error::CaptureError;
use super::hardware_id::{GeoId, RecordId};

/// A simple struct which wraps around the hdf5-rust library to read capture files.
///
/// Capture layout:
///
/// ```text
/// capture.hdf5
/// |---- TriggerRecord00001.0000
/// |    |---- RawData
/// |    |    |---- <fragment>(dset, u8) - geo_id
/// |    |    |---- <fragment>(dset, u8) - geo_id
/// |---- TriggerRecord00002.0000
/// ...
/// ```
///
/// Each fragment dataset holds the raw fragment: a 72 byte DAQ header followed by the payload.
#[derive(Debug)]
pub struct HDFReader {
    file_handle: File,
}

impl HDFReader {
    /// Open a capture file for reading
    pub fn open(path: &Path) -> Result<Self, CaptureError> {
        if !path.exists() {
            return Err(CaptureError::BadFilePath(path.to_path_buf()));
        }
        let size = std::fs::metadata(path)?.len();
        let file_handle = File::open(path)?;
        log::info!(
            "Opened capture file {} ({})",
            path.to_string_lossy(),
            human_bytes::human_bytes(size as f64)
        );
        Ok(Self { file_handle })
    }

    fn raw_data_group(&self, record: &RecordId) -> Result<Group, CaptureError> {
        self.file_handle
            .group(&format!("{}/{}", record.group_name(), RAW_DATA_GROUP))
            .map_err(|_| CaptureError::MissingRecord(*record))
    }

    fn read_geo_id(group: &Group, name: &str) -> Result<GeoId, CaptureError> {
        let gid = group
            .dataset(name)?
            .attr(GEO_ID_ATTR)?
            .read_scalar::<u64>()?;
        Ok(GeoId(gid))
    }
}

impl CaptureReader for HDFReader {
    fn get_all_record_ids(&self) -> Result<Vec<RecordId>, CaptureError> {
        let mut records: Vec<RecordId> = self
            .file_handle
            .member_names()?
            .iter()
            .filter_map(|name| RecordId::from_group_name(name))
            .collect();
        records.sort();
        Ok(records)
    }

    fn get_geo_ids(&self, record: &RecordId) -> Result<Vec<GeoId>, CaptureError> {
        let group = self.raw_data_group(record)?;
        group
            .member_names()?
            .iter()
            .map(|name| Self::read_geo_id(&group, name))
            .collect()
    }

    fn get_frag(&self, record: &RecordId, geo_id: &GeoId) -> Result<Fragment, CaptureError> {
        let group = self.raw_data_group(record)?;
        for name in group.member_names()? {
            if Self::read_geo_id(&group, &name)? != *geo_id {
                continue;
            }
            let bytes = group.dataset(&name)?.read_raw::<u8>()?;
            return Ok(Fragment::new(*geo_id, strip_header(&bytes)?.to_vec()));
        }
        Err(CaptureError::MissingFragment(*record, *geo_id))
    }
}

/// Check the DAQ fragment header and return the payload following it
pub fn strip_header(bytes: &[u8]) -> Result<&[u8], CaptureError> {
    if bytes.len() < FRAGMENT_HEADER_SIZE {
        return Err(CaptureError::IncorrectFragmentSize(
            FRAGMENT_HEADER_SIZE as u64,
            bytes.len(),
        ));
    }
    let magic = LittleEndian::read_u32(&bytes[..4]);
    if magic != FRAGMENT_MAGIC {
        return Err(CaptureError::IncorrectMagic(magic));
    }
    let size = LittleEndian::read_u64(&bytes[FRAGMENT_SIZE_OFFSET..]);
    if size != bytes.len() as u64 {
        return Err(CaptureError::IncorrectFragmentSize(size, bytes.len()));
    }
    Ok(&bytes[FRAGMENT_HEADER_SIZE..])
}

/// Wrap a payload in a DAQ fragment header
#[cfg(test)]
pub(crate) fn add_header(payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; FRAGMENT_HEADER_SIZE];
    LittleEndian::write_u32(&mut bytes[..4], FRAGMENT_MAGIC);
    LittleEndian::write_u64(
        &mut bytes[FRAGMENT_SIZE_OFFSET..],
        (FRAGMENT_HEADER_SIZE + payload.len()) as u64,
    );
    bytes.extend_from_slice(payload);
    bytes
}

/// Write a capture file in the layout read by [HDFReader]
#[cfg(test)]
pub(crate) fn write_capture(
    path: &Path,
    records: &[(RecordId, Vec<Fragment>)],
) -> Result<(), hdf5::Error> {
    let file = File::create(path)?;
    for (record, fragments) in records {
        let raw = file
            .create_group(&record.group_name())?
            .create_group(RAW_DATA_GROUP)?;
        for fragment in fragments {
            let bytes = add_header(&fragment.payload);
            let name = format!("Detector_Readout_{}_WIBEth", fragment.geo_id);
            let dset = raw
                .new_dataset_builder()
                .with_data(&bytes[..])
                .create(name.as_str())?;
            dset.new_attr::<u64>()
                .create(GEO_ID_ATTR)?
                .write_scalar(&fragment.geo_id.0)?;
        }
    }
    Ok(())
}
