use ndarray::{Array2, Axis};

use super::capture::{CaptureReader, FragmentUnpacker};
use super::channel_map::ChannelMap;
use super::constants::{CHANNELS_PER_LINK, NUMBER_OF_CHANNELS};
use super::error::AssemblyError;
use super::hardware_id::{physical_channel, RecordId};

/// FragmentAssembler takes the fragments of a record and composes them into a single sample matrix.
///
/// Each fragment covers the 64 channels of one link. The assembler unpacks every fragment
/// and writes each of its channels into the column given by the logical position of that
/// channel, producing a matrix of (samples, 128) in logical channel order.
#[derive(Debug)]
pub struct FragmentAssembler<'a> {
    channel_map: &'a ChannelMap,
}

impl<'a> FragmentAssembler<'a> {
    /// Create a new FragmentAssembler.
    ///
    /// Requires a ChannelMap
    pub fn new(channel_map: &'a ChannelMap) -> Self {
        Self { channel_map }
    }

    /// Assemble the full logical channel matrix for a record.
    ///
    /// Fragments may come in any link order. The sample count of the first fragment sets the
    /// number of rows, and every other fragment must match it. Channels of links missing from
    /// the record are left at zero.
    pub fn assemble<R: CaptureReader, U: FragmentUnpacker>(
        &self,
        reader: &R,
        unpacker: &U,
        record: &RecordId,
    ) -> Result<Array2<u16>, AssemblyError> {
        let geo_ids = reader.get_geo_ids(record)?;
        log::debug!("Assembling record {} from {} fragments", record, geo_ids.len());

        // We don't know the number of samples until the first fragment is unpacked
        let mut adcs: Option<Array2<u16>> = None;
        for gid in geo_ids.iter() {
            let fragment = reader.get_frag(record, gid)?;
            let link = gid.link();
            let link_adcs = unpacker.unpack(&fragment)?;
            if link_adcs.ncols() != CHANNELS_PER_LINK {
                return Err(AssemblyError::BadChannelCount(*gid, link_adcs.ncols()));
            }

            let matrix = adcs.get_or_insert_with(|| {
                Array2::<u16>::zeros([link_adcs.nrows(), NUMBER_OF_CHANNELS])
            });
            if matrix.nrows() != link_adcs.nrows() {
                return Err(AssemblyError::MismatchedSamples(
                    *gid,
                    link_adcs.nrows(),
                    matrix.nrows(),
                ));
            }

            for (channel, column) in link_adcs.axis_iter(Axis(1)).enumerate() {
                let physical = physical_channel(link, channel);
                let position = self
                    .channel_map
                    .logical_position_for(physical)
                    .ok_or(AssemblyError::UnmappedChannel(physical, link))?;
                matrix.column_mut(position).assign(&column);
            }
        }

        adcs.ok_or(AssemblyError::NoFragments(*record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::MemoryCapture;
    use crate::capture::Fragment;
    use crate::hardware_id::GeoId;
    use crate::wibeth::{pack_frames, WibEthUnpacker};

    /// Every sample encodes its physical channel so columns are easy to trace
    fn link_adcs(link: usize, n_samples: usize) -> Array2<u16> {
        Array2::from_shape_fn((n_samples, CHANNELS_PER_LINK), |(sample, channel)| {
            ((physical_channel(link, channel) * 100 + sample % 100) % 16384) as u16
        })
    }

    fn link_fragment(link: usize, n_samples: usize) -> Fragment {
        Fragment::new(GeoId::from_link(link), pack_frames(&link_adcs(link, n_samples)))
    }

    #[test]
    fn test_assemble_logical_order() {
        let record = RecordId::new(1, 0);
        let mut capture = MemoryCapture::default();
        // Link 1 first to check we don't rely on link order
        capture.insert(record, vec![link_fragment(1, 64), link_fragment(0, 64)]);

        let map = ChannelMap::default();
        let assembler = FragmentAssembler::new(&map);
        let adcs = match assembler.assemble(&capture, &WibEthUnpacker, &record) {
            Ok(a) => a,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(adcs.dim(), (64, NUMBER_OF_CHANNELS));
        for position in 0..NUMBER_OF_CHANNELS {
            let physical = map.physical_for(position).unwrap();
            assert_eq!(adcs[[0, position]], (physical * 100) as u16);
            assert_eq!(adcs[[63, position]], (physical * 100 + 63) as u16);
        }
    }

    #[test]
    fn test_missing_link_is_zero() {
        let record = RecordId::new(1, 0);
        let mut capture = MemoryCapture::default();
        capture.insert(record, vec![link_fragment(0, 64)]);

        let map = ChannelMap::default();
        let adcs = FragmentAssembler::new(&map)
            .assemble(&capture, &WibEthUnpacker, &record)
            .unwrap();
        // Logical position 0 holds physical channel 112, which is on link 1
        assert!(adcs.column(0).iter().all(|v| *v == 0));
        // Logical position 36 holds physical channel 0
        assert_eq!(adcs[[5, 36]], 5);
    }

    #[test]
    fn test_no_fragments() {
        let record = RecordId::new(2, 0);
        let mut capture = MemoryCapture::default();
        capture.insert(record, vec![]);

        let map = ChannelMap::default();
        let result = FragmentAssembler::new(&map).assemble(&capture, &WibEthUnpacker, &record);
        assert!(matches!(result, Err(AssemblyError::NoFragments(r)) if r == record));
    }

    #[test]
    fn test_mismatched_samples() {
        let record = RecordId::new(3, 0);
        let mut capture = MemoryCapture::default();
        capture.insert(record, vec![link_fragment(0, 64), link_fragment(1, 128)]);

        let map = ChannelMap::default();
        let result = FragmentAssembler::new(&map).assemble(&capture, &WibEthUnpacker, &record);
        assert!(matches!(
            result,
            Err(AssemblyError::MismatchedSamples(_, 128, 64))
        ));
    }

    #[test]
    fn test_unmapped_link() {
        let record = RecordId::new(4, 0);
        let mut capture = MemoryCapture::default();
        capture.insert(record, vec![link_fragment(2, 64)]);

        let map = ChannelMap::default();
        let result = FragmentAssembler::new(&map).assemble(&capture, &WibEthUnpacker, &record);
        assert!(matches!(
            result,
            Err(AssemblyError::UnmappedChannel(128, 2))
        ));
    }
}
