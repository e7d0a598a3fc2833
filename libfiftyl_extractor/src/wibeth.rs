use bitvec::prelude::*;
use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array2;

use super::capture::{Fragment, FragmentUnpacker};
use super::constants::*;
use super::error::UnpackError;

const ADC_OFFSET: usize = WIBETH_DAQ_HEADER_SIZE + WIBETH_HEADER_SIZE;

/// Unpacks WIBEth fragments.
///
/// A WIBEth payload is a run of fixed size frames. After an 8 byte DAQ header and a 16 byte
/// WIB header, each frame holds 64 time samples of 64 channels as 14-bit ADC values packed
/// into little-endian 64-bit words, sample-major. The value for (sample, channel) starts at
/// bit 14 * (64 * sample + channel) of the word array and may straddle two words.
#[derive(Debug, Clone, Copy, Default)]
pub struct WibEthUnpacker;

impl FragmentUnpacker for WibEthUnpacker {
    fn unpack(&self, fragment: &Fragment) -> Result<Array2<u16>, UnpackError> {
        let payload = &fragment.payload;
        if payload.is_empty() {
            return Err(UnpackError::EmptyPayload);
        } else if payload.len() % WIBETH_FRAME_SIZE != 0 {
            return Err(UnpackError::PartialFrame(payload.len()));
        }

        let n_frames = payload.len() / WIBETH_FRAME_SIZE;
        let mut adcs =
            Array2::<u16>::zeros([n_frames * WIBETH_SAMPLES_PER_FRAME, CHANNELS_PER_LINK]);
        let mut words = [0u64; WIBETH_ADC_WORDS];
        for (frame_idx, frame) in payload.chunks_exact(WIBETH_FRAME_SIZE).enumerate() {
            LittleEndian::read_u64_into(&frame[ADC_OFFSET..], &mut words);
            let bits = words.view_bits::<Lsb0>();
            let first_row = frame_idx * WIBETH_SAMPLES_PER_FRAME;
            for sample in 0..WIBETH_SAMPLES_PER_FRAME {
                for channel in 0..CHANNELS_PER_LINK {
                    let start = WIBETH_BITS_PER_ADC * (CHANNELS_PER_LINK * sample + channel);
                    adcs[[first_row + sample, channel]] =
                        bits[start..start + WIBETH_BITS_PER_ADC].load_le::<u16>();
                }
            }
        }
        Ok(adcs)
    }
}

/// Pack ADC samples into WIBEth frames with zeroed headers; the inverse of [WibEthUnpacker].
///
/// The matrix must have 64 columns and a multiple of 64 rows.
#[cfg(test)]
pub(crate) fn pack_frames(adcs: &Array2<u16>) -> Vec<u8> {
    assert_eq!(adcs.ncols(), CHANNELS_PER_LINK);
    assert_eq!(adcs.nrows() % WIBETH_SAMPLES_PER_FRAME, 0);
    let n_frames = adcs.nrows() / WIBETH_SAMPLES_PER_FRAME;
    let mut payload = vec![0u8; n_frames * WIBETH_FRAME_SIZE];
    for (frame_idx, frame) in payload.chunks_exact_mut(WIBETH_FRAME_SIZE).enumerate() {
        let mut words = [0u64; WIBETH_ADC_WORDS];
        let bits = words.view_bits_mut::<Lsb0>();
        for sample in 0..WIBETH_SAMPLES_PER_FRAME {
            for channel in 0..CHANNELS_PER_LINK {
                let start = WIBETH_BITS_PER_ADC * (CHANNELS_PER_LINK * sample + channel);
                bits[start..start + WIBETH_BITS_PER_ADC].store_le::<u16>(
                    adcs[[frame_idx * WIBETH_SAMPLES_PER_FRAME + sample, channel]],
                );
            }
        }
        LittleEndian::write_u64_into(&words, &mut frame[ADC_OFFSET..]);
    }
    payload
}
